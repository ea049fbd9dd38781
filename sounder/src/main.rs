use clap::Parser;
use sounder::{InfoArea, MouseCntl, SineSynth, SoundPlayer, SounderConfig};
use sounder_interactive::Window;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sounder")]
#[command(
    about = "Play a sine wave with the mouse. Click to start and stop the sound, move up and down to change the volume, and left and right to change the pitch."
)]
struct Cli {
    /// Json file with settings. Flags below override values from the file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    starting_frequency: Option<f32>,
    #[arg(long)]
    frequency_delta: Option<f32>,
    #[arg(long)]
    gain_delta: Option<f32>,
    #[arg(short, long)]
    title: Option<String>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
}

impl Cli {
    fn sounder_config(&self) -> anyhow::Result<SounderConfig> {
        let mut config = match self.config.as_ref() {
            Some(path) => SounderConfig::load(path)?,
            None => SounderConfig::default(),
        };
        if let Some(starting_frequency) = self.starting_frequency {
            config.sound.starting_frequency_hz = starting_frequency;
        }
        if let Some(frequency_delta) = self.frequency_delta {
            config.sound.frequency_delta_hz = frequency_delta;
        }
        if let Some(gain_delta) = self.gain_delta {
            config.sound.gain_delta_db = gain_delta;
        }
        if let Some(title) = self.title.as_ref() {
            config.window.title = title.clone();
        }
        if let Some(width) = self.width {
            config.window.width_px = width;
        }
        if let Some(height) = self.height {
            config.window.height_px = height;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Cli::parse().sounder_config()?;
    log::debug!("{:?}", config);
    let window = Window::builder()
        .title(config.window.title.as_str())
        .width_px(config.window.width_px)
        .height_px(config.window.height_px)
        .info_line_count(config.window.info_line_count)
        .build();
    let synth = SineSynth::new(sounder_player::Config {
        target_latency_s: config.sound.target_latency_s,
    });
    let player = SoundPlayer::new(config.sound, synth)?;
    let mut mouse_cntl =
        MouseCntl::new(player, InfoArea::new(config.info_area_capacity));
    window.run(&mut mouse_cntl)
}
