use sounder_modules::*;
use sounder_player::Player;
use std::time::{Duration, Instant};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let player = Player::new()?;
    let start = Instant::now();
    player.play_signal_sync_mono_while(
        amplify_db(oscillator(Sine, 440.0_f32), -12.0_f32),
        || start.elapsed() < Duration::from_secs(2),
        Default::default(),
    )
}
