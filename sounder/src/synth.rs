use crate::sound_player::{Session, SoundState, Synth};
use sounder_modules::{amplify_db, oscillator, Sine};
use sounder_player::{Config, Player};

/// Plays a sine wave through the default audio output, following the frequency and gain in the
/// sound state.
pub struct SineSynth {
    player_config: Config,
}

impl SineSynth {
    pub fn new(player_config: Config) -> Self {
        Self { player_config }
    }
}

impl Synth for SineSynth {
    fn play_audio(&self, state: &SoundState, session: Session) -> anyhow::Result<()> {
        log::info!(
            "playing sine wave at {}Hz, {}dB",
            state.frequency_hz.get(),
            state.gain_db.get()
        );
        let player = Player::new()?;
        let sig = amplify_db(
            oscillator(Sine, state.frequency_hz.sig()),
            state.gain_db.sig(),
        );
        player.play_signal_sync_mono_while(
            sig,
            || state.is_current(session),
            self.player_config,
        )
    }
}
