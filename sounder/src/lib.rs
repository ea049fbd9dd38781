//! A sine wave synthesizer played with the mouse. Moving the mouse up or down changes the
//! volume, moving it left or right changes the pitch, and clicking the left button starts and
//! stops the sound.

pub mod config;
pub mod direction;
pub mod info_area;
pub mod mouse_cntl;
pub mod sound_player;
pub mod synth;
pub mod worker;

pub use config::{SoundConfig, SounderConfig, WindowConfig};
pub use direction::{determine_direction, Direction};
pub use info_area::InfoArea;
pub use mouse_cntl::MouseCntl;
pub use sound_player::{Session, SoundPlayer, SoundState, Synth};
pub use synth::SineSynth;
