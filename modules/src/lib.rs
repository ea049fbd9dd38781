pub mod gain;
pub mod oscillator;

pub use gain::{amplify_db, db_to_amplitude};
pub use oscillator::{oscillator, waveform, Oscillator, Sine};
