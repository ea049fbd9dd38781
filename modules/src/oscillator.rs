use sounder_core::{Buf, Sig, SigCtx, SigT};

pub mod waveform {
    use std::f32::consts::PI;

    pub trait Waveform: Copy {
        fn sample(&self, state_01: f32) -> f32;
    }

    #[derive(Clone, Copy)]
    pub struct Sine;
    impl Waveform for Sine {
        fn sample(&self, state_01: f32) -> f32 {
            (state_01 * PI * 2.0).sin()
        }
    }
}

pub use waveform::{Sine, Waveform};

pub struct Oscillator<W, F>
where
    W: Waveform,
    F: SigT<Item = f32>,
{
    /// Position within the current cycle, in `0..1`.
    state_01: f32,
    waveform: W,
    freq_hz: F,
    buf: Vec<f32>,
}

impl<W, F> SigT for Oscillator<W, F>
where
    W: Waveform,
    F: SigT<Item = f32>,
{
    type Item = f32;

    fn sample(&mut self, ctx: &SigCtx) -> impl Buf<Self::Item> {
        let buf_freq_hz = self.freq_hz.sample(ctx);
        self.buf.clear();
        for freq_hz in buf_freq_hz.iter() {
            self.buf.push(self.waveform.sample(self.state_01));
            let state_delta = freq_hz / ctx.sample_rate_hz;
            self.state_01 = (self.state_01 + state_delta).rem_euclid(1.0);
        }
        self.buf.as_slice()
    }
}

/// A signal which oscillates with a given waveform at a given frequency, starting at the
/// beginning of a cycle.
pub fn oscillator<W, F>(waveform: W, freq_hz: F) -> Sig<Oscillator<W, F>>
where
    W: Waveform,
    F: SigT<Item = f32>,
{
    Sig(Oscillator {
        state_01: 0.0,
        waveform,
        freq_hz,
        buf: Vec::new(),
    })
}
