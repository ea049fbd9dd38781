use crate::sig::{Buf, ConstBuf, Sig, SigCtx, SigT};
use std::sync::{Arc, RwLock};

/// A value that can be changed from one thread while a signal reading it is played on another.
/// The signal reads the value once per batch so every sample in a batch sees the same value.
#[derive(Debug)]
pub struct Var<T: Copy>(Arc<RwLock<T>>);

impl<T: Copy> Clone for Var<T> {
    fn clone(&self) -> Self {
        Var(Arc::clone(&self.0))
    }
}

impl<T: Copy> Var<T> {
    pub fn new(value: T) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }

    pub fn get(&self) -> T {
        *self.0.read().unwrap()
    }

    pub fn set(&self, value: T) {
        *self.0.write().unwrap() = value;
    }

    pub fn sig(&self) -> Sig<SigVar<T>> {
        Sig(SigVar(self.clone()))
    }
}

pub struct SigVar<T: Copy>(Var<T>);

impl<T: Copy> SigT for SigVar<T> {
    type Item = T;

    fn sample(&mut self, ctx: &SigCtx) -> impl Buf<Self::Item> {
        ConstBuf {
            value: self.0.get(),
            count: ctx.num_samples,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn signal_sees_updates_between_batches() {
        let var = Var::new(1.0_f32);
        let mut sig = var.sig();
        let ctx = SigCtx {
            sample_rate_hz: 44_100.0,
            batch_index: 0,
            num_samples: 2,
        };
        let mut out = Vec::new();
        sig.sample_into_vec(&ctx, &mut out);
        assert_eq!(out, vec![1.0, 1.0]);
        var.set(3.0);
        sig.sample_into_vec(&ctx, &mut out);
        assert_eq!(out, vec![3.0, 3.0]);
    }

    #[test]
    fn clones_share_the_value() {
        let var = Var::new(10);
        let other = var.clone();
        other.set(15);
        assert_eq!(var.get(), 15);
    }
}
