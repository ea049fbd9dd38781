use sounder_core::{Sig, SigT};

/// Silence below this level. Keeps `db_to_amplitude` from returning denormals for very quiet
/// settings.
pub const SILENCE_DB: f32 = -120.0;

pub fn db_to_amplitude(db: f32) -> f32 {
    if db <= SILENCE_DB {
        0.0
    } else {
        10_f32.powf(db / 20.0)
    }
}

/// Scale each sample of `sig` by the gain (in decibels) yielded by `gain_db`.
pub fn amplify_db<S, G>(sig: S, gain_db: G) -> Sig<impl SigT<Item = f32>>
where
    S: SigT<Item = f32>,
    G: SigT<Item = f32>,
{
    Sig(sig)
        .zip(gain_db)
        .map(|(sample, gain_db)| sample * db_to_amplitude(gain_db))
}

#[cfg(test)]
mod test {
    use super::*;
    use sounder_core::SigCtx;

    #[test]
    fn zero_db_is_unity() {
        assert_eq!(db_to_amplitude(0.0), 1.0);
    }

    #[test]
    fn minus_twenty_db_is_a_tenth() {
        assert!((db_to_amplitude(-20.0) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn very_quiet_is_silent() {
        assert_eq!(db_to_amplitude(SILENCE_DB), 0.0);
        assert_eq!(db_to_amplitude(-200.0), 0.0);
    }

    #[test]
    fn amplify_scales_samples() {
        let mut sig = amplify_db(0.5_f32, -20.0_f32);
        let ctx = SigCtx {
            sample_rate_hz: 48_000.0,
            batch_index: 0,
            num_samples: 3,
        };
        let mut out = Vec::new();
        sig.sample_into_vec(&ctx, &mut out);
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|x| (x - 0.05).abs() < 1e-6));
    }
}
