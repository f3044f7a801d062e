//! LDPC decoder factory.
//!
//! This module contains routines to build an LDPC decoder generically over
//! the decoder families in this crate. Such decoders are represented by
//! `Box<dyn LdpcDecoder>`, using the trait [`LdpcDecoder`].

use super::{bitflip, mlg, minsum, ConfigError, LdpcDecoder};
use crate::matrix::CheckMatrix;
use enum_iterator::Sequence;
use std::fmt::Display;
use std::sync::Arc;

/// Decoder factory.
///
/// This trait is implemented by [`DecoderImplementation`], which builds a
/// suitable decoder depending on the value of an enum. Other factories can
/// be implemented by the user in order to drive the decode CLI or a test
/// harness with an LDPC decoder implemented externally to this crate (such
/// decoder must be wrapped as a `Box<dyn LdpcDecoder>`).
pub trait DecoderFactory: Display + Clone + Sync + Send + 'static {
    /// Builds an LDPC decoder.
    ///
    /// Given a parity check matrix, the iteration budget and an optional α
    /// parameter, this function builds an LDPC decoder corresponding to this
    /// decoder implementation. Decoders that do not use α ignore it; a
    /// decoder that requires α fails if it is absent.
    fn build_decoder(
        &self,
        h: Arc<CheckMatrix>,
        max_iterations: usize,
        alpha: Option<f64>,
    ) -> Result<Box<dyn LdpcDecoder>, ConfigError>;
}

/// LDPC decoder implementation.
///
/// This enum lists the decoder implementations corresponding to the three
/// decoder families in this crate.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Sequence)]
pub enum DecoderImplementation {
    /// Plain bit-flipping.
    Bf,
    /// Weighted bit-flipping.
    Wbf,
    /// Modified weighted bit-flipping. Uses α.
    Mwbf,
    /// Improved modified weighted bit-flipping. Uses α.
    Imwbf,
    /// One-step majority-logic correction.
    OneStepMlg,
    /// Iterative hard majority-logic decoding.
    HardMlg,
    /// Iterative soft majority-logic decoding.
    SoftMlg,
    /// Iterative adaptive soft majority-logic decoding. Uses α.
    AdaptiveSoftMlg,
    /// Plain min-sum belief propagation.
    MinSum,
    /// Normalized min-sum. Uses α.
    NormalizedMinSum,
    /// Offset min-sum. Uses α.
    OffsetMinSum,
}

impl DecoderImplementation {
    /// Returns `true` if this implementation uses the α parameter.
    pub fn requires_alpha(&self) -> bool {
        matches!(
            self,
            DecoderImplementation::Mwbf
                | DecoderImplementation::Imwbf
                | DecoderImplementation::AdaptiveSoftMlg
                | DecoderImplementation::NormalizedMinSum
                | DecoderImplementation::OffsetMinSum
        )
    }
}

impl DecoderFactory for DecoderImplementation {
    fn build_decoder(
        &self,
        h: Arc<CheckMatrix>,
        max_iterations: usize,
        alpha: Option<f64>,
    ) -> Result<Box<dyn LdpcDecoder>, ConfigError> {
        let required = |name| alpha.ok_or(ConfigError::MissingAlpha(name));
        Ok(match self {
            DecoderImplementation::Bf => Box::new(bitflip::Decoder::new(
                h,
                bitflip::Variant::Basic,
                max_iterations,
            )),
            DecoderImplementation::Wbf => Box::new(bitflip::Decoder::new(
                h,
                bitflip::Variant::Weighted,
                max_iterations,
            )),
            DecoderImplementation::Mwbf => Box::new(bitflip::Decoder::new(
                h,
                bitflip::Variant::Modified {
                    alpha: required("mwbf")?,
                },
                max_iterations,
            )),
            DecoderImplementation::Imwbf => Box::new(bitflip::Decoder::new(
                h,
                bitflip::Variant::Improved {
                    alpha: required("imwbf")?,
                },
                max_iterations,
            )),
            DecoderImplementation::OneStepMlg => Box::new(mlg::OneStepDecoder::new(h)?),
            DecoderImplementation::HardMlg => {
                Box::new(mlg::Decoder::new(h, mlg::Kind::Hard, max_iterations)?)
            }
            DecoderImplementation::SoftMlg => {
                Box::new(mlg::Decoder::new(h, mlg::Kind::Soft, max_iterations)?)
            }
            DecoderImplementation::AdaptiveSoftMlg => Box::new(mlg::Decoder::new(
                h,
                mlg::Kind::AdaptiveSoft {
                    alpha: required("adaptive-soft-mlg")?,
                },
                max_iterations,
            )?),
            DecoderImplementation::MinSum => {
                Box::new(minsum::Decoder::new(h, max_iterations, false, false, None)?)
            }
            DecoderImplementation::NormalizedMinSum => {
                Box::new(minsum::Decoder::new(h, max_iterations, true, false, alpha)?)
            }
            DecoderImplementation::OffsetMinSum => {
                Box::new(minsum::Decoder::new(h, max_iterations, false, true, alpha)?)
            }
        })
    }
}

macro_rules! impl_decoder_names {
    ($($var:path, $text:expr;)+) => {
        impl std::str::FromStr for DecoderImplementation {
            type Err = &'static str;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(match s {
                    $(
                        $text => $var,
                    )+
                    _ => return Err("invalid decoder implementation"),
                })
            }
        }

        impl Display for DecoderImplementation {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
                write!(
                    f,
                    "{}",
                    match self {
                        $(
                            $var => $text,
                        )+
                    }
                )
            }
        }
    };
}

impl_decoder_names!(
    DecoderImplementation::Bf, "bf";
    DecoderImplementation::Wbf, "wbf";
    DecoderImplementation::Mwbf, "mwbf";
    DecoderImplementation::Imwbf, "imwbf";
    DecoderImplementation::OneStepMlg, "one-step-mlg";
    DecoderImplementation::HardMlg, "hard-mlg";
    DecoderImplementation::SoftMlg, "soft-mlg";
    DecoderImplementation::AdaptiveSoftMlg, "adaptive-soft-mlg";
    DecoderImplementation::MinSum, "min-sum";
    DecoderImplementation::NormalizedMinSum, "normalized-min-sum";
    DecoderImplementation::OffsetMinSum, "offset-min-sum";
);

#[cfg(test)]
mod test {
    use super::super::{syndrome_is_zero, update_syndrome};
    use super::*;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn test_matrix() -> Arc<CheckMatrix> {
        Arc::new(CheckMatrix::from_cyclic_polynomial(15, 15, &[0, 4, 6, 7, 8]).unwrap())
    }

    fn build(implementation: DecoderImplementation) -> Box<dyn LdpcDecoder> {
        implementation
            .build_decoder(test_matrix(), 50, Some(0.2))
            .unwrap()
    }

    #[test]
    fn names_round_trip() {
        for implementation in enum_iterator::all::<DecoderImplementation>() {
            let name = implementation.to_string();
            assert_eq!(name.parse::<DecoderImplementation>(), Ok(implementation));
        }
    }

    #[test]
    fn unknown_name_rejected() {
        assert!("sum-product".parse::<DecoderImplementation>().is_err());
    }

    #[test]
    fn missing_alpha_rejected() {
        for implementation in enum_iterator::all::<DecoderImplementation>() {
            let result = implementation.build_decoder(test_matrix(), 50, None);
            if implementation.requires_alpha() {
                assert!(matches!(result.err(), Some(ConfigError::MissingAlpha(_))));
            } else {
                assert!(result.is_ok());
            }
        }
    }

    #[test]
    fn every_implementation_corrects_single_error() {
        for implementation in enum_iterator::all::<DecoderImplementation>() {
            let mut decoder = build(implementation);
            let mut samples = [1.0; 15];
            samples[3] = -0.9;
            let out = decoder.decode(&samples).unwrap();
            assert_eq!(out.codeword, vec![0; 15], "{implementation}");
        }
    }

    #[test]
    fn success_flag_matches_syndrome_on_uncorrectable_burst() {
        let h = test_matrix();
        let mut samples = [1.0; 15];
        for x in samples.iter_mut().take(6) {
            *x = -1.0;
        }
        for implementation in enum_iterator::all::<DecoderImplementation>() {
            let mut decoder = build(implementation);
            let (ok, out) = match decoder.decode(&samples) {
                Ok(out) => (true, out),
                Err(out) => (false, out),
            };
            let mut syndrome = vec![0u8; h.num_rows()];
            update_syndrome(&h, &out.codeword, &mut syndrome);
            if implementation == DecoderImplementation::OneStepMlg {
                // The one-step corrector reports success unconditionally.
                assert!(ok);
            } else {
                assert_eq!(syndrome_is_zero(&syndrome), ok, "{implementation}");
            }
        }
    }

    #[test]
    fn all_ones_decoded_when_row_weights_are_even() {
        // With even row weights the all-ones word satisfies every check, so
        // negating a noiseless all-zeros transmission must decode to it
        // immediately.
        let h = Arc::new(
            CheckMatrix::from_row_support(7, &[vec![0, 1, 2, 3], vec![0, 1, 4, 5], vec![0, 2, 4, 6]])
                .unwrap(),
        );
        for implementation in enum_iterator::all::<DecoderImplementation>() {
            let mut decoder = implementation
                .build_decoder(h.clone(), 50, Some(0.2))
                .unwrap();
            let out = decoder.decode(&[-1.0; 7]).unwrap();
            assert_eq!(out.codeword, vec![1; 7], "{implementation}");
            assert_eq!(out.iterations, 0);
        }
    }

    #[test]
    fn decoding_is_deterministic() {
        let h = test_matrix();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..10 {
            let samples = (0..15)
                .map(|_| rng.gen_range(-1.0..1.0))
                .collect::<Vec<f64>>();
            for implementation in enum_iterator::all::<DecoderImplementation>() {
                let mut first = build(implementation);
                let mut second = build(implementation);
                let a = first.decode(&samples);
                let b = second.decode(&samples);
                assert_eq!(a, b, "{implementation}");
                // A claimed success is a real codeword.
                if implementation != DecoderImplementation::OneStepMlg {
                    if let Ok(out) = a {
                        let mut syndrome = vec![0u8; h.num_rows()];
                        update_syndrome(&h, &out.codeword, &mut syndrome);
                        assert!(syndrome_is_zero(&syndrome), "{implementation}");
                    }
                }
            }
        }
    }
}
