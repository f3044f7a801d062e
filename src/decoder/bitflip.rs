//! Bit-flipping LDPC decoders.
//!
//! This module implements the bit-flipping family: plain bit-flipping (BF),
//! weighted bit-flipping (WBF), modified weighted bit-flipping (MWBF), and
//! improved modified weighted bit-flipping (IMWBF). The variants share one
//! iteration loop and differ in the per-bit decision metric and in the
//! reliability weights computed from the channel samples before the first
//! iteration.

use super::{
    hard_decisions, syndrome_is_zero, two_smallest, update_syndrome, DecoderOutput, LdpcDecoder,
};
use crate::matrix::CheckMatrix;
use std::sync::Arc;

/// Tie tolerance for the flip set of the weighted variants.
///
/// The plain BF metric is integer-valued and uses exact comparison instead.
const FLIP_EPSILON: f64 = 1e-3;

/// Bit-flipping decoder variant.
///
/// The variants form a chain: WBF adds check reliabilities to BF, MWBF adds
/// the α-scaled sample magnitude to WBF, and IMWBF replaces the per-check
/// reliability with a per-edge reliability that excludes the target bit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Variant {
    /// Plain bit-flipping on the unsatisfied-check count.
    Basic,
    /// Weighted bit-flipping with per-check reliabilities.
    Weighted,
    /// Modified weighted bit-flipping; α weighs the sample magnitude.
    Modified {
        /// Weighting factor for the received sample magnitude.
        alpha: f64,
    },
    /// Improved modified weighted bit-flipping with per-edge reliabilities.
    Improved {
        /// Weighting factor for the received sample magnitude.
        alpha: f64,
    },
}

/// Bit-flipping LDPC decoder.
#[derive(Debug, Clone)]
pub struct Decoder {
    h: Arc<CheckMatrix>,
    variant: Variant,
    max_iterations: usize,
    bits: Vec<u8>,
    syndrome: Vec<u8>,
    metric: Vec<f64>,
    check_weights: Vec<f64>,
    edge_weights: Vec<f64>,
}

impl Decoder {
    /// Creates a new bit-flipping decoder.
    ///
    /// The parameter `h` indicates the parity check matrix.
    pub fn new(h: Arc<CheckMatrix>, variant: Variant, max_iterations: usize) -> Decoder {
        let n = h.num_cols();
        let k = h.num_rows();
        let check_weights = match variant {
            Variant::Weighted | Variant::Modified { .. } => vec![0.0; k],
            _ => Vec::new(),
        };
        let edge_weights = match variant {
            Variant::Improved { .. } => vec![f64::NAN; k * n],
            _ => Vec::new(),
        };
        Decoder {
            h,
            variant,
            max_iterations,
            bits: vec![0; n],
            syndrome: vec![0; k],
            metric: vec![0.0; n],
            check_weights,
            edge_weights,
        }
    }

    /// Decodes a received word. See [`LdpcDecoder::decode`].
    pub fn decode(&mut self, samples: &[f64]) -> Result<DecoderOutput, DecoderOutput> {
        assert_eq!(samples.len(), self.h.num_cols());
        hard_decisions(samples, &mut self.bits);
        update_syndrome(&self.h, &self.bits, &mut self.syndrome);
        if syndrome_is_zero(&self.syndrome) {
            return Ok(self.output(0));
        }
        self.initialize_weights(samples);
        for iteration in 1..=self.max_iterations {
            self.update_metrics(samples);
            self.flip();
            update_syndrome(&self.h, &self.bits, &mut self.syndrome);
            if syndrome_is_zero(&self.syndrome) {
                return Ok(self.output(iteration));
            }
        }
        Err(self.output(self.max_iterations))
    }

    /// Computes the reliability weights from the channel samples.
    ///
    /// WBF and MWBF use the least reliable sample checked by each row. IMWBF
    /// uses, for every edge (i, j), the least reliable sample of row i
    /// excluding column j.
    fn initialize_weights(&mut self, samples: &[f64]) {
        match self.variant {
            Variant::Basic => (),
            Variant::Weighted | Variant::Modified { .. } => {
                for (i, w) in self.check_weights.iter_mut().enumerate() {
                    *w = self
                        .h
                        .row(i)
                        .iter()
                        .map(|&j| samples[j].abs())
                        .fold(f64::INFINITY, f64::min);
                }
            }
            Variant::Improved { .. } => {
                let n = self.h.num_cols();
                for i in 0..self.h.num_rows() {
                    let (min1, min2) = two_smallest(self.h.row(i).iter().map(|&j| samples[j].abs()));
                    for &j in self.h.row(i) {
                        self.edge_weights[i * n + j] =
                            if samples[j].abs() == min1 { min2 } else { min1 };
                    }
                }
            }
        }
    }

    fn update_metrics(&mut self, samples: &[f64]) {
        let n = self.h.num_cols();
        for j in 0..n {
            self.metric[j] = match self.variant {
                Variant::Basic => self
                    .h
                    .col(j)
                    .iter()
                    .map(|&i| f64::from(self.syndrome[i]))
                    .sum(),
                Variant::Weighted => self.weighted_sum(j),
                Variant::Modified { alpha } => -alpha * samples[j].abs() + self.weighted_sum(j),
                Variant::Improved { alpha } => {
                    -alpha * samples[j].abs()
                        + self
                            .h
                            .col(j)
                            .iter()
                            .map(|&i| {
                                f64::from(2 * i32::from(self.syndrome[i]) - 1)
                                    * self.edge_weights[i * n + j]
                            })
                            .sum::<f64>()
                }
            };
        }
    }

    fn weighted_sum(&self, j: usize) -> f64 {
        self.h
            .col(j)
            .iter()
            .map(|&i| f64::from(2 * i32::from(self.syndrome[i]) - 1) * self.check_weights[i])
            .sum()
    }

    /// Flips every bit whose metric reaches the maximum.
    ///
    /// All the bits attaining the maximum flip simultaneously. The plain BF
    /// metric is integer-valued and ties are exact; the weighted metrics are
    /// real-valued and tie within [`FLIP_EPSILON`].
    fn flip(&mut self) {
        let threshold = self
            .metric
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let exact = matches!(self.variant, Variant::Basic);
        for (j, &e) in self.metric.iter().enumerate() {
            #[allow(clippy::float_cmp)]
            let flip = if exact {
                e == threshold
            } else {
                threshold - e < FLIP_EPSILON
            };
            if flip {
                self.bits[j] ^= 1;
            }
        }
    }

    fn output(&self, iterations: usize) -> DecoderOutput {
        DecoderOutput {
            codeword: self.bits.clone(),
            iterations,
        }
    }
}

impl LdpcDecoder for Decoder {
    fn decode(&mut self, samples: &[f64]) -> Result<DecoderOutput, DecoderOutput> {
        Decoder::decode(self, samples)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn test_matrix() -> Arc<CheckMatrix> {
        // All cyclic shifts of x^8 + x^7 + x^6 + x^4 + 1 over length 15.
        Arc::new(CheckMatrix::from_cyclic_polynomial(15, 15, &[0, 4, 6, 7, 8]).unwrap())
    }

    fn variants() -> Vec<Variant> {
        vec![
            Variant::Basic,
            Variant::Weighted,
            Variant::Modified { alpha: 0.2 },
            Variant::Improved { alpha: 0.2 },
        ]
    }

    #[test]
    fn all_positive_input() {
        for variant in variants() {
            let mut decoder = Decoder::new(test_matrix(), variant, 50);
            let DecoderOutput {
                codeword,
                iterations,
            } = decoder.decode(&[1.0; 15]).unwrap();
            assert_eq!(codeword, vec![0; 15]);
            assert_eq!(iterations, 0);
        }
    }

    #[test]
    fn single_error_corrected() {
        for variant in variants() {
            let mut decoder = Decoder::new(test_matrix(), variant, 50);
            let mut samples = [1.0; 15];
            samples[3] = -0.9;
            let DecoderOutput {
                codeword,
                iterations,
            } = decoder.decode(&samples).unwrap();
            assert_eq!(codeword, vec![0; 15], "variant {variant:?}");
            assert_eq!(iterations, 1);
        }
    }

    #[test]
    fn two_weak_errors_corrected_by_weighted_variants() {
        for variant in [
            Variant::Weighted,
            Variant::Modified { alpha: 0.2 },
            Variant::Improved { alpha: 0.2 },
        ] {
            let mut decoder = Decoder::new(test_matrix(), variant, 50);
            let mut samples = [0.2; 15];
            samples[3] = -0.15;
            samples[9] = -0.15;
            let DecoderOutput {
                codeword,
                iterations,
            } = decoder.decode(&samples).unwrap();
            assert_eq!(codeword, vec![0; 15], "variant {variant:?}");
            assert_eq!(iterations, 1);
        }
    }

    #[test]
    fn success_flag_matches_syndrome() {
        // Two equal-magnitude errors give plain BF no reliability information
        // to work with; whatever it returns, the flag must agree with the
        // syndrome of the returned word.
        let h = test_matrix();
        let mut decoder = Decoder::new(h.clone(), Variant::Basic, 50);
        let mut samples = [0.2; 15];
        samples[3] = -0.15;
        samples[9] = -0.15;
        let (ok, out) = match decoder.decode(&samples) {
            Ok(out) => (true, out),
            Err(out) => (false, out),
        };
        let mut syndrome = vec![0u8; h.num_rows()];
        update_syndrome(&h, &out.codeword, &mut syndrome);
        assert_eq!(syndrome_is_zero(&syndrome), ok);
    }

    #[test]
    fn zero_iteration_budget() {
        let mut decoder = Decoder::new(test_matrix(), Variant::Basic, 0);
        let mut samples = [1.0; 15];
        samples[3] = -0.9;
        let out = decoder.decode(&samples).unwrap_err();
        assert_eq!(out.iterations, 0);
        // The hard decision is returned untouched.
        let mut expected = vec![0u8; 15];
        expected[3] = 1;
        assert_eq!(out.codeword, expected);
    }

    #[test]
    fn repeated_decodes_are_identical() {
        let mut decoder = Decoder::new(test_matrix(), Variant::Improved { alpha: 0.2 }, 50);
        let mut samples = [0.2; 15];
        samples[3] = -0.15;
        samples[9] = -0.15;
        let first = decoder.decode(&samples);
        let second = decoder.decode(&samples);
        assert_eq!(first, second);
    }
}
