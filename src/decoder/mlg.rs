//! Majority-logic LDPC decoders.
//!
//! This module implements the majority-logic family: the one-step
//! majority-logic corrector and the iterative hard, soft and adaptive-soft
//! majority-logic decoders. The iterative decoders keep a saturated
//! reliability register per bit and re-derive the hard decisions from the
//! register sign after every iteration.
//!
//! All the decoders in this family require a row-regular parity-check
//! matrix: the majority threshold and the hard saturation bound are both
//! functions of the common row weight γ.

use super::{
    hard_decisions, syndrome_is_zero, two_smallest, update_syndrome, ConfigError, DecoderOutput,
    LdpcDecoder,
};
use crate::matrix::CheckMatrix;
use std::sync::Arc;

/// Bit width of the soft reliability register.
///
/// The soft saturation bounds are `±((1 << (REGISTER_BITS - 1)) - 1)`.
const REGISTER_BITS: u32 = 3;

/// One-step majority-logic corrector.
///
/// This decoder performs a single correction pass: it flips every bit for
/// which more than ⌊γ/2⌋ of its parity checks are unsatisfied. By contract
/// it always reports success, even though the corrected word may still
/// violate parity; a caller that needs the guarantee must re-check the
/// syndrome.
#[derive(Debug, Clone)]
pub struct OneStepDecoder {
    h: Arc<CheckMatrix>,
    majority: usize,
    bits: Vec<u8>,
    syndrome: Vec<u8>,
}

impl OneStepDecoder {
    /// Creates a new one-step majority-logic decoder.
    ///
    /// # Errors
    /// Returns an error if the matrix is not row-regular.
    pub fn new(h: Arc<CheckMatrix>) -> Result<OneStepDecoder, ConfigError> {
        let gamma = h
            .uniform_row_weight()
            .ok_or(ConfigError::IrregularRowWeight)?;
        let n = h.num_cols();
        let k = h.num_rows();
        Ok(OneStepDecoder {
            h,
            majority: gamma / 2,
            bits: vec![0; n],
            syndrome: vec![0; k],
        })
    }

    /// Decodes a received word with a single correction pass.
    pub fn decode(&mut self, samples: &[f64]) -> Result<DecoderOutput, DecoderOutput> {
        assert_eq!(samples.len(), self.h.num_cols());
        hard_decisions(samples, &mut self.bits);
        update_syndrome(&self.h, &self.bits, &mut self.syndrome);
        if syndrome_is_zero(&self.syndrome) {
            return Ok(DecoderOutput {
                codeword: self.bits.clone(),
                iterations: 0,
            });
        }
        for j in 0..self.h.num_cols() {
            let unsatisfied = self
                .h
                .col(j)
                .iter()
                .filter(|&&i| self.syndrome[i] == 1)
                .count();
            if unsatisfied > self.majority {
                self.bits[j] ^= 1;
            }
        }
        Ok(DecoderOutput {
            codeword: self.bits.clone(),
            iterations: 1,
        })
    }
}

impl LdpcDecoder for OneStepDecoder {
    fn decode(&mut self, samples: &[f64]) -> Result<DecoderOutput, DecoderOutput> {
        OneStepDecoder::decode(self, samples)
    }
}

/// Iterative majority-logic decoder kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kind {
    /// Hard-decision registers initialized to ±γ.
    Hard,
    /// Soft registers quantized from the channel samples, saturated to ±3.
    Soft,
    /// Soft registers with α-scaled, per-edge reliability-weighted updates.
    AdaptiveSoft {
        /// Gain applied to the weighted majority vote.
        alpha: f64,
    },
}

/// Iterative majority-logic LDPC decoder.
#[derive(Debug, Clone)]
pub struct Decoder {
    h: Arc<CheckMatrix>,
    kind: Kind,
    max_iterations: usize,
    bound: f64,
    bits: Vec<u8>,
    syndrome: Vec<u8>,
    register: Vec<f64>,
    edge_weights: Vec<f64>,
}

impl Decoder {
    /// Creates a new iterative majority-logic decoder.
    ///
    /// The saturation bound of the reliability register is γ for the hard
    /// kind and `(1 << (REGISTER_BITS - 1)) - 1` for the soft kinds.
    ///
    /// # Errors
    /// Returns an error if the matrix is not row-regular.
    pub fn new(h: Arc<CheckMatrix>, kind: Kind, max_iterations: usize) -> Result<Decoder, ConfigError> {
        let gamma = h
            .uniform_row_weight()
            .ok_or(ConfigError::IrregularRowWeight)?;
        let bound = match kind {
            Kind::Hard => gamma as f64,
            Kind::Soft | Kind::AdaptiveSoft { .. } => ((1u32 << (REGISTER_BITS - 1)) - 1) as f64,
        };
        let n = h.num_cols();
        let k = h.num_rows();
        let edge_weights = match kind {
            Kind::AdaptiveSoft { .. } => vec![f64::NAN; k * n],
            _ => Vec::new(),
        };
        Ok(Decoder {
            h,
            kind,
            max_iterations,
            bound,
            bits: vec![0; n],
            syndrome: vec![0; k],
            register: vec![0.0; n],
            edge_weights,
        })
    }

    /// Decodes a received word. See [`LdpcDecoder::decode`].
    pub fn decode(&mut self, samples: &[f64]) -> Result<DecoderOutput, DecoderOutput> {
        assert_eq!(samples.len(), self.h.num_cols());
        hard_decisions(samples, &mut self.bits);
        update_syndrome(&self.h, &self.bits, &mut self.syndrome);
        if syndrome_is_zero(&self.syndrome) {
            return Ok(self.output(0));
        }
        self.initialize_register(samples);
        if matches!(self.kind, Kind::AdaptiveSoft { .. }) {
            self.initialize_edge_weights();
        }
        for iteration in 1..=self.max_iterations {
            self.update_register();
            update_syndrome(&self.h, &self.bits, &mut self.syndrome);
            if syndrome_is_zero(&self.syndrome) {
                return Ok(self.output(iteration));
            }
        }
        Err(self.output(self.max_iterations))
    }

    fn initialize_register(&mut self, samples: &[f64]) {
        match self.kind {
            Kind::Hard => {
                for (r, &bit) in self.register.iter_mut().zip(self.bits.iter()) {
                    *r = if bit == 0 { self.bound } else { -self.bound };
                }
            }
            Kind::Soft | Kind::AdaptiveSoft { .. } => {
                for (r, &x) in self.register.iter_mut().zip(samples.iter()) {
                    *r = (x * self.bound).round().clamp(-self.bound, self.bound);
                }
            }
        }
    }

    /// Computes the per-edge reliability weights from the initial register.
    ///
    /// For every edge (i, j), the weight is the smallest register magnitude
    /// of row i excluding column j.
    fn initialize_edge_weights(&mut self) {
        let n = self.h.num_cols();
        for i in 0..self.h.num_rows() {
            let (min1, min2) = two_smallest(self.h.row(i).iter().map(|&j| self.register[j].abs()));
            for &j in self.h.row(i) {
                self.edge_weights[i * n + j] = if self.register[j].abs() == min1 {
                    min2
                } else {
                    min1
                };
            }
        }
    }

    /// Runs one majority-vote pass over the registers.
    ///
    /// The vote for bit j counts each check as +1 when it disagrees with the
    /// current decision and −1 when it agrees; the register moves against
    /// the vote and saturates at the bound, and the hard decision is
    /// re-derived from the register sign.
    fn update_register(&mut self) {
        let n = self.h.num_cols();
        for j in 0..n {
            let vote: f64 = match self.kind {
                Kind::Hard | Kind::Soft => self
                    .h
                    .col(j)
                    .iter()
                    .map(|&i| f64::from(2 * i32::from(self.syndrome[i] ^ self.bits[j]) - 1))
                    .sum(),
                Kind::AdaptiveSoft { .. } => self
                    .h
                    .col(j)
                    .iter()
                    .map(|&i| {
                        f64::from(2 * i32::from(self.syndrome[i] ^ self.bits[j]) - 1)
                            * self.edge_weights[i * n + j]
                    })
                    .sum(),
            };
            let gain = match self.kind {
                Kind::AdaptiveSoft { alpha } => alpha,
                _ => 1.0,
            };
            self.register[j] = (self.register[j] - gain * vote).clamp(-self.bound, self.bound);
            self.bits[j] = u8::from(self.register[j] < 0.0);
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
