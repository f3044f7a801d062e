//! Min-sum LDPC decoders.
//!
//! This module implements a flooding-schedule min-sum belief propagation
//! decoder with three check node scaling rules: plain min-sum, normalized
//! min-sum (check messages divided by α), and offset min-sum (check message
//! magnitudes reduced by α and clipped at zero).
//!
//! The variable-to-check messages `Q` and check-to-variable messages `R`
//! are kept in dense row-major tables indexed by (check, variable). Only
//! the positions inside the sparsity pattern of the parity-check matrix are
//! ever written or read; the remaining entries stay NaN so that a stray
//! out-of-pattern read shows up immediately in the output.

use super::{
    hard_decisions, syndrome_is_zero, two_smallest, update_syndrome, ConfigError, DecoderOutput,
    LdpcDecoder,
};
use crate::matrix::CheckMatrix;
use std::sync::Arc;

/// Check message scaling rule.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Scaling {
    Plain,
    Normalized(f64),
    Offset(f64),
}

/// Min-sum LDPC decoder.
#[derive(Debug, Clone)]
pub struct Decoder {
    h: Arc<CheckMatrix>,
    max_iterations: usize,
    scaling: Scaling,
    bits: Vec<u8>,
    syndrome: Vec<u8>,
    var_messages: Vec<f64>,
    check_messages: Vec<f64>,
}

impl Decoder {
    /// Creates a new min-sum decoder.
    ///
    /// `normalized` and `offset` select the check message scaling rule and
    /// are mutually exclusive; either one requires `alpha`.
    ///
    /// # Errors
    /// Returns an error if both scaling rules are requested, or if a scaling
    /// rule is requested without `alpha`.
    pub fn new(
        h: Arc<CheckMatrix>,
        max_iterations: usize,
        normalized: bool,
        offset: bool,
        alpha: Option<f64>,
    ) -> Result<Decoder, ConfigError> {
        let scaling = match (normalized, offset) {
            (true, true) => return Err(ConfigError::ScalingConflict),
            (true, false) => {
                Scaling::Normalized(alpha.ok_or(ConfigError::MissingAlpha("normalized-min-sum"))?)
            }
            (false, true) => {
                Scaling::Offset(alpha.ok_or(ConfigError::MissingAlpha("offset-min-sum"))?)
            }
            (false, false) => Scaling::Plain,
        };
        let n = h.num_cols();
        let k = h.num_rows();
        Ok(Decoder {
            h,
            max_iterations,
            scaling,
            bits: vec![0; n],
            syndrome: vec![0; k],
            var_messages: vec![f64::NAN; k * n],
            check_messages: vec![f64::NAN; k * n],
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
        self.initialize(samples);
        for iteration in 1..=self.max_iterations {
            self.process_check_nodes();
            self.process_variable_nodes(samples);
            update_syndrome(&self.h, &self.bits, &mut self.syndrome);
            if syndrome_is_zero(&self.syndrome) {
                return Ok(self.output(iteration));
            }
        }
        Err(self.output(self.max_iterations))
    }

    /// First variable messages use only the channel samples.
    fn initialize(&mut self, samples: &[f64]) {
        let n = self.h.num_cols();
        self.var_messages.fill(f64::NAN);
        self.check_messages.fill(f64::NAN);
        for i in 0..self.h.num_rows() {
            for &j in self.h.row(i) {
                self.var_messages[i * n + j] = samples[j];
            }
        }
    }

    /// Check node update with the two-minima rule.
    ///
    /// Every outgoing message carries the smallest incoming magnitude of the
    /// row excluding its own edge (the second smallest for the edge that
    /// holds the minimum) and the product of the signs of the other edges.
    fn process_check_nodes(&mut self) {
        let n = self.h.num_cols();
        for i in 0..self.h.num_rows() {
            let row = self.h.row(i);
            let (min1, min2) = two_smallest(row.iter().map(|&j| self.var_messages[i * n + j].abs()));
            let row_sign = row
                .iter()
                .fold(0, |acc, &j| acc ^ sign_bit(self.var_messages[i * n + j]));
            for &j in row {
                let q = self.var_messages[i * n + j];
                #[allow(clippy::float_cmp)]
                let magnitude = if q.abs() == min1 { min2 } else { min1 };
                let scaled = match self.scaling {
                    Scaling::Plain => magnitude,
                    Scaling::Normalized(alpha) => magnitude / alpha,
                    Scaling::Offset(alpha) => (magnitude - alpha).max(0.0),
                };
                let negative = (row_sign ^ sign_bit(q)) == 1;
                self.check_messages[i * n + j] = if negative { -scaled } else { scaled };
            }
        }
    }

    /// Variable node update: posterior hard decision and next-iteration
    /// extrinsic messages.
    fn process_variable_nodes(&mut self, samples: &[f64]) {
        let n = self.h.num_cols();
        for j in 0..n {
            let extrinsic: f64 = self
                .h
                .col(j)
                .iter()
                .map(|&i| self.check_messages[i * n + j])
                .sum();
            let posterior = samples[j] + extrinsic;
            self.bits[j] = u8::from(posterior < 0.0);
            for &i in self.h.col(j) {
                self.var_messages[i * n + j] = posterior - self.check_messages[i * n + j];
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

fn sign_bit(x: f64) -> u8 {
    u8::from(x.is_sign_negative())
}

impl LdpcDecoder for Decoder {
    fn decode(&mut self, samples: &[f64]) -> Result<DecoderOutput, DecoderOutput> {
        Decoder::decode(self, samples)
    }
}
