//! # LDPC decoders
//!
//! `ldpc_decoders` is a collection of iterative soft-input hard-output
//! decoders for LDPC block codes, organized in three algorithmic families:
//! bit-flipping (BF, WBF, MWBF, IMWBF), majority-logic (one-step and
//! iterative hard/soft/adaptive-soft MLG), and min-sum belief propagation
//! (plain, normalized and offset). All decoders consume the same sparse
//! parity-check matrix representation and share a common decode contract.

pub mod cli;
pub mod codes;
pub mod decoder;
pub mod matrix;
