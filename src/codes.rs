//! Cyclic code definitions.
//!
//! This module parses the textual control lines that describe the cyclic
//! codes handled by the decoders. One line defines one code:
//!
//! ```text
//! <n> <k> <d_min> : <e1> <e2> ... <eR> <ortho|nonortho>
//! ```
//!
//! where `n` is the code length, `k` the number of parity checks, `d_min`
//! the minimum distance, and the exponents `e1..eR` give the nonzero
//! coefficients of the polynomial whose cyclic shifts form the rows of the
//! parity-check matrix. Lines starting with `#` and blank lines are
//! comments.

use crate::matrix::{self, CheckMatrix};
use std::str::FromStr;
use thiserror::Error;

/// Error produced when parsing a control line or file.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ParseError {
    /// The line has fewer fields than the format requires.
    #[error("control line is missing fields")]
    MissingFields,
    /// A numeric field failed to parse.
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
    /// The `:` separator between header and polynomial is missing.
    #[error("missing `:` separator")]
    MissingSeparator,
    /// The trailing orthogonality flag is not `ortho` or `nonortho`.
    #[error("invalid orthogonality flag `{0}`")]
    InvalidOrthoFlag(String),
    /// The polynomial is invalid for the declared code length.
    #[error("invalid polynomial: {0}")]
    InvalidPolynomial(#[from] matrix::Error),
    /// An error at a specific line of a control file.
    #[error("line {line}: {error}")]
    AtLine {
        /// One-based line number in the control file.
        line: usize,
        /// The underlying parse error.
        error: Box<ParseError>,
    },
}

/// Definition of a cyclic code, as read from a control line.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CodeDefinition {
    n: usize,
    num_checks: usize,
    d_min: usize,
    exponents: Vec<usize>,
    orthogonal: bool,
}

impl CodeDefinition {
    /// Returns the code length `n`.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Returns the number of parity checks `k` (rows of H).
    pub fn num_checks(&self) -> usize {
        self.num_checks
    }

    /// Returns the minimum distance declared for the code.
    pub fn d_min(&self) -> usize {
        self.d_min
    }

    /// Returns the polynomial exponents.
    pub fn exponents(&self) -> &[usize] {
        &self.exponents
    }

    /// Returns `true` if the control line declares the check sums orthogonal.
    pub fn orthogonal(&self) -> bool {
        self.orthogonal
    }

    /// Constructs the parity-check matrix for the code.
    ///
    /// The polynomial row is expanded into a bit string of length `n` and
    /// used cyclically to form all `k` rows.
    pub fn h(&self) -> Result<CheckMatrix, matrix::Error> {
        CheckMatrix::from_cyclic_polynomial(self.n, self.num_checks, &self.exponents)
    }
}

impl FromStr for CodeDefinition {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<CodeDefinition, ParseError> {
        let (header, tail) = s.split_once(':').ok_or(ParseError::MissingSeparator)?;
        let mut header = header.split_whitespace();
        let next_number = |field: Option<&str>| -> Result<usize, ParseError> {
            let field = field.ok_or(ParseError::MissingFields)?;
            field
                .parse()
                .map_err(|_| ParseError::InvalidNumber(field.to_string()))
        };
        let n = next_number(header.next())?;
        let num_checks = next_number(header.next())?;
        let d_min = next_number(header.next())?;
        let mut tail = tail.split_whitespace().collect::<Vec<_>>();
        let orthogonal = match tail.pop() {
            Some("ortho") => true,
            Some("nonortho") => false,
            Some(other) => return Err(ParseError::InvalidOrthoFlag(other.to_string())),
            None => return Err(ParseError::MissingFields),
        };
        let exponents = tail
            .iter()
            .map(|e| {
                e.parse()
                    .map_err(|_| ParseError::InvalidNumber(e.to_string()))
            })
            .collect::<Result<Vec<usize>, _>>()?;
        if exponents.is_empty() {
            return Err(ParseError::MissingFields);
        }
        for &e in &exponents {
            if e >= n {
                return Err(matrix::Error::ExponentOutOfRange { exponent: e, n }.into());
            }
        }
        Ok(CodeDefinition {
            n,
            num_checks,
            d_min,
            exponents,
            orthogonal,
        })
    }
}

/// Parses a whole control file.
///
/// Lines starting with `#` and blank lines are skipped. Errors are reported
/// with their one-based line number.
pub fn parse_control_file(text: &str) -> Result<Vec<CodeDefinition>, ParseError> {
    let mut codes = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let code = line.parse().map_err(|error| ParseError::AtLine {
            line: idx + 1,
            error: Box::new(error),
        })?;
        codes.push(code);
    }
    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_line() {
        let code: CodeDefinition = "15 7 5 : 0 4 6 7 8 ortho".parse().unwrap();
        assert_eq!(code.n(), 15);
        assert_eq!(code.num_checks(), 7);
        assert_eq!(code.d_min(), 5);
        assert_eq!(code.exponents(), &[0, 4, 6, 7, 8]);
        assert!(code.orthogonal());
        let h = code.h().unwrap();
        assert_eq!(h.num_rows(), 7);
        assert_eq!(h.num_cols(), 15);
        assert_eq!(h.uniform_row_weight(), Some(5));
    }

    #[test]
    fn parse_file_skips_comments() {
        let text = "# difference-set cyclic codes\n\n15 15 5 : 0 4 6 7 8 ortho\n21 21 6 : 0 2 7 13 16 20 nonortho\n";
        let codes = parse_control_file(text).unwrap();
        assert_eq!(codes.len(), 2);
        assert_eq!(codes[0].n(), 15);
        assert!(!codes[1].orthogonal());
    }

    #[test]
    fn missing_separator() {
        let r = "15 7 5 0 4 6 7 8 ortho".parse::<CodeDefinition>();
        assert_eq!(r, Err(ParseError::MissingSeparator));
    }

    #[test]
    fn bad_ortho_flag() {
        let r = "15 7 5 : 0 4 6 7 8 maybe".parse::<CodeDefinition>();
        assert_eq!(r, Err(ParseError::InvalidOrthoFlag("maybe".to_string())));
    }

    #[test]
    fn bad_number_reported_with_line() {
        let r = parse_control_file("# ok\n15 x 5 : 0 4 ortho\n");
        match r {
            Err(ParseError::AtLine { line, error }) => {
                assert_eq!(line, 2);
                assert_eq!(*error, ParseError::InvalidNumber("x".to_string()));
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn exponent_must_fit_code_length() {
        let r = "15 7 5 : 0 15 ortho".parse::<CodeDefinition>();
        assert!(matches!(r, Err(ParseError::InvalidPolynomial(_))));
    }
}
