//! # Sparse parity-check matrix representation
//!
//! This module implements the sparse binary matrix that all the decoders
//! consume. The matrix is stored as twin adjacency lists: for each row, the
//! sorted column indices holding a one, and for each column, the sorted row
//! indices holding a one. A matrix is immutable once constructed and is
//! typically shared between decoders through an [`Arc`](std::sync::Arc).

use thiserror::Error;

/// Error produced when constructing a [`CheckMatrix`].
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum Error {
    /// A column index is outside the matrix dimensions.
    #[error("column index {col} out of range in row {row} (matrix has {num_cols} columns)")]
    ColumnOutOfRange {
        /// Row containing the offending entry.
        row: usize,
        /// Offending column index.
        col: usize,
        /// Number of columns of the matrix.
        num_cols: usize,
    },
    /// A column index appears twice in the same row.
    #[error("duplicate column index {col} in row {row}")]
    DuplicateColumn {
        /// Row containing the offending entry.
        row: usize,
        /// Repeated column index.
        col: usize,
    },
    /// A cyclic polynomial definition lists no exponents.
    #[error("polynomial has no exponents")]
    EmptyPolynomial,
    /// A polynomial exponent does not fit in the code length.
    #[error("polynomial exponent {exponent} out of range for code length {n}")]
    ExponentOutOfRange {
        /// Offending exponent.
        exponent: usize,
        /// Code length.
        n: usize,
    },
}

/// A sparse binary parity-check matrix.
///
/// The matrix holds, for every row `i`, the ordered column support `K[i]`
/// (the columns where row `i` has a one), and for every column `j`, the
/// ordered row support `N[j]`. Both views are derived once at construction
/// and kept consistent: `j ∈ K[i]` if and only if `i ∈ N[j]`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CheckMatrix {
    rows: Vec<Vec<usize>>,
    cols: Vec<Vec<usize>>,
}

impl CheckMatrix {
    /// Creates a matrix from the column support of each row.
    ///
    /// Each element of `rows` lists the columns that are equal to one in that
    /// row. Indices do not need to be sorted; they are sorted internally.
    ///
    /// # Errors
    /// Returns an error if an index is out of range or repeated within a row.
    ///
    /// # Examples
    /// ```
    /// # use ldpc_decoders::matrix::CheckMatrix;
    /// let h = CheckMatrix::from_row_support(6, &[vec![0, 1, 3], vec![1, 2, 4]]).unwrap();
    /// assert_eq!(h.num_rows(), 2);
    /// assert_eq!(h.num_cols(), 6);
    /// assert_eq!(h.row(0), &[0, 1, 3]);
    /// assert_eq!(h.col(1), &[0, 1]);
    /// ```
    pub fn from_row_support(num_cols: usize, rows: &[Vec<usize>]) -> Result<CheckMatrix, Error> {
        let mut row_support = Vec::with_capacity(rows.len());
        let mut cols = vec![Vec::new(); num_cols];
        for (i, support) in rows.iter().enumerate() {
            let mut support = support.clone();
            support.sort_unstable();
            for (idx, &j) in support.iter().enumerate() {
                if j >= num_cols {
                    return Err(Error::ColumnOutOfRange {
                        row: i,
                        col: j,
                        num_cols,
                    });
                }
                if idx > 0 && support[idx - 1] == j {
                    return Err(Error::DuplicateColumn { row: i, col: j });
                }
                cols[j].push(i);
            }
            row_support.push(support);
        }
        Ok(CheckMatrix {
            rows: row_support,
            cols,
        })
    }

    /// Creates a matrix by cyclically shifting a polynomial row.
    ///
    /// The `exponents` are the nonzero coefficients of a polynomial of degree
    /// equal to the largest exponent. The polynomial is expanded left to
    /// right, from the highest exponent down to exponent zero, into a bit
    /// string of length `n` (the tail is zero padding). Row `i` of the matrix
    /// is this bit string rotated right by `i` positions, for `i` in
    /// `0..num_rows`.
    ///
    /// # Errors
    /// Returns an error if `exponents` is empty or an exponent is `>= n`.
    ///
    /// # Examples
    /// ```
    /// # use ldpc_decoders::matrix::CheckMatrix;
    /// // x^8 + x^7 + x^6 + x^4 + 1 over length 15
    /// let h = CheckMatrix::from_cyclic_polynomial(15, 15, &[0, 4, 6, 7, 8]).unwrap();
    /// assert_eq!(h.row(0), &[0, 1, 2, 4, 8]);
    /// assert_eq!(h.row(1), &[1, 2, 3, 5, 9]);
    /// assert_eq!(h.uniform_row_weight(), Some(5));
    /// ```
    pub fn from_cyclic_polynomial(
        n: usize,
        num_rows: usize,
        exponents: &[usize],
    ) -> Result<CheckMatrix, Error> {
        let &degree = exponents.iter().max().ok_or(Error::EmptyPolynomial)?;
        for &e in exponents {
            if e >= n {
                return Err(Error::ExponentOutOfRange { exponent: e, n });
            }
        }
        // Exponent e lands at position degree - e of the first row.
        let first_row = exponents.iter().map(|&e| degree - e).collect::<Vec<_>>();
        let rows = (0..num_rows)
            .map(|i| first_row.iter().map(|&p| (p + i) % n).collect())
            .collect::<Vec<_>>();
        CheckMatrix::from_row_support(n, &rows)
    }

    /// Returns the number of rows (parity checks) of the matrix.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Returns the number of columns (code length) of the matrix.
    pub fn num_cols(&self) -> usize {
        self.cols.len()
    }

    /// Returns the sorted column support of a row.
    pub fn row(&self, row: usize) -> &[usize] {
        &self.rows[row]
    }

    /// Returns the sorted row support of a column.
    pub fn col(&self, col: usize) -> &[usize] {
        &self.cols[col]
    }

    /// Returns the row weight of `row`.
    ///
    /// The row weight is defined as the number of entries equal to one in a
    /// particular row. Rows are indexed starting by zero.
    pub fn row_weight(&self, row: usize) -> usize {
        self.rows[row].len()
    }

    /// Returns the column weight of `col`.
    pub fn col_weight(&self, col: usize) -> usize {
        self.cols[col].len()
    }

    /// Returns the common row weight, if the matrix is row-regular.
    ///
    /// All rows of a regular LDPC parity-check matrix have the same weight
    /// γ. The majority-logic decoders require this; the bit-flipping and
    /// min-sum decoders tolerate irregular matrices, for which this function
    /// returns `None`.
    pub fn uniform_row_weight(&self) -> Option<usize> {
        let weight = self.rows.first().map(Vec::len)?;
        self.rows[1..]
            .iter()
            .all(|r| r.len() == weight)
            .then_some(weight)
    }
}
