//! Dense symbolic matrices
//!
//! Entries are stored row-major and kept in canonical form: every
//! operation that produces new entries runs them through the canonical
//! normalizer.

use crate::expr::SymExpr;
use crate::normalize::StagedNormalizer;
use crate::{Result, SymbolicError};
use std::fmt;

/// Largest number of entries a computed matrix may hold
pub const MAX_ENTRIES: usize = 1 << 20;

/// Entry count of a `rows x cols` matrix, rejecting sizes that overflow
fn entry_count(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols).ok_or_else(|| {
        SymbolicError::InvalidMatrix(format!("a {rows}x{cols} matrix is too large"))
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymMatrix {
    rows: usize,
    cols: usize,
    data: Vec<SymExpr>,
}

impl SymMatrix {
    /// Build a matrix from row-major entries
    pub fn new(rows: usize, cols: usize, data: Vec<SymExpr>) -> Result<Self> {
        let expected = entry_count(rows, cols)?;
        if data.len() != expected {
            return Err(SymbolicError::InvalidMatrix(format!(
                "expected {expected} entries for a {rows}x{cols} matrix, got {}",
                data.len()
            )));
        }
        Ok(SymMatrix { rows, cols, data })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        SymMatrix {
            rows,
            cols,
            data: vec![SymExpr::int(0); rows * cols],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = SymExpr::int(1);
        }
        m
    }

    /// Build a matrix from a list of rows.
    ///
    /// No rows gives a 0x0 matrix; rows of unequal length are rejected.
    pub fn from_rows(rows: Vec<Vec<SymExpr>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n_cols {
                return Err(SymbolicError::RaggedMatrix {
                    row: i,
                    expected: n_cols,
                    found: row.len(),
                });
            }
            data.extend(row);
        }
        Ok(SymMatrix {
            rows: n_rows,
            cols: n_cols,
            data,
        })
    }

    /// Column vector from a flat list of entries
    pub fn column(entries: Vec<SymExpr>) -> Self {
        if entries.is_empty() {
            return Self::zeros(0, 0);
        }
        SymMatrix {
            rows: entries.len(),
            cols: 1,
            data: entries,
        }
    }

    pub fn scalar(entry: SymExpr) -> Self {
        SymMatrix {
            rows: 1,
            cols: 1,
            data: vec![entry],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&SymExpr> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col)
    }

    /// Row-major entries
    pub fn entries(&self) -> &[SymExpr] {
        &self.data
    }

    /// The single entry of a 1x1 matrix
    pub fn as_scalar(&self) -> Option<&SymExpr> {
        match self.shape() {
            (1, 1) => self.data.first(),
            _ => None,
        }
    }

    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for c in 0..self.cols {
            for r in 0..self.rows {
                data.push(self.data[r * self.cols + c].clone());
            }
        }
        SymMatrix {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }

    /// Apply `f` to every entry, then normalize
    pub fn map(&self, f: impl Fn(&SymExpr) -> SymExpr) -> Self {
        let normalizer = StagedNormalizer::canonical();
        SymMatrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|e| normalizer.normalize(f(e)))
                .collect(),
        }
    }

    /// Multiply every entry by a scalar
    pub fn scale(&self, factor: &SymExpr) -> Self {
        self.map(|e| SymExpr::mul(vec![factor.clone(), e.clone()]))
    }

    /// Re-normalize every entry with `normalizer`
    pub fn normalized_with(&self, normalizer: &StagedNormalizer) -> Self {
        SymMatrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|e| normalizer.normalize(e.clone()))
                .collect(),
        }
    }

    pub fn add(&self, rhs: &SymMatrix) -> Result<Self> {
        self.elementwise(rhs, '+', |a, b| SymExpr::add(vec![a.clone(), b.clone()]))
    }

    pub fn sub(&self, rhs: &SymMatrix) -> Result<Self> {
        self.elementwise(rhs, '-', |a, b| SymExpr::sub(a.clone(), b.clone()))
    }

    fn elementwise(
        &self,
        rhs: &SymMatrix,
        op: char,
        f: impl Fn(&SymExpr, &SymExpr) -> SymExpr,
    ) -> Result<Self> {
        if self.shape() != rhs.shape() {
            return Err(self.mismatch(op, rhs));
        }
        let normalizer = StagedNormalizer::canonical();
        let data = self
            .data
            .iter()
            .zip(&rhs.data)
            .map(|(a, b)| normalizer.normalize(f(a, b)))
            .collect();
        Ok(SymMatrix {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Matrix product; inner dimensions must agree
    pub fn mul(&self, rhs: &SymMatrix) -> Result<Self> {
        if self.cols != rhs.rows {
            return Err(self.mismatch('*', rhs));
        }
        let len = entry_count(self.rows, rhs.cols)?;
        if len > MAX_ENTRIES {
            return Err(SymbolicError::InvalidOperation(format!(
                "product of shape ({}, {}) exceeds {MAX_ENTRIES} entries",
                self.rows, rhs.cols
            )));
        }
        let normalizer = StagedNormalizer::canonical();
        let mut data = Vec::with_capacity(len);
        for r in 0..self.rows {
            for c in 0..rhs.cols {
                let terms = (0..self.cols)
                    .map(|k| {
                        SymExpr::mul(vec![
                            self.data[r * self.cols + k].clone(),
                            rhs.data[k * rhs.cols + c].clone(),
                        ])
                    })
                    .collect();
                data.push(normalizer.normalize(SymExpr::add(terms)));
            }
        }
        Ok(SymMatrix {
            rows: self.rows,
            cols: rhs.cols,
            data,
        })
    }

    /// Integer power of a square matrix by repeated squaring; the zeroth
    /// power is the identity
    pub fn pow_int(&self, exp: i64) -> Result<Self> {
        if !self.is_square() {
            return Err(SymbolicError::InvalidOperation(format!(
                "matrix power requires a square matrix, got ({}, {})",
                self.rows, self.cols
            )));
        }
        if exp < 0 {
            return Err(SymbolicError::InvalidOperation(
                "negative matrix powers are not supported".to_string(),
            ));
        }
        let mut result = Self::identity(self.rows);
        let mut base = self.clone();
        let mut exp = exp.unsigned_abs();
        while exp > 0 {
            if exp & 1 == 1 {
                result = result.mul(&base)?;
            }
            exp >>= 1;
            if exp > 0 {
                base = base.mul(&base)?;
            }
        }
        Ok(result)
    }

    /// Canonical text of every entry, row-major
    pub fn entry_strings(&self) -> Vec<String> {
        self.data.iter().map(ToString::to_string).collect()
    }

    fn mismatch(&self, op: char, rhs: &SymMatrix) -> SymbolicError {
        SymbolicError::ShapeMismatch {
            op,
            lhs_rows: self.rows,
            lhs_cols: self.cols,
            rhs_rows: rhs.rows,
            rhs_cols: rhs.cols,
        }
    }
}

impl fmt::Display for SymMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.data.is_empty() {
            return write!(f, "Matrix({}, {}, [])", self.rows, self.cols);
        }
        let rows: Vec<String> = self
            .data
            .chunks(self.cols)
            .map(|row| {
                let entries: Vec<String> = row.iter().map(ToString::to_string).collect();
                format!("[{}]", entries.join(", "))
            })
            .collect();
        write!(f, "Matrix([{}])", rows.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(names: &[&str]) -> Vec<SymExpr> {
        names.iter().map(|n| SymExpr::var(n)).collect()
    }

    #[test]
    fn test_from_rows_shapes() {
        let m = SymMatrix::from_rows(vec![vars(&["a", "b"]), vars(&["c", "d"])]).unwrap();
        assert_eq!(m.shape(), (2, 2));
        assert_eq!(m.get(1, 0), Some(&SymExpr::var("c")));
        assert_eq!(m.get(2, 0), None);

        let empty_rows = SymMatrix::from_rows(vec![vec![], vec![]]).unwrap();
        assert_eq!(empty_rows.shape(), (2, 0));
        assert_eq!(SymMatrix::from_rows(vec![]).unwrap().shape(), (0, 0));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = SymMatrix::from_rows(vec![vars(&["a", "b"]), vars(&["c"])]).unwrap_err();
        assert_eq!(
            err,
            SymbolicError::RaggedMatrix {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_transpose() {
        let m = SymMatrix::column(vars(&["x1", "x2"]));
        let t = m.transpose();
        assert_eq!(t.shape(), (1, 2));
        assert_eq!(t.entry_strings(), vec!["x1", "x2"]);
    }

    #[test]
    fn test_product_collects_terms() {
        let x = SymMatrix::column(vars(&["x", "y"]));
        let product = x.transpose().mul(&x).unwrap();
        assert_eq!(product.shape(), (1, 1));
        assert_eq!(product.entry_strings(), vec!["x**2 + y**2"]);
    }

    #[test]
    fn test_product_shape_mismatch() {
        let row = SymMatrix::column(vars(&["a", "b"])).transpose();
        let err = row.mul(&SymMatrix::identity(3)).unwrap_err();
        assert_eq!(err.to_string(), "Matrix size mismatch: (1, 2) * (3, 3).");
    }

    #[test]
    fn test_elementwise_shape_mismatch() {
        let err = SymMatrix::identity(2).add(&SymMatrix::identity(3)).unwrap_err();
        assert_eq!(err.to_string(), "Matrix size mismatch: (2, 2) + (3, 3).");
    }

    #[test]
    fn test_power() {
        let m = SymMatrix::from_rows(vec![
            vec![SymExpr::int(1), SymExpr::int(1)],
            vec![SymExpr::int(0), SymExpr::int(1)],
        ])
        .unwrap();
        assert_eq!(m.pow_int(3).unwrap().entry_strings(), vec!["1", "3", "0", "1"]);
        assert_eq!(m.pow_int(0).unwrap(), SymMatrix::identity(2));
        assert!(SymMatrix::column(vars(&["a", "b"])).pow_int(2).is_err());
    }

    #[test]
    fn test_huge_power_finishes() {
        let one = SymMatrix::scalar(SymExpr::int(1));
        assert_eq!(one.pow_int(100_000_000_000).unwrap(), one);

        let two = SymMatrix::scalar(SymExpr::int(2));
        assert_eq!(two.pow_int(10).unwrap().entry_strings(), vec!["1024"]);
        let big = two.pow_int(i64::MAX).unwrap();
        assert!(big.entries()[0].has_non_finite());
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        let err = SymMatrix::new(1 << 32, 1 << 32, vec![]).unwrap_err();
        assert!(matches!(err, SymbolicError::InvalidMatrix(_)));

        let tall = SymMatrix::new(1 << 20, 0, vec![]).unwrap();
        let wide = SymMatrix::new(0, 1 << 20, vec![]).unwrap();
        assert!(matches!(tall.mul(&wide), Err(SymbolicError::InvalidOperation(_))));
        assert_eq!(wide.mul(&tall).unwrap().shape(), (0, 0));
    }

    #[test]
    fn test_display() {
        assert_eq!(SymMatrix::identity(2).to_string(), "Matrix([[1, 0], [0, 1]])");
        assert_eq!(SymMatrix::column(vars(&["x"])).to_string(), "Matrix([[x]])");
        assert_eq!(SymMatrix::zeros(2, 0).to_string(), "Matrix(2, 0, [])");
    }
}
