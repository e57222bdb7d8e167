//! Quadratic-form Hamiltonian of a phenomenological model
//!
//! With state vector `x` and energy weighting `Q`:
//!
//! - `H = 1/2 * x^T * Q * x`, evaluated left to right as `((0.5*x^T)*Q)*x`
//! - `dH/dx = Q * x`
//!
//! Both work on the matrices parsed for the `statevector` and `QMatrix`
//! fields, never on their report text.

use phs_symbolic::{StagedNormalizer, SymExpr, SymMatrix, SymbolicError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeriveError {
    #[error("cannot derive from {field}: the field failed to parse")]
    MissingUpstream { field: &'static str },

    #[error("the quadratic form is not a scalar: product has shape ({rows}, {cols})")]
    NotScalar { rows: usize, cols: usize },

    #[error(transparent)]
    Symbolic(#[from] SymbolicError),
}

/// Derives the Hamiltonian and its gradient from parsed upstream fields
#[derive(Debug, Clone, Copy)]
pub struct QuadraticDeriver<'a> {
    state: Option<&'a SymMatrix>,
    q: Option<&'a SymMatrix>,
    expand: bool,
}

impl<'a> QuadraticDeriver<'a> {
    pub fn new(state: Option<&'a SymMatrix>, q: Option<&'a SymMatrix>) -> Self {
        QuadraticDeriver {
            state,
            q,
            expand: false,
        }
    }

    /// Multiply out products of sums in the derived entries
    pub fn expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    fn upstream(&self) -> Result<(&'a SymMatrix, &'a SymMatrix), DeriveError> {
        let state = self.state.ok_or(DeriveError::MissingUpstream {
            field: "statevector",
        })?;
        let q = self
            .q
            .ok_or(DeriveError::MissingUpstream { field: "QMatrix" })?;
        Ok((state, q))
    }

    pub fn hamiltonian(&self) -> Result<SymExpr, DeriveError> {
        let (state, q) = self.upstream()?;
        let product = state
            .transpose()
            .scale(&SymExpr::float(0.5))
            .mul(q)?
            .mul(state)?;
        let product = self.finish(product);
        let energy = product.as_scalar().cloned().ok_or(DeriveError::NotScalar {
            rows: product.rows(),
            cols: product.cols(),
        })?;
        log::debug!("hamiltonian derived: {energy}");
        Ok(energy)
    }

    pub fn gradient(&self) -> Result<SymMatrix, DeriveError> {
        let (state, q) = self.upstream()?;
        let gradient = self.finish(q.mul(state)?);
        log::debug!("hamiltonian derivatives derived: {gradient}");
        Ok(gradient)
    }

    fn finish(&self, m: SymMatrix) -> SymMatrix {
        if self.expand {
            m.normalized_with(&StagedNormalizer::aggressive())
        } else {
            m
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phs_symbolic::sympify_matrix;

    #[test]
    fn test_identity_weighting() {
        let x = sympify_matrix("[x1, x2]").unwrap();
        let q = sympify_matrix("[[1, 0], [0, 1]]").unwrap();
        let deriver = QuadraticDeriver::new(Some(&x), Some(&q));
        assert_eq!(deriver.hamiltonian().unwrap().to_string(), "0.5*x1**2 + 0.5*x2**2");
        assert_eq!(deriver.gradient().unwrap().entry_strings(), vec!["x1", "x2"]);
    }

    #[test]
    fn test_missing_upstream_is_named() {
        let q = sympify_matrix("[[1]]").unwrap();
        let err = QuadraticDeriver::new(None, Some(&q)).hamiltonian().unwrap_err();
        assert_eq!(err, DeriveError::MissingUpstream { field: "statevector" });

        let x = sympify_matrix("[x]").unwrap();
        let err = QuadraticDeriver::new(Some(&x), None).gradient().unwrap_err();
        assert!(err.to_string().contains("QMatrix"));
    }

    #[test]
    fn test_matrix_state_is_not_scalar() {
        let x = sympify_matrix("[[a, b], [c, d]]").unwrap();
        let q = sympify_matrix("[[1, 0], [0, 1]]").unwrap();
        let err = QuadraticDeriver::new(Some(&x), Some(&q)).hamiltonian().unwrap_err();
        assert_eq!(err, DeriveError::NotScalar { rows: 2, cols: 2 });
    }

    #[test]
    fn test_expansion() {
        let x = sympify_matrix("[a + b]").unwrap();
        let q = sympify_matrix("[[2]]").unwrap();
        let plain = QuadraticDeriver::new(Some(&x), Some(&q));
        assert_eq!(plain.hamiltonian().unwrap().to_string(), "(a + b)**2");

        let expanded = plain.expand(true).hamiltonian().unwrap();
        assert_eq!(expanded.to_string(), "a**2 + 2*a*b + b**2");
    }
}
