//! PHS Symbolic Engine
//!
//! Small computer-algebra core used to validate Port-Hamiltonian model
//! descriptions: it turns expression text into canonical symbolic scalars
//! and matrices and renders them back as text.
//!
//! # Architecture
//!
//! - Compact coefficient representation (rational + float fallback)
//! - Immutable, shared expression trees
//! - Staged normalization pipeline run to a fixpoint
//! - Dense symbolic matrices with shape-checked algebra
//! - `sympify`: text -> tokens -> AST -> canonical [`SymValue`]

mod coeff;
mod expr;
mod matrix;
mod normalize;
mod order;
mod printer;
mod symbol;
mod sympify;
mod value;

pub use coeff::Coefficient;
pub use expr::{SymExpr, SymExprKind};
pub use matrix::SymMatrix;
pub use normalize::{NormPass, StagedNormalizer};
pub use symbol::Symbol;
pub use sympify::{sympify, sympify_matrix};
pub use value::SymValue;

/// Error type for symbolic operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SymbolicError {
    #[error(transparent)]
    Parse(#[from] phs_parser::ParseError),

    #[error("Matrix size mismatch: ({lhs_rows}, {lhs_cols}) {op} ({rhs_rows}, {rhs_cols}).")]
    ShapeMismatch {
        op: char,
        lhs_rows: usize,
        lhs_cols: usize,
        rhs_rows: usize,
        rhs_cols: usize,
    },

    #[error("mismatched dimensions: row {row} has {found} entries, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("cannot build a matrix: {0}")]
    InvalidMatrix(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("numeric overflow: result is not finite")]
    NumericOverflow,
}

pub type Result<T> = std::result::Result<T, SymbolicError>;
