use crate::coeff::Coefficient;
use crate::expr::SymExpr;
use crate::matrix::SymMatrix;
use crate::normalize::StagedNormalizer;
use crate::{Result, SymbolicError};
use std::fmt;

/// Result of evaluating expression text: a scalar, a (possibly nested)
/// list, or a matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymValue {
    Scalar(SymExpr),
    List(Vec<SymValue>),
    Matrix(SymMatrix),
}

impl SymValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            SymValue::Scalar(_) => "scalar",
            SymValue::List(_) => "list",
            SymValue::Matrix(_) => "matrix",
        }
    }

    pub fn as_scalar(&self) -> Option<&SymExpr> {
        match self {
            SymValue::Scalar(e) => Some(e),
            _ => None,
        }
    }

    /// Coerce into a matrix.
    ///
    /// A scalar becomes 1x1, a flat list a column vector, and a list of
    /// lists a row-major matrix. Anything nested deeper is rejected.
    pub fn into_matrix(self) -> Result<SymMatrix> {
        match self {
            SymValue::Scalar(e) => Ok(SymMatrix::scalar(e)),
            SymValue::Matrix(m) => Ok(m),
            SymValue::List(items) => list_to_matrix(items),
        }
    }

    pub fn neg(self) -> Result<SymValue> {
        match self {
            SymValue::Scalar(e) => Ok(SymValue::Scalar(canonical(SymExpr::neg(e)))),
            SymValue::Matrix(m) => Ok(SymValue::Matrix(m.scale(&SymExpr::int(-1)))),
            SymValue::List(_) => Err(unsupported("-", "list", None)),
        }
    }

    pub fn add(self, rhs: SymValue) -> Result<SymValue> {
        match (self, rhs) {
            (SymValue::Scalar(a), SymValue::Scalar(b)) => {
                Ok(SymValue::Scalar(canonical(SymExpr::add(vec![a, b]))))
            }
            (SymValue::Matrix(a), SymValue::Matrix(b)) => Ok(SymValue::Matrix(a.add(&b)?)),
            (lhs, rhs) => Err(unsupported("+", lhs.kind_name(), Some(rhs.kind_name()))),
        }
    }

    pub fn sub(self, rhs: SymValue) -> Result<SymValue> {
        match (self, rhs) {
            (SymValue::Scalar(a), SymValue::Scalar(b)) => {
                Ok(SymValue::Scalar(canonical(SymExpr::sub(a, b))))
            }
            (SymValue::Matrix(a), SymValue::Matrix(b)) => Ok(SymValue::Matrix(a.sub(&b)?)),
            (lhs, rhs) => Err(unsupported("-", lhs.kind_name(), Some(rhs.kind_name()))),
        }
    }

    pub fn mul(self, rhs: SymValue) -> Result<SymValue> {
        match (self, rhs) {
            (SymValue::Scalar(a), SymValue::Scalar(b)) => {
                Ok(SymValue::Scalar(canonical(SymExpr::mul(vec![a, b]))))
            }
            (SymValue::Scalar(s), SymValue::Matrix(m)) | (SymValue::Matrix(m), SymValue::Scalar(s)) => {
                Ok(SymValue::Matrix(m.scale(&s)))
            }
            (SymValue::Matrix(a), SymValue::Matrix(b)) => Ok(SymValue::Matrix(a.mul(&b)?)),
            (lhs, rhs) => Err(unsupported("*", lhs.kind_name(), Some(rhs.kind_name()))),
        }
    }

    pub fn div(self, rhs: SymValue) -> Result<SymValue> {
        if rhs.as_scalar().is_some_and(SymExpr::is_zero) {
            return Err(SymbolicError::DivisionByZero);
        }
        match (self, rhs) {
            (SymValue::Scalar(a), SymValue::Scalar(b)) => {
                Ok(SymValue::Scalar(canonical(SymExpr::div(a, b))))
            }
            (SymValue::Matrix(m), SymValue::Scalar(s)) => {
                Ok(SymValue::Matrix(m.scale(&SymExpr::pow(s, SymExpr::int(-1)))))
            }
            (lhs, rhs) => Err(unsupported("/", lhs.kind_name(), Some(rhs.kind_name()))),
        }
    }

    pub fn pow(self, rhs: SymValue) -> Result<SymValue> {
        match (self, rhs) {
            (SymValue::Scalar(a), SymValue::Scalar(b)) => {
                if a.is_zero() && b.as_coeff().is_some_and(Coefficient::is_negative) {
                    return Err(SymbolicError::DivisionByZero);
                }
                Ok(SymValue::Scalar(canonical(SymExpr::pow(a, b))))
            }
            (SymValue::Matrix(m), SymValue::Scalar(exp)) => {
                let n = exp.as_coeff().and_then(|c| c.as_integer()).ok_or_else(|| {
                    SymbolicError::InvalidOperation(format!(
                        "matrix power requires an integer exponent, got {exp}"
                    ))
                })?;
                Ok(SymValue::Matrix(m.pow_int(n)?))
            }
            (lhs, rhs) => Err(unsupported("**", lhs.kind_name(), Some(rhs.kind_name()))),
        }
    }

    /// True if any scalar inside the value is infinite or NaN
    pub fn has_non_finite(&self) -> bool {
        match self {
            SymValue::Scalar(e) => e.has_non_finite(),
            SymValue::List(items) => items.iter().any(SymValue::has_non_finite),
            SymValue::Matrix(m) => m.entries().iter().any(SymExpr::has_non_finite),
        }
    }
}

fn canonical(expr: SymExpr) -> SymExpr {
    StagedNormalizer::canonical().normalize(expr)
}

fn unsupported(op: &str, lhs: &str, rhs: Option<&str>) -> SymbolicError {
    let message = match rhs {
        Some(rhs) => format!("unsupported operand types for {op}: {lhs} and {rhs}"),
        None => format!("bad operand type for unary {op}: {lhs}"),
    };
    SymbolicError::InvalidOperation(message)
}

fn list_to_matrix(items: Vec<SymValue>) -> Result<SymMatrix> {
    if items.iter().all(|v| matches!(v, SymValue::Scalar(_))) {
        let entries = items
            .into_iter()
            .filter_map(|v| match v {
                SymValue::Scalar(e) => Some(e),
                _ => None,
            })
            .collect();
        return Ok(SymMatrix::column(entries));
    }

    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        let SymValue::List(row) = item else {
            return Err(SymbolicError::InvalidMatrix(format!(
                "mixed {} and list entries at the same level",
                item.kind_name()
            )));
        };
        let mut entries = Vec::with_capacity(row.len());
        for entry in row {
            match entry {
                SymValue::Scalar(e) => entries.push(e),
                other => {
                    return Err(SymbolicError::InvalidMatrix(format!(
                        "row entries must be scalars, found a {}",
                        other.kind_name()
                    )))
                }
            }
        }
        rows.push(entries);
    }
    SymMatrix::from_rows(rows)
}

impl fmt::Display for SymValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymValue::Scalar(e) => write!(f, "{e}"),
            SymValue::Matrix(m) => write!(f, "{m}"),
            SymValue::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl From<SymExpr> for SymValue {
    fn from(e: SymExpr) -> Self {
        SymValue::Scalar(e)
    }
}

impl From<SymMatrix> for SymValue {
    fn from(m: SymMatrix) -> Self {
        SymValue::Matrix(m)
    }
}
