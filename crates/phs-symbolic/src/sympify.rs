//! Expression text to symbolic values

use crate::coeff::Coefficient;
use crate::expr::SymExpr;
use crate::matrix::SymMatrix;
use crate::value::SymValue;
use crate::{Result, SymbolicError};
use phs_parser::{BinOp, Expr, UnOp};

/// Parse `text` and evaluate it into a canonical symbolic value.
///
/// Arithmetic is evaluated as it is lowered, so `[[1, 0], [0, 1]] * 2`
/// yields a matrix and `x + x` yields `2*x`. A numeric zero divisor is
/// [`SymbolicError::DivisionByZero`]; any other infinite or NaN result is
/// [`SymbolicError::NumericOverflow`].
pub fn sympify(text: &str) -> Result<SymValue> {
    let ast = phs_parser::parse(text)?;
    let value = lower(&ast)?;
    if value.has_non_finite() {
        return Err(SymbolicError::NumericOverflow);
    }
    log::trace!("sympify({text:?}) = {value}");
    Ok(value)
}

/// [`sympify`] followed by matrix coercion
pub fn sympify_matrix(text: &str) -> Result<SymMatrix> {
    sympify(text)?.into_matrix()
}

fn lower(expr: &Expr) -> Result<SymValue> {
    match expr {
        Expr::Number(lexeme) => {
            let c = Coefficient::from_literal(lexeme).ok_or_else(|| {
                SymbolicError::InvalidOperation(format!("numeric literal out of range: {lexeme}"))
            })?;
            Ok(SymValue::Scalar(SymExpr::num(c)))
        }
        Expr::Ident(name) => Ok(SymValue::Scalar(SymExpr::var(name))),
        Expr::Unary(UnOp::Plus, inner) => lower(inner),
        Expr::Unary(UnOp::Minus, inner) => lower(inner)?.neg(),
        Expr::Binary(lhs, op, rhs) => {
            let lhs = lower(lhs)?;
            let rhs = lower(rhs)?;
            match op {
                BinOp::Add => lhs.add(rhs),
                BinOp::Sub => lhs.sub(rhs),
                BinOp::Mul => lhs.mul(rhs),
                BinOp::Div => lhs.div(rhs),
                BinOp::Pow => lhs.pow(rhs),
            }
        }
        Expr::List(items) => Ok(SymValue::List(
            items.iter().map(lower).collect::<Result<Vec<_>>>()?,
        )),
        Expr::Call(name, args) => {
            let args = args.iter().map(lower).collect::<Result<Vec<_>>>()?;
            lower_call(name, args)
        }
    }
}

fn lower_call(name: &str, args: Vec<SymValue>) -> Result<SymValue> {
    match name {
        "Matrix" => build_matrix(args).map(SymValue::Matrix),
        "sqrt" => {
            let [arg]: [SymExpr; 1] = scalar_args(name, args)?
                .try_into()
                .map_err(|_| arity_error(name, 1))?;
            SymValue::Scalar(arg).pow(SymValue::Scalar(SymExpr::rational(1, 2)))
        }
        _ => {
            let args = scalar_args(name, args)?;
            Ok(SymValue::Scalar(SymExpr::func(name, args)))
        }
    }
}

fn scalar_args(name: &str, args: Vec<SymValue>) -> Result<Vec<SymExpr>> {
    args.into_iter()
        .map(|arg| match arg {
            SymValue::Scalar(e) => Ok(e),
            other => Err(SymbolicError::InvalidOperation(format!(
                "{name}() expects scalar arguments, got a {}",
                other.kind_name()
            ))),
        })
        .collect()
}

fn arity_error(name: &str, expected: usize) -> SymbolicError {
    SymbolicError::InvalidOperation(format!("{name}() takes exactly {expected} argument(s)"))
}

/// `Matrix()`, `Matrix(entries)` or `Matrix(rows, cols, entries)`
fn build_matrix(mut args: Vec<SymValue>) -> Result<SymMatrix> {
    match args.len() {
        0 => Ok(SymMatrix::zeros(0, 0)),
        1 => args.remove(0).into_matrix(),
        3 => {
            let entries = args.remove(2).into_matrix()?;
            let rows = dimension(&args[0])?;
            let cols = dimension(&args[1])?;
            SymMatrix::new(rows, cols, entries.entries().to_vec())
        }
        n => Err(SymbolicError::InvalidMatrix(format!(
            "Matrix() takes 0, 1 or 3 arguments, got {n}"
        ))),
    }
}

fn dimension(value: &SymValue) -> Result<usize> {
    value
        .as_scalar()
        .and_then(SymExpr::as_coeff)
        .and_then(Coefficient::as_integer)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| {
            SymbolicError::InvalidMatrix(format!(
                "matrix dimensions must be non-negative integers, got {value}"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_literal() {
        assert_eq!(sympify("42").unwrap(), SymValue::Scalar(SymExpr::int(42)));
    }

    #[test]
    fn test_matrix_with_dimensions() {
        let m = sympify_matrix("Matrix(2, 2, [a, b, c, d])").unwrap();
        assert_eq!(m.shape(), (2, 2));
        assert_eq!(m.entry_strings(), vec!["a", "b", "c", "d"]);

        let empty = sympify_matrix("Matrix(0, 0, [])").unwrap();
        assert_eq!(empty.shape(), (0, 0));
    }

    #[test]
    fn test_bad_dimensions() {
        assert!(sympify("Matrix(2, 2, [a, b, c])").is_err());
        assert!(sympify("Matrix(x, 1, [a])").is_err());
        assert!(sympify("Matrix(1, 2)").is_err());
    }

    #[test]
    fn test_oversized_dimensions() {
        let err = sympify("Matrix(4294967296, 4294967296, [])").unwrap_err();
        assert!(matches!(err, SymbolicError::InvalidMatrix(_)));
    }

    #[test]
    fn test_overflow_is_not_division_by_zero() {
        assert_eq!(sympify("1e308*10").unwrap_err(), SymbolicError::NumericOverflow);
        assert_eq!(sympify("0**(-1)").unwrap_err(), SymbolicError::DivisionByZero);
        assert_eq!(sympify("Matrix([a]) / 0").unwrap_err(), SymbolicError::DivisionByZero);
    }

    #[test]
    fn test_sqrt_arity() {
        assert!(sympify("sqrt(x, y)").is_err());
        assert!(sympify("sqrt()").is_err());
    }
}
