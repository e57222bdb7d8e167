use crate::report::{FieldReport, MatrixResult};
use phs_symbolic::{sympify, sympify_matrix, SymMatrix, SymValue, SymbolicError};

/// How a field's text is parsed and reported
pub trait FieldShape {
    /// Live value kept for derived fields
    type Parsed;
    /// What the report carries on success
    type Output;

    fn parse(text: &str) -> Result<Self::Parsed, SymbolicError>;
    fn render(parsed: &Self::Parsed) -> Self::Output;
}

/// Field parsed and coerced into a matrix
pub struct MatrixShape;

impl FieldShape for MatrixShape {
    type Parsed = SymMatrix;
    type Output = MatrixResult;

    fn parse(text: &str) -> Result<SymMatrix, SymbolicError> {
        sympify_matrix(text)
    }

    fn render(parsed: &SymMatrix) -> MatrixResult {
        MatrixResult::from(parsed)
    }
}

/// Field parsed as any value and reported as its canonical text
pub struct ScalarShape;

impl FieldShape for ScalarShape {
    type Parsed = SymValue;
    type Output = String;

    fn parse(text: &str) -> Result<SymValue, SymbolicError> {
        sympify(text)
    }

    fn render(parsed: &SymValue) -> String {
        parsed.to_string()
    }
}

pub struct ParsedField<S: FieldShape> {
    pub report: FieldReport<S::Output>,
    pub value: Option<S::Parsed>,
}

/// Parse one field, capturing any failure in its report
pub fn parse_field<S: FieldShape>(name: &str, text: &str) -> ParsedField<S> {
    match S::parse(text) {
        Ok(value) => {
            log::debug!("{name}: parsed");
            ParsedField {
                report: FieldReport::ok(S::render(&value)),
                value: Some(value),
            }
        }
        Err(err) => {
            log::debug!("{name}: {err}");
            ParsedField {
                report: FieldReport::failed(err.to_string()),
                value: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_field() {
        let field = parse_field::<MatrixShape>("JMatrix", "[[0, 1], [-1, 0]]");
        let result = field.report.result.unwrap();
        assert_eq!((result.rows, result.cols), (2, 2));
        assert_eq!(result.elements, vec!["0", "1", "-1", "0"]);
        assert!(field.value.is_some());
    }

    #[test]
    fn test_scalar_field_keeps_canonical_text() {
        let field = parse_field::<ScalarShape>("hamiltonian", "x1 * x1 / 2");
        assert_eq!(field.report.result.as_deref(), Some("x1**2/2"));
    }

    #[test]
    fn test_failure_is_captured() {
        let field = parse_field::<MatrixShape>("RMatrix", "[[1, 2], [3]]");
        assert!(!field.report.success);
        assert!(field.value.is_none());
        assert!(field.report.exception.is_some_and(|e| !e.is_empty()));
    }
}
