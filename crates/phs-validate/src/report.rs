//! Per-field reports and the assembled validation report
//!
//! Serialized key order follows struct field order, so the JSON layout of
//! [`ValidationReport`] is fixed by its declaration.

use phs_symbolic::SymMatrix;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of validating one field.
///
/// Exactly one of `result` and `exception` is set, matching `success`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldReport<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
}

impl<T> FieldReport<T> {
    pub fn ok(result: T) -> Self {
        FieldReport {
            success: true,
            result: Some(result),
            exception: None,
        }
    }

    pub fn failed(exception: impl Into<String>) -> Self {
        FieldReport {
            success: false,
            result: None,
            exception: Some(exception.into()),
        }
    }

    /// Capture an error's display text as the exception
    pub fn from_result<E: fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::ok(value),
            Err(err) => Self::failed(err.to_string()),
        }
    }
}

/// Shape and row-major entry text of a parsed matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixResult {
    pub rows: usize,
    pub cols: usize,
    pub elements: Vec<String>,
}

impl MatrixResult {
    pub fn empty() -> Self {
        MatrixResult {
            rows: 0,
            cols: 0,
            elements: Vec::new(),
        }
    }
}

impl From<&SymMatrix> for MatrixResult {
    fn from(m: &SymMatrix) -> Self {
        MatrixResult {
            rows: m.rows(),
            cols: m.cols(),
            elements: m.entry_strings(),
        }
    }
}

pub type MatrixReport = FieldReport<MatrixResult>;
pub type ScalarReport = FieldReport<String>;

impl FieldReport<MatrixResult> {
    /// Successful empty matrix, used for fields that are not collected yet
    pub fn placeholder() -> Self {
        Self::ok(MatrixResult::empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub statevector: MatrixReport,
    pub hamiltonian: ScalarReport,
    #[serde(rename = "hamiltonianderivatives")]
    pub hamiltonian_derivatives: MatrixReport,
    #[serde(rename = "JMatrix")]
    pub j_matrix: MatrixReport,
    #[serde(rename = "RMatrix")]
    pub r_matrix: MatrixReport,
    #[serde(rename = "BMatrix")]
    pub b_matrix: MatrixReport,
    #[serde(rename = "BbarMatrix")]
    pub bbar_matrix: MatrixReport,
    #[serde(rename = "EMatrix")]
    pub e_matrix: MatrixReport,
    #[serde(rename = "QMatrix")]
    pub q_matrix: MatrixReport,
    #[serde(rename = "Cmatrix")]
    pub c_matrix: MatrixReport,
    #[serde(rename = "uvector")]
    pub u_vector: MatrixReport,
    pub isphenomenological: bool,
}

impl ValidationReport {
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    /// Wire names of the fields that failed, in report order
    pub fn failed_fields(&self) -> Vec<&'static str> {
        let outcomes = [
            ("statevector", self.statevector.success),
            ("hamiltonian", self.hamiltonian.success),
            ("hamiltonianderivatives", self.hamiltonian_derivatives.success),
            ("JMatrix", self.j_matrix.success),
            ("RMatrix", self.r_matrix.success),
            ("BMatrix", self.b_matrix.success),
            ("BbarMatrix", self.bbar_matrix.success),
            ("EMatrix", self.e_matrix.success),
            ("QMatrix", self.q_matrix.success),
            ("Cmatrix", self.c_matrix.success),
            ("uvector", self.u_vector.success),
        ];
        outcomes
            .into_iter()
            .filter(|(_, ok)| !ok)
            .map(|(name, _)| name)
            .collect()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed_fields().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_report_omits_result() {
        let report: ScalarReport = FieldReport::failed("boom");
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"{"success":false,"exception":"boom"}"#);
    }

    #[test]
    fn test_ok_report_omits_exception() {
        let report = MatrixReport::placeholder();
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(
            json,
            r#"{"success":true,"result":{"rows":0,"cols":0,"elements":[]}}"#
        );
    }

    #[test]
    fn test_from_result_uses_display() {
        let report: ScalarReport = FieldReport::from_result(Err::<String, _>("bad input"));
        assert!(!report.success);
        assert_eq!(report.exception.as_deref(), Some("bad input"));
    }

    #[test]
    fn test_matrix_report_reads_back_without_optional_keys() {
        let failed: MatrixReport =
            serde_json::from_str(r#"{"success":false,"exception":"boom"}"#).unwrap();
        assert_eq!(failed, FieldReport::failed("boom"));

        let ok: MatrixReport =
            serde_json::from_str(r#"{"success":true,"result":{"rows":0,"cols":0,"elements":[]}}"#)
                .unwrap();
        assert_eq!(ok, MatrixReport::placeholder());
    }
}
