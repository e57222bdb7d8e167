//! Port-Hamiltonian model validation
//!
//! Each field of a model description is parsed independently into a
//! canonical symbolic matrix or scalar. Failures are captured per field,
//! so one malformed entry never hides the outcome of another. The result
//! is a [`ValidationReport`] serialized to JSON.
//!
//! Two flavours exist:
//! - phenomenological: the Hamiltonian and its gradient are derived from
//!   the state vector and the `Q` matrix
//! - structural: the caller supplies both explicitly

mod derive;
mod field;
mod model;
mod options;
mod report;
mod validator;

pub use derive::{DeriveError, QuadraticDeriver};
pub use field::{parse_field, FieldShape, MatrixShape, ParsedField, ScalarShape};
pub use model::{PhenomenologicalModel, StructuralModel};
pub use options::ValidatorOptions;
pub use report::{FieldReport, MatrixReport, MatrixResult, ScalarReport, ValidationReport};
pub use validator::Validator;

/// Validate a phenomenological model and return the compact JSON report
pub fn check_user_phenomenological_phs(
    statevector: &str,
    j_matrix: &str,
    r_matrix: &str,
    b_matrix: &str,
    e_matrix: &str,
    q_matrix: &str,
    u_vector: &str,
) -> String {
    let model = PhenomenologicalModel {
        statevector: statevector.to_string(),
        j_matrix: j_matrix.to_string(),
        r_matrix: r_matrix.to_string(),
        b_matrix: b_matrix.to_string(),
        e_matrix: e_matrix.to_string(),
        q_matrix: q_matrix.to_string(),
        u_vector: u_vector.to_string(),
    };
    let validator = Validator::default();
    validator.render(&validator.validate_phenomenological(&model))
}

/// Validate a structural model and return the compact JSON report
#[allow(clippy::too_many_arguments)]
pub fn check_user_phs(
    statevector: &str,
    hamiltonian: &str,
    hamiltonian_derivatives: &str,
    j_matrix: &str,
    r_matrix: &str,
    b_matrix: &str,
    e_matrix: &str,
    q_matrix: &str,
    u_vector: &str,
) -> String {
    let model = StructuralModel {
        statevector: statevector.to_string(),
        hamiltonian: hamiltonian.to_string(),
        hamiltonian_derivatives: hamiltonian_derivatives.to_string(),
        j_matrix: j_matrix.to_string(),
        r_matrix: r_matrix.to_string(),
        b_matrix: b_matrix.to_string(),
        e_matrix: e_matrix.to_string(),
        q_matrix: q_matrix.to_string(),
        u_vector: u_vector.to_string(),
    };
    let validator = Validator::default();
    validator.render(&validator.validate_structural(&model))
}
