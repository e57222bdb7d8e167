use crate::derive::QuadraticDeriver;
use crate::field::{parse_field, MatrixShape, ScalarShape};
use crate::model::{PhenomenologicalModel, StructuralModel};
use crate::options::ValidatorOptions;
use crate::report::{FieldReport, MatrixReport, MatrixResult, ValidationReport};

/// Stateless validator; every call builds a fresh report
#[derive(Debug, Clone, Default)]
pub struct Validator {
    options: ValidatorOptions,
}

impl Validator {
    pub fn new(options: ValidatorOptions) -> Self {
        Validator { options }
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    pub fn validate_phenomenological(&self, model: &PhenomenologicalModel) -> ValidationReport {
        log::debug!("validating phenomenological model");
        let state = parse_field::<MatrixShape>("statevector", &model.statevector);
        let j = parse_field::<MatrixShape>("JMatrix", &model.j_matrix);
        let r = parse_field::<MatrixShape>("RMatrix", &model.r_matrix);
        let b = parse_field::<MatrixShape>("BMatrix", &model.b_matrix);
        let e = parse_field::<MatrixShape>("EMatrix", &model.e_matrix);
        let q = parse_field::<MatrixShape>("QMatrix", &model.q_matrix);
        let u = parse_field::<MatrixShape>("uvector", &model.u_vector);

        let deriver = QuadraticDeriver::new(state.value.as_ref(), q.value.as_ref())
            .expand(self.options.expand_hamiltonian);
        let hamiltonian =
            FieldReport::from_result(deriver.hamiltonian().map(|h| h.to_string()));
        let derivatives =
            FieldReport::from_result(deriver.gradient().map(|g| MatrixResult::from(&g)));

        ValidationReport {
            statevector: state.report,
            hamiltonian,
            hamiltonian_derivatives: derivatives,
            j_matrix: j.report,
            r_matrix: r.report,
            b_matrix: b.report,
            bbar_matrix: MatrixReport::placeholder(),
            e_matrix: e.report,
            q_matrix: q.report,
            c_matrix: MatrixReport::placeholder(),
            u_vector: u.report,
            isphenomenological: true,
        }
    }

    pub fn validate_structural(&self, model: &StructuralModel) -> ValidationReport {
        log::debug!("validating structural model");
        ValidationReport {
            statevector: parse_field::<MatrixShape>("statevector", &model.statevector).report,
            hamiltonian: parse_field::<ScalarShape>("hamiltonian", &model.hamiltonian).report,
            hamiltonian_derivatives: parse_field::<MatrixShape>(
                "hamiltonianderivatives",
                &model.hamiltonian_derivatives,
            )
            .report,
            j_matrix: parse_field::<MatrixShape>("JMatrix", &model.j_matrix).report,
            r_matrix: parse_field::<MatrixShape>("RMatrix", &model.r_matrix).report,
            b_matrix: parse_field::<MatrixShape>("BMatrix", &model.b_matrix).report,
            bbar_matrix: MatrixReport::placeholder(),
            e_matrix: parse_field::<MatrixShape>("EMatrix", &model.e_matrix).report,
            q_matrix: parse_field::<MatrixShape>("QMatrix", &model.q_matrix).report,
            c_matrix: MatrixReport::placeholder(),
            u_vector: parse_field::<MatrixShape>("uvector", &model.u_vector).report,
            isphenomenological: false,
        }
    }

    /// Serialize `report` per the `pretty` option.
    ///
    /// Always yields JSON: a serialization failure becomes
    /// `{"success": false, "exception": ...}`.
    pub fn render(&self, report: &ValidationReport) -> String {
        report.to_json(self.options.pretty).unwrap_or_else(|err| {
            log::warn!("failed to serialize validation report: {err}");
            serde_json::json!({ "success": false, "exception": err.to_string() }).to_string()
        })
    }
}
