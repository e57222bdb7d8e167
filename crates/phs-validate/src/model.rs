//! Field text of the two model flavours, keyed by report field names

use serde::{Deserialize, Serialize};

/// Model whose Hamiltonian is derived from `statevector` and `QMatrix`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhenomenologicalModel {
    pub statevector: String,
    #[serde(rename = "JMatrix")]
    pub j_matrix: String,
    #[serde(rename = "RMatrix")]
    pub r_matrix: String,
    #[serde(rename = "BMatrix")]
    pub b_matrix: String,
    #[serde(rename = "EMatrix")]
    pub e_matrix: String,
    #[serde(rename = "QMatrix")]
    pub q_matrix: String,
    #[serde(rename = "uvector")]
    pub u_vector: String,
}

/// Model carrying its own Hamiltonian and derivatives
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralModel {
    pub statevector: String,
    pub hamiltonian: String,
    #[serde(rename = "hamiltonianderivatives")]
    pub hamiltonian_derivatives: String,
    #[serde(rename = "JMatrix")]
    pub j_matrix: String,
    #[serde(rename = "RMatrix")]
    pub r_matrix: String,
    #[serde(rename = "BMatrix")]
    pub b_matrix: String,
    #[serde(rename = "EMatrix")]
    pub e_matrix: String,
    #[serde(rename = "QMatrix")]
    pub q_matrix: String,
    #[serde(rename = "uvector")]
    pub u_vector: String,
}
