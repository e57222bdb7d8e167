use serde::{Deserialize, Serialize};

/// Knobs for a [`crate::Validator`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorOptions {
    /// Multiply out products of sums in the derived Hamiltonian fields
    pub expand_hamiltonian: bool,
    /// Pretty-print the JSON report
    pub pretty: bool,
}
