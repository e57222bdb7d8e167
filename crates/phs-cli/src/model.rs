//! Model input for the command line: an optional model file overlaid
//! with per-field flags

use crate::config::parse_by_extension;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use phs_validate::{PhenomenologicalModel, StructuralModel};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Field values as found in a model file; any may be absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelDraft {
    pub statevector: Option<String>,
    pub hamiltonian: Option<String>,
    #[serde(rename = "hamiltonianderivatives")]
    pub hamiltonian_derivatives: Option<String>,
    #[serde(rename = "JMatrix")]
    pub j_matrix: Option<String>,
    #[serde(rename = "RMatrix")]
    pub r_matrix: Option<String>,
    #[serde(rename = "BMatrix")]
    pub b_matrix: Option<String>,
    #[serde(rename = "EMatrix")]
    pub e_matrix: Option<String>,
    #[serde(rename = "QMatrix")]
    pub q_matrix: Option<String>,
    #[serde(rename = "uvector")]
    pub u_vector: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct ModelArgs {
    /// Model file (JSON, TOML or YAML) keyed by report field names
    #[arg(long, value_name = "FILE")]
    pub model: Option<PathBuf>,

    /// State vector, e.g. "[x1, x2]"
    #[arg(long)]
    pub statevector: Option<String>,

    /// Interconnection matrix J
    #[arg(long)]
    pub j: Option<String>,

    /// Dissipation matrix R
    #[arg(long)]
    pub r: Option<String>,

    /// Input matrix B
    #[arg(long)]
    pub b: Option<String>,

    /// Descriptor matrix E
    #[arg(long)]
    pub e: Option<String>,

    /// Energy weighting matrix Q
    #[arg(long)]
    pub q: Option<String>,

    /// Input vector u
    #[arg(long)]
    pub u: Option<String>,
}

impl ModelDraft {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read model file: {}", path.display()))?;
        parse_by_extension(path, &content, "model")
    }

    /// Start from the model file, if any, and overlay the field flags
    pub fn from_args(args: &ModelArgs) -> Result<Self> {
        let mut draft = match &args.model {
            Some(path) => Self::from_file(path)?,
            None => ModelDraft::default(),
        };
        overlay(&mut draft.statevector, &args.statevector);
        overlay(&mut draft.j_matrix, &args.j);
        overlay(&mut draft.r_matrix, &args.r);
        overlay(&mut draft.b_matrix, &args.b);
        overlay(&mut draft.e_matrix, &args.e);
        overlay(&mut draft.q_matrix, &args.q);
        overlay(&mut draft.u_vector, &args.u);
        Ok(draft)
    }

    pub fn with_hamiltonian(
        mut self,
        hamiltonian: &Option<String>,
        derivatives: &Option<String>,
    ) -> Self {
        overlay(&mut self.hamiltonian, hamiltonian);
        overlay(&mut self.hamiltonian_derivatives, derivatives);
        self
    }

    pub fn into_phenomenological(self) -> Result<PhenomenologicalModel> {
        Ok(PhenomenologicalModel {
            statevector: require(self.statevector, "statevector", "--statevector")?,
            j_matrix: require(self.j_matrix, "JMatrix", "--j")?,
            r_matrix: require(self.r_matrix, "RMatrix", "--r")?,
            b_matrix: require(self.b_matrix, "BMatrix", "--b")?,
            e_matrix: require(self.e_matrix, "EMatrix", "--e")?,
            q_matrix: require(self.q_matrix, "QMatrix", "--q")?,
            u_vector: require(self.u_vector, "uvector", "--u")?,
        })
    }

    pub fn into_structural(self) -> Result<StructuralModel> {
        Ok(StructuralModel {
            statevector: require(self.statevector, "statevector", "--statevector")?,
            hamiltonian: require(self.hamiltonian, "hamiltonian", "--hamiltonian")?,
            hamiltonian_derivatives: require(
                self.hamiltonian_derivatives,
                "hamiltonianderivatives",
                "--hamiltonian-derivatives",
            )?,
            j_matrix: require(self.j_matrix, "JMatrix", "--j")?,
            r_matrix: require(self.r_matrix, "RMatrix", "--r")?,
            b_matrix: require(self.b_matrix, "BMatrix", "--b")?,
            e_matrix: require(self.e_matrix, "EMatrix", "--e")?,
            q_matrix: require(self.q_matrix, "QMatrix", "--q")?,
            u_vector: require(self.u_vector, "uvector", "--u")?,
        })
    }
}

fn overlay(target: &mut Option<String>, flag: &Option<String>) {
    if let Some(value) = flag {
        *target = Some(value.clone());
    }
}

fn require(value: Option<String>, field: &str, flag: &str) -> Result<String> {
    value.ok_or_else(|| anyhow!("Missing field '{field}': pass {flag} or set it in the model file"))
}
