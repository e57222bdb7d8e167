//! phs-validate - check Port-Hamiltonian model descriptions
//!
//! Parses every field of a model, reports per-field success or failure,
//! and prints the JSON report on stdout.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::debug;
use phs_validate::Validator;
use std::path::PathBuf;

mod config;
mod model;

use config::{ConfigLoader, LogLevel, PhsConfig};
use model::{ModelArgs, ModelDraft};

#[derive(Parser)]
#[command(
    name = "phs-validate",
    version = env!("CARGO_PKG_VERSION"),
    about = "Validate Port-Hamiltonian model descriptions",
    after_help = r#"
Environment Variables:
  PHS_VALIDATE_CONFIG=<path>    Path to configuration file
  PHS_VALIDATE_EXPAND=1         Expand the derived Hamiltonian
  PHS_VALIDATE_PRETTY=1         Pretty-print the report
  PHS_VALIDATE_LOG_LEVEL=debug  Set log level (error, warn, info, debug, trace)
"#
)]
#[command(propagate_version = true)]
struct Cli {
    /// Pretty-print the JSON report
    #[arg(long, global = true)]
    pretty: bool,

    /// Expand products of sums in the derived Hamiltonian
    #[arg(long, global = true)]
    expand: bool,

    /// Configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Set log level
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    /// Print a sample configuration file and exit
    #[arg(long)]
    generate_config: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a model whose Hamiltonian is derived as 1/2 x^T Q x
    Phenomenological {
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Validate a model that supplies its own Hamiltonian
    Structural {
        #[command(flatten)]
        model: ModelArgs,

        /// Hamiltonian expression
        #[arg(long)]
        hamiltonian: Option<String>,

        /// Hamiltonian derivative vector
        #[arg(long)]
        hamiltonian_derivatives: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.generate_config {
        println!("{}", ConfigLoader::generate_sample_config());
        return Ok(());
    }

    let mut config = ConfigLoader::load(cli.config.as_deref())?;
    apply_cli_overrides(&mut config, &cli);

    let mut logger = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = config.logging.level {
        logger.filter_level(level.into());
    }
    logger.init();
    debug!("Configuration loaded: {config:?}");

    let Some(command) = cli.command else {
        anyhow::bail!("No command given; run with --help for usage");
    };

    let validator = Validator::new(config.validator);
    let report = match command {
        Commands::Phenomenological { model } => {
            let model = ModelDraft::from_args(&model)?.into_phenomenological()?;
            validator.validate_phenomenological(&model)
        }
        Commands::Structural {
            model,
            hamiltonian,
            hamiltonian_derivatives,
        } => {
            let model = ModelDraft::from_args(&model)?
                .with_hamiltonian(&hamiltonian, &hamiltonian_derivatives)
                .into_structural()?;
            validator.validate_structural(&model)
        }
    };

    let failed = report.failed_fields();
    if !failed.is_empty() {
        debug!("Fields with errors: {}", failed.join(", "));
    }
    println!("{}", validator.render(&report));
    Ok(())
}

fn apply_cli_overrides(config: &mut PhsConfig, cli: &Cli) {
    if cli.pretty {
        config.validator.pretty = true;
    }
    if cli.expand {
        config.validator.expand_hamiltonian = true;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = Some(level);
    }
}
