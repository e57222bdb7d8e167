use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

// Helper function to get the binary path
fn get_binary_path() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    if path.ends_with("deps") {
        path.pop(); // Remove deps directory
    }
    path.push(format!("phs-validate{}", std::env::consts::EXE_SUFFIX));
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(get_binary_path())
        .args(args)
        .env_remove("PHS_VALIDATE_CONFIG")
        .env_remove("PHS_VALIDATE_EXPAND")
        .env_remove("PHS_VALIDATE_PRETTY")
        .env_remove("PHS_VALIDATE_LOG_LEVEL")
        .output()
        .expect("Failed to execute phs-validate binary")
}

fn report(output: &Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).unwrap_or_else(|e| panic!("not JSON ({e}): {stdout}"))
}

const SPRING_MASS: &[&str] = &[
    "phenomenological",
    "--statevector",
    "[x1, x2]",
    "--j",
    "[[0, 1], [-1, 0]]",
    "--r",
    "[[0, 0], [0, c]]",
    "--b",
    "[[0], [1]]",
    "--e",
    "[[1, 0], [0, 1]]",
    "--q",
    "[[1, 0], [0, 1]]",
    "--u",
    "[u]",
];

#[test]
fn test_help_command() {
    let output = run(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("phenomenological"));
    assert!(stdout.contains("structural"));
    assert!(stdout.contains("--pretty"));
    assert!(stdout.contains("PHS_VALIDATE_CONFIG"));
}

#[test]
fn test_version_command() {
    let output = run(&["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("phs-validate"));
}

#[test]
fn test_phenomenological_flags() {
    let output = run(SPRING_MASS);
    assert!(output.status.success());

    let report = report(&output);
    assert_eq!(report["hamiltonian"]["result"], "0.5*x1**2 + 0.5*x2**2");
    assert_eq!(report["isphenomenological"], true);
}

#[test]
fn test_field_errors_still_exit_zero() {
    let mut args = SPRING_MASS.to_vec();
    args[4] = "[[0, 1], [-1, 0]";
    let output = run(&args);
    assert!(output.status.success());

    let report = report(&output);
    assert_eq!(report["JMatrix"]["success"], false);
    assert_eq!(report["RMatrix"]["success"], true);
}

#[test]
fn test_structural_model_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("model.toml");
    fs::write(
        &path,
        r#"
statevector = "[q, p]"
hamiltonian = "q**2/2 + p**2/(2*m)"
hamiltonianderivatives = "[q, p/m]"
JMatrix = "[[0, 1], [-1, 0]]"
RMatrix = "[[0, 0], [0, 0]]"
BMatrix = "[[0], [1]]"
EMatrix = "[[1, 0], [0, 1]]"
QMatrix = "[[1, 0], [0, 1/m]]"
uvector = "[F]"
"#,
    )
    .unwrap();

    let output = run(&["structural", "--model", path.to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report = report(&output);
    assert_eq!(report["isphenomenological"], false);
    assert_eq!(report["hamiltonian"]["success"], true);
    assert_eq!(
        report["hamiltonianderivatives"]["result"]["elements"],
        serde_json::json!(["q", "p/m"])
    );
}

#[test]
fn test_flag_overrides_model_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("model.json");
    fs::write(
        &path,
        r#"{"statevector": "[x]", "JMatrix": "[0]", "RMatrix": "[0]", "BMatrix": "[1]",
            "EMatrix": "[1]", "QMatrix": "[[1]]", "uvector": "[u]"}"#,
    )
    .unwrap();

    let output = run(&[
        "phenomenological",
        "--model",
        path.to_str().unwrap(),
        "--q",
        "[[k]]",
    ]);
    assert!(output.status.success());
    assert_eq!(report(&output)["hamiltonian"]["result"], "0.5*k*x**2");
}

#[test]
fn test_missing_field_fails() {
    let output = run(&["phenomenological", "--statevector", "[x]"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("JMatrix"));
}

#[test]
fn test_unreadable_model_file_fails() {
    let output = run(&["structural", "--model", "/nonexistent/model.json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("model file"));
}

#[test]
fn test_pretty_flag() {
    let mut args = vec!["--pretty"];
    args.extend_from_slice(SPRING_MASS);
    let output = run(&args);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("\n  \"statevector\""));
}

#[test]
fn test_config_file_and_env_precedence() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("config.toml");
    fs::write(&config, "[validator]\npretty = true\n").unwrap();

    let mut args = vec!["--config", config.to_str().unwrap()];
    args.extend_from_slice(SPRING_MASS);
    let output = run(&args);
    assert!(String::from_utf8_lossy(&output.stdout).contains("\n  \"statevector\""));

    let output = Command::new(get_binary_path())
        .args(&args)
        .env("PHS_VALIDATE_PRETTY", "0")
        .output()
        .expect("Failed to execute phs-validate binary");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim_end().lines().count(), 1);
}

#[test]
fn test_generate_config() {
    let output = run(&["--generate-config"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[validator]"));
    assert!(stdout.contains("expand_hamiltonian = false"));
}

#[test]
fn test_rust_log_applies_without_configured_level() {
    let output = Command::new(get_binary_path())
        .args(SPRING_MASS)
        .env_remove("PHS_VALIDATE_CONFIG")
        .env_remove("PHS_VALIDATE_LOG_LEVEL")
        .env("RUST_LOG", "debug")
        .output()
        .expect("Failed to execute phs-validate binary");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Configuration loaded"));

    let mut args = vec!["--log-level", "error"];
    args.extend_from_slice(SPRING_MASS);
    let output = Command::new(get_binary_path())
        .args(&args)
        .env_remove("PHS_VALIDATE_CONFIG")
        .env_remove("PHS_VALIDATE_LOG_LEVEL")
        .env("RUST_LOG", "debug")
        .output()
        .expect("Failed to execute phs-validate binary");
    assert!(!String::from_utf8_lossy(&output.stderr).contains("Configuration loaded"));
}
