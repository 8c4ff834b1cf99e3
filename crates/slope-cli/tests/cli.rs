//! End-to-end tests for the `slope` binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn slope() -> Command {
    let mut cmd = Command::cargo_bin("slope").unwrap();
    cmd.env_remove("SLOPE_LIMIT").env_remove("SLOPE_SEED").env_remove("RUST_LOG");
    cmd
}

fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

// =============================================================================
// MINIMIZE
// =============================================================================

#[test]
fn test_help_lists_commands() {
    slope()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("minimize"))
        .stdout(predicate::str::contains("fit"));
}

#[test]
fn test_minimize_sphere_json() {
    let report = json_output(slope().args([
        "minimize",
        "--function",
        "sphere",
        "--start",
        "10,10",
        "--scheduler",
        "golden",
        "--epsilon",
        "1e-6",
        "--format",
        "json",
    ]));

    assert_eq!(report["aborted"], false);
    assert_eq!(report["scheduler"], "golden_ratio");
    assert_eq!(report["function"], "sphere");
    let last = report["trajectory"].as_array().unwrap().last().unwrap().clone();
    for coord in last.as_array().unwrap() {
        assert!(coord.as_f64().unwrap().abs() < 1e-6);
    }
}

#[test]
fn test_minimize_booth_minimal() {
    slope()
        .args([
            "minimize",
            "--function",
            "booth",
            "--scheduler",
            "dichotomy",
            "--epsilon",
            "1e-12",
            "--format",
            "minimal",
        ])
        .assert()
        .success()
        .stdout(predicate::str::diff("1.000000,3.000000\n"));
}

#[test]
fn test_maximize_in_box_ends_on_corner() {
    slope()
        .args([
            "minimize",
            "--function",
            "shifted",
            "--maximize",
            "--start",
            "1,1",
            "--lower",
            "0,0",
            "--upper",
            "5,5",
            "--scheduler",
            "constant",
            "--step",
            "0.1",
            "--format",
            "minimal",
        ])
        .assert()
        .success()
        .stdout(predicate::str::diff("0.000000,5.000000\n"));
}

#[test]
fn test_minimize_table_shows_sections() {
    slope()
        .args(["minimize", "--function", "rosenbrock", "--start", "-1.2,1", "--limit", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Optimization Result"))
        .stdout(predicate::str::contains("Hyperparameters"))
        .stdout(predicate::str::contains("Trajectory"));
}

#[test]
fn test_limit_from_environment() {
    let report = json_output(
        slope()
            .env("SLOPE_LIMIT", "3")
            .args(["minimize", "--start", "1,1", "--checker", "never", "--format", "json"]),
    );

    assert_eq!(report["aborted"], true);
    assert_eq!(report["trajectory"].as_array().unwrap().len(), 4);
}

#[test]
fn test_verbose_logs_to_stderr() {
    slope()
        .args(["--verbose", "minimize", "--start", "1,1", "--limit", "2", "--format", "minimal"])
        .assert()
        .success()
        .stderr(predicate::str::contains("descent step"));
}

#[test]
fn test_wrong_dimension_is_rejected() {
    slope()
        .args(["minimize", "--start", "1,2,3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dimension mismatch"));
}

#[test]
fn test_bad_vector_is_rejected() {
    slope()
        .args(["minimize", "--start", "1,abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid vector"));
}

// =============================================================================
// FIT
// =============================================================================

fn line_csv() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "x,y").unwrap();
    for i in 0..20 {
        let x = f64::from(i) / 10.0;
        writeln!(file, "{},{}", x, 3.0 + 2.0 * x).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn test_fit_recovers_line() {
    let file = line_csv();
    let report = json_output(slope().args([
        "fit",
        "--data",
        file.path().to_str().unwrap(),
        "--batch-size",
        "5",
        "--seed",
        "7",
        "--scheduler",
        "constant",
        "--step",
        "0.2",
        "--checker",
        "never",
        "--limit",
        "4000",
        "--format",
        "json",
    ]));

    let weights = report["weights"].as_array().unwrap();
    assert!((weights[0].as_f64().unwrap() - 3.0).abs() < 1e-2);
    assert!((weights[1].as_f64().unwrap() - 2.0).abs() < 1e-2);
    assert!(report["mse"].as_f64().unwrap() < 1e-4);
    assert_eq!(report["samples"], 20);
}

#[test]
fn test_fit_is_reproducible_with_seed() {
    let file = line_csv();
    let run = || {
        slope()
            .env("SLOPE_SEED", "11")
            .args([
                "fit",
                "--data",
                file.path().to_str().unwrap(),
                "--batch-size",
                "3",
                "--regularizer",
                "l2",
                "--lambda",
                "0.05",
                "--scheduler",
                "constant",
                "--checker",
                "never",
                "--limit",
                "200",
                "--format",
                "minimal",
            ])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone()
    };

    assert_eq!(run(), run());
}

#[test]
fn test_fit_table_lists_weights() {
    let file = line_csv();
    slope()
        .args(["fit", "--data", file.path().to_str().unwrap(), "--seed", "1", "--limit", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Weights"))
        .stdout(predicate::str::contains("bias"))
        .stdout(predicate::str::contains("w1"));
}

#[test]
fn test_fit_rejects_oversized_batch() {
    let file = line_csv();
    slope()
        .args(["fit", "--data", file.path().to_str().unwrap(), "--batch-size", "21"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("batch size"));
}

#[test]
fn test_fit_missing_file() {
    slope()
        .args(["fit", "--data", "/nonexistent/points.csv"])
        .assert()
        .failure();
}
