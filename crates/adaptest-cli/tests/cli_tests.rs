//! CLI integration tests using assert_cmd.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use adaptest_core::report::SimulationReport;

const SAMPLE_BANK: &str = "../../item-banks/sample.toml";

fn adaptest() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("adaptest").unwrap()
}

/// Run a small simulation into `dir` and return the report path.
fn simulate_into(dir: &Path, seed: u64) -> PathBuf {
    adaptest()
        .arg("simulate")
        .arg("--item-bank")
        .arg(SAMPLE_BANK)
        .arg("--examinees")
        .arg("12")
        .arg("--seed")
        .arg(seed.to_string())
        .arg("--parallelism")
        .arg("2")
        .arg("--output")
        .arg(dir)
        .assert()
        .success()
        .stderr(predicate::str::contains("Results saved to"));

    let mut reports: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    assert_eq!(reports.len(), 1, "expected one report in {}", dir.display());
    reports.pop().unwrap()
}

#[test]
fn validate_sample_bank() {
    adaptest()
        .arg("validate")
        .arg("--item-bank")
        .arg(SAMPLE_BANK)
        .assert()
        .success()
        .stdout(predicate::str::contains("48 items"))
        .stdout(predicate::str::contains("C1 12, C2 12, C3 12, C4 12"))
        .stdout(predicate::str::contains("All item banks valid"));
}

#[test]
fn validate_directory() {
    adaptest()
        .arg("validate")
        .arg("--item-bank")
        .arg("../../item-banks")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sample Language Bank"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bank.toml");
    std::fs::write(
        &path,
        r#"
[item_bank]
id = "warn"
name = "Warnings"

[[items]]
id = "x"
difficulty = 2.0
discrimination = 1.0
tier = "C1"

[[items]]
id = "x"
difficulty = -2.0
discrimination = 1.0
tier = "C1"
"#,
    )
    .unwrap();

    adaptest()
        .arg("validate")
        .arg("--item-bank")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] WARNING"))
        .stdout(predicate::str::contains("duplicate item ID"))
        .stdout(predicate::str::contains("warning(s) found"));
}

#[test]
fn validate_rejects_bad_parameters() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(
        &path,
        r#"
[item_bank]
id = "bad"
name = "Bad"

[[items]]
id = "neg"
difficulty = 0.0
discrimination = -1.0
"#,
    )
    .unwrap();

    adaptest()
        .arg("validate")
        .arg("--item-bank")
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("ERROR"))
        .stderr(predicate::str::contains("failed to load"));
}

#[test]
fn validate_nonexistent_file() {
    adaptest()
        .arg("validate")
        .arg("--item-bank")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    adaptest()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created adaptest.toml"))
        .stdout(predicate::str::contains("Created item-banks/example.toml"));

    assert!(dir.path().join("adaptest.toml").exists());
    assert!(dir.path().join("item-banks/example.toml").exists());

    // The generated files are usable as-is
    adaptest()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--item-bank")
        .arg("item-banks/example.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("All item banks valid"));

    adaptest()
        .current_dir(dir.path())
        .arg("purposes")
        .assert()
        .success()
        .stdout(predicate::str::contains("diagnostic (default)"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    // First init
    adaptest()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    // Second init should skip
    adaptest()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn purposes_lists_presets() {
    let dir = TempDir::new().unwrap();

    adaptest()
        .current_dir(dir.path())
        .arg("purposes")
        .assert()
        .success()
        .stdout(predicate::str::contains("screening"))
        .stdout(predicate::str::contains("placement"))
        .stdout(predicate::str::contains("formative"))
        .stdout(predicate::str::contains("diagnostic (default)"));
}

#[test]
fn purposes_rejects_invalid_override() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("adaptest.toml");
    std::fs::write(
        &config,
        "[purposes.screening]\nmin_questions = 20\nmax_questions = 10\n",
    )
    .unwrap();

    adaptest()
        .arg("purposes")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("screening"));
}

#[test]
fn simulate_writes_report() {
    let dir = TempDir::new().unwrap();
    let path = simulate_into(dir.path(), 7);

    let report = SimulationReport::load_json(&path).unwrap();
    assert_eq!(report.item_bank.id, "sample");
    assert_eq!(report.item_bank.item_count, 48);
    assert_eq!(report.sessions.len() + report.failed_sessions, 12);
    for session in &report.sessions {
        assert!(session.questions_answered >= report.config.min_questions);
        assert!(session.questions_answered <= report.config.max_questions);
    }
}

#[test]
fn simulate_rejects_unknown_purpose() {
    let dir = TempDir::new().unwrap();
    adaptest()
        .arg("simulate")
        .arg("--item-bank")
        .arg(SAMPLE_BANK)
        .arg("--purpose")
        .arg("certification")
        .arg("--output")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown test purpose"));
}

#[test]
fn simulate_rejects_inverted_theta_range() {
    let dir = TempDir::new().unwrap();
    adaptest()
        .arg("simulate")
        .arg("--item-bank")
        .arg(SAMPLE_BANK)
        .arg("--theta-min")
        .arg("1.0")
        .arg("--theta-max")
        .arg("-1.0")
        .arg("--output")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be below"));
}

#[test]
fn compare_report_with_itself() {
    let dir = TempDir::new().unwrap();
    let path = simulate_into(dir.path(), 11);

    adaptest()
        .arg("compare")
        .arg("--baseline")
        .arg(&path)
        .arg("--current")
        .arg(&path)
        .arg("--fail-on-regression")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 regressions"));
}

#[test]
fn compare_detects_regression() {
    let dir = TempDir::new().unwrap();
    let baseline_path = simulate_into(dir.path(), 3);

    let mut worse = SimulationReport::load_json(&baseline_path).unwrap();
    worse.stats.rmse = worse.stats.rmse * 2.0 + 0.1;
    let worse_path = dir.path().join("worse").join("current.json");
    worse.save_json(&worse_path).unwrap();

    adaptest()
        .arg("compare")
        .arg("--baseline")
        .arg(&baseline_path)
        .arg("--current")
        .arg(&worse_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Regressions"))
        .stdout(predicate::str::contains("rmse"));

    adaptest()
        .arg("compare")
        .arg("--baseline")
        .arg(&baseline_path)
        .arg("--current")
        .arg(&worse_path)
        .arg("--format")
        .arg("markdown")
        .assert()
        .success()
        .stdout(predicate::str::contains("| rmse |"));

    adaptest()
        .arg("compare")
        .arg("--baseline")
        .arg(&baseline_path)
        .arg("--current")
        .arg(&worse_path)
        .arg("--fail-on-regression")
        .assert()
        .failure();
}

#[test]
fn compare_nonexistent_report() {
    adaptest()
        .arg("compare")
        .arg("--baseline")
        .arg("no_such_file.json")
        .arg("--current")
        .arg("also_no_file.json")
        .assert()
        .failure();
}

#[test]
fn help_output() {
    adaptest()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("adaptive testing"));
}

#[test]
fn version_output() {
    adaptest()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("adaptest"));
}
