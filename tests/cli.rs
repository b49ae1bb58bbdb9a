//! Tests for the `fpp2pdf` binary.
//!
//! None of these need a TeX installation: runs that would typeset point the
//! engine at a name that does not exist.

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::path::Path;

const MISSING_ENGINE: &str = "fpp2pdf-test-no-such-engine";

fn fpp2pdf(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fpp2pdf").unwrap();
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("TEXRUN_ENGINE_PATH")
        .env_remove("FPP_IMAGE_ROOT")
        .env_remove("FPP_OUTPUT_DIR")
        .env_remove("FPP_ENGINE")
        .env_remove("FPP_JSON")
        .env_remove("FPP_STRICT");
    cmd
}

fn write(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

#[test]
fn empty_list_prints_message_and_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "kois.txt", "\n\n");

    fpp2pdf(dir.path())
        .arg("kois.txt")
        .assert()
        .success()
        .stdout(contains("Input List is Empty! Exiting..."));
}

#[test]
fn prompts_for_list_when_no_argument() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "kois.txt", "");

    fpp2pdf(dir.path())
        .write_stdin("kois.txt\n")
        .assert()
        .success()
        .stdout(contains("Name of Input File of KOIs?: "))
        .stdout(contains("Input List is Empty! Exiting..."));
}

#[test]
fn missing_list_file_fails() {
    let dir = tempfile::tempdir().unwrap();

    fpp2pdf(dir.path())
        .arg("nope.txt")
        .assert()
        .failure()
        .stderr(contains("Input list not found"));
}

#[test]
fn plan_only_json_reports_found_slots() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "kois.txt", "K07016.01\nK00001.01\n");
    write(dir.path(), "PNGS/K07016.01/FPPsummary.png", "png");

    let out = fpp2pdf(dir.path())
        .args(["--plan-only", "--json", "kois.txt"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let plans: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let plans = plans.as_array().unwrap();
    assert_eq!(plans.len(), 2);
    assert_eq!(plans[0]["identifier"], "K07016.01");
    assert_eq!(plans[0]["slots"].as_array().unwrap().len(), 15);
    assert_eq!(plans[0]["slots"][0]["filename"], "FPPsummary.png");
    assert_eq!(plans[0]["slots"][0]["found"], true);
    assert_eq!(plans[1]["slots"][0]["found"], false);
    assert!(!dir.path().join("K07016.01.tex").exists());
}

#[test]
fn missing_engine_still_processes_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "kois.txt", "K1.01 K2.01");

    fpp2pdf(dir.path())
        .args(["--engine", MISSING_ENGINE, "--no-progress", "-o", "out", "kois.txt"])
        .assert()
        .success()
        .stderr(contains("Rendered 0/2 reports"));

    for id in ["K1.01", "K2.01"] {
        for ext in ["tex", "aux", "out", "log"] {
            assert!(!dir.path().join("out").join(format!("{id}.{ext}")).exists());
        }
    }
}

#[test]
fn strict_mode_fails_when_reports_fail() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "kois.txt", "K1.01");

    fpp2pdf(dir.path())
        .args(["--engine", MISSING_ENGINE, "--strict", "--quiet", "kois.txt"])
        .assert()
        .failure()
        .stderr(contains("1 of 1 reports failed"));
}

#[test]
fn json_summary_lists_every_report() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "kois.txt", "K2.01\nK1.01\n");

    let out = fpp2pdf(dir.path())
        .args(["--engine", MISSING_ENGINE, "--json", "kois.txt"])
        .assert()
        .success()
        .stdout(contains("\"identifier\": \"K2.01\"").and(contains("\"passes_attempted\": 2")))
        .get_output()
        .stdout
        .clone();

    let batch: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(batch["stats"]["total_reports"], 2);
    assert_eq!(batch["reports"][1]["identifier"], "K1.01");
    assert_eq!(batch["reports"][0]["errors"].as_array().unwrap().len(), 2);
}

#[test]
fn empty_list_with_json_keeps_stdout_parseable() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "kois.txt", "  \n");

    let out = fpp2pdf(dir.path())
        .args(["--json", "kois.txt"])
        .assert()
        .success()
        .stderr(contains("Input List is Empty! Exiting..."))
        .get_output()
        .stdout
        .clone();
    let batch: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(batch["stats"]["total_reports"], 0);

    let out = fpp2pdf(dir.path())
        .args(["--plan-only", "--json", "kois.txt"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let plans: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(plans, serde_json::json!([]));
}
