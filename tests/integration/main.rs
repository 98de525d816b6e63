//! Integration tests for the floortriage CLI
//!
//! These tests drive the binary end to end: init → classify → audit review.

use assert_cmd::cargo;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SHIFT_TIME: &str = "2025-12-29T10:00:00+01:00";

/// Helper function to create a floortriage command
fn floortriage() -> assert_cmd::Command {
    assert_cmd::Command::new(cargo::cargo_bin!("floortriage"))
}

/// Helper to create an initialized plant directory
fn setup_plant() -> TempDir {
    let temp = TempDir::new().unwrap();
    floortriage()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created triage.toml"));
    temp
}

/// Classify one description in `dir`
fn classify(dir: &Path, description: &str) -> assert_cmd::assert::Assert {
    floortriage()
        .args(["classify", description, "--equipment", "BOILER-2", "--shift-time", SHIFT_TIME])
        .current_dir(dir)
        .assert()
}

// =============================================================================
// INIT
// =============================================================================

#[test]
fn test_init_writes_artifacts() {
    let temp = setup_plant();
    for file in ["triage.toml", "rules.toml", "model.toml"] {
        assert!(temp.path().join(file).exists(), "{file} missing");
    }
    assert!(temp.path().join(".triage").is_dir());
}

#[test]
fn test_init_twice_without_force() {
    let temp = setup_plant();
    floortriage()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Already initialized"));
}

// =============================================================================
// CLASSIFY
// =============================================================================

#[test]
fn test_gas_leak_is_critical() {
    let temp = setup_plant();
    classify(temp.path(), "Gas leak in boiler room")
        .success()
        .stdout(predicate::str::contains("CRITICAL"))
        .stdout(predicate::str::contains("safety override (SR-GAS)"))
        .stdout(predicate::str::contains("audit:   #1"));
}

#[test]
fn test_classify_json_output() {
    let temp = setup_plant();
    let output = floortriage()
        .args([
            "--json",
            "classify",
            "Fix broken packaging machine",
            "-e",
            "PACK-1",
            "-t",
            SHIFT_TIME,
            "--id",
            "T-42",
        ])
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let result = &json["results"][0];
    assert_eq!(result["status"], "classified");
    assert_eq!(result["suggestion"]["task_id"], "T-42");
    assert_eq!(result["audit"]["audit"], "durable");
}

#[test]
fn test_classify_requires_shift_time() {
    let temp = setup_plant();
    floortriage()
        .args(["classify", "Gas leak", "--equipment", "BOILER-2"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--shift-time"));
}

#[test]
fn test_classify_batch_input_with_malformed_record() {
    let temp = setup_plant();
    fs::write(
        temp.path().join("tasks.json"),
        r#"[
            {"id": "T-1", "description": "Minor spill at line 2", "equipment_id": "LINE-2",
             "shift_timestamp": "2025-12-29T15:00:00+01:00"},
            {"id": "T-2", "description": "Gas leak", "shift_timestamp": "2025-12-29T15:00:00+01:00"}
        ]"#,
    )
    .unwrap();

    floortriage()
        .args(["classify", "--input", "tasks.json"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("[T-1]"))
        .stdout(predicate::str::contains("REJECTED"))
        .stderr(predicate::str::contains("1 of 2 record(s) could not be classified"));
}

#[test]
fn test_site_rule_added_to_rule_table() {
    let temp = setup_plant();
    let mut rules = fs::read_to_string(temp.path().join("rules.toml")).unwrap();
    rules.push_str(
        r#"
[[rule]]
id = "SR-AMMONIA"
reason = "Ammonia release"
keywords_any = ["ammonia"]
category = "hygiene & safety"
priority = "critical"
due = "immediate"
"#,
    );
    fs::write(temp.path().join("rules.toml"), rules).unwrap();

    classify(temp.path(), "ammonia smell near compressor")
        .success()
        .stdout(predicate::str::contains("SR-AMMONIA"));
}

// =============================================================================
// AUDIT
// =============================================================================

#[test]
fn test_audit_list_and_summary() {
    let temp = setup_plant();
    classify(temp.path(), "Gas leak in boiler room").success();
    classify(temp.path(), "Organize warehouse shelves").success();

    floortriage()
        .args(["audit", "list"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("#1"))
        .stdout(predicate::str::contains("#2"));

    floortriage()
        .args(["audit", "list", "--overrides"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("#2").not());

    floortriage()
        .args(["audit", "summary"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Entries:   2"))
        .stdout(predicate::str::contains("SR-GAS"));

    let log = fs::read_to_string(temp.path().join(".triage/audit.jsonl")).unwrap();
    assert_eq!(log.lines().count(), 2);
}

#[test]
fn test_audit_show() {
    let temp = setup_plant();
    classify(temp.path(), "Gas leak in boiler room").success();

    floortriage()
        .args(["audit", "show", "1"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Audit entry #1"))
        .stdout(predicate::str::contains("plant-safety-2025.1"));

    floortriage()
        .args(["audit", "show", "7"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no audit entry #7"));
}

#[test]
fn test_audit_list_empty() {
    let temp = setup_plant();
    floortriage()
        .args(["audit", "list"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No audit entries."));
}

// =============================================================================
// RULES
// =============================================================================

#[test]
fn test_rules_list() {
    let temp = setup_plant();
    floortriage()
        .args(["rules", "list"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("plant-safety-2025.1"))
        .stdout(predicate::str::contains("[SR-GAS]"));
}

#[test]
fn test_rules_check_valid_and_invalid() {
    let temp = setup_plant();
    floortriage()
        .args(["rules", "check"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));

    fs::write(
        temp.path().join("bad.toml"),
        "version = \"bad-1\"\n[[rule]]\nid = \"SR-X\"\nreason = \"x\"\ncategory = \"safety\"\npriority = \"urgent-ish\"\ndue = \"immediate\"\nkeywords_any = [\"x\"]\n",
    )
    .unwrap();
    floortriage()
        .args(["rules", "check", "bad.toml"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("INVALID"));
}

#[test]
fn test_version() {
    floortriage()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("floortriage v"));
}
