//! Integration tests for the dialytrack binary.
//!
//! These tests verify end-to-end behavior including:
//! - Blood-pressure and UF reports
//! - Trend detection from readings files
//! - Usage limits and feature gating against the plan table
//! - Config file overrides and argument validation

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a scratch directory for config and readings files
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI binary with no user config in reach
fn cli() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dialytrack"));
    cmd.env(
        "XDG_CONFIG_HOME",
        std::env::temp_dir().join("dialytrack-tests-no-config"),
    )
    .env_remove("RUST_LOG");
    cmd
}

/// Helper to write a JSON readings file with one reading per day
fn write_readings(dir: &TempDir, systolics: &[u32]) -> std::path::PathBuf {
    let readings: Vec<serde_json::Value> = systolics
        .iter()
        .enumerate()
        .map(|(day, systolic)| {
            serde_json::json!({
                "systolic": systolic,
                "diastolic": 80,
                "taken_at": format!("2024-03-{:02}T08:00:00Z", day + 1),
                "source": "home",
            })
        })
        .collect();

    let path = dir.path().join("readings.json");
    fs::write(&path, serde_json::to_string(&readings).unwrap()).unwrap();
    path
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Dialysis health metrics and plan entitlements",
        ));
}

#[test]
fn test_bp_report() {
    cli()
        .args(["bp", "--systolic", "120", "--diastolic", "80"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Category: High (severity 3)"))
        .stdout(predicate::str::contains("MAP: 93 mmHg"));
}

#[test]
fn test_bp_normal() {
    cli()
        .args(["bp", "--systolic", "110", "--diastolic", "75"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Category: Normal (severity 1)"));
}

#[test]
fn test_bp_rejects_negative() {
    cli()
        .args(["bp", "--systolic", "-120", "--diastolic", "80"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("systolic pressure must be positive"));
}

#[test]
fn test_bp_uses_config_thresholds() {
    let temp_dir = setup_test_dir();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[blood_pressure]\nnormal_sys = 130.0\nnormal_dia = 85.0\n",
    )
    .unwrap();

    cli()
        .arg("--config")
        .arg(&config_path)
        .args(["bp", "--systolic", "125", "--diastolic", "82"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Category: Normal"));
}

#[test]
fn test_uf_report() {
    cli()
        .args(["uf", "--volume", "2000", "--weight", "70", "--duration", "240"])
        .assert()
        .success()
        .stdout(predicate::str::contains("UF rate: 7.14 ml/kg/hr"))
        .stdout(predicate::str::contains("Safety: Safe"));
}

#[test]
fn test_uf_zero_duration_reports_zero() {
    cli()
        .args(["uf", "--volume", "1500", "--weight", "70", "--duration", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("UF rate: 0.00 ml/kg/hr"));
}

#[test]
fn test_uf_risk() {
    cli()
        .args(["uf", "--volume", "3500", "--weight", "60", "--duration", "240"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Safety: Risk"));
}

#[test]
fn test_uf_unit_conversion() {
    // 2.5 L over 4 h at 154 lb (69.85 kg) = 8.95 ml/kg/hr
    cli()
        .args([
            "uf",
            "--volume",
            "2.5",
            "--volume-unit",
            "l",
            "--weight",
            "154",
            "--weight-unit",
            "lb",
            "--duration",
            "240",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("UF rate: 8.95 ml/kg/hr"));
}

#[test]
fn test_uf_rejects_negative_weight() {
    cli()
        .args(["uf", "--volume", "2000", "--weight", "-70", "--duration", "240"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("patient weight"));
}

#[test]
fn test_uf_config_bands() {
    let temp_dir = setup_test_dir();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[ultrafiltration]\nsafe_below = 7.0\ncaution_below = 9.0\n",
    )
    .unwrap();

    cli()
        .arg("--config")
        .arg(&config_path)
        .args(["uf", "--volume", "2000", "--weight", "70", "--duration", "240"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Safety: Caution"));
}

#[test]
fn test_invalid_config_fails() {
    let temp_dir = setup_test_dir();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[ultrafiltration]\nsafe_below = 15.0\ncaution_below = 9.0\n",
    )
    .unwrap();

    cli()
        .arg("--config")
        .arg(&config_path)
        .arg("plans")
        .assert()
        .failure()
        .stderr(predicate::str::contains("safe_below"));
}

#[test]
fn test_trend_rising() {
    let temp_dir = setup_test_dir();
    let path = write_readings(&temp_dir, &[120, 122, 124, 135, 138, 140]);

    cli()
        .arg("trend")
        .arg("--file")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Trend: Rising"))
        .stdout(predicate::str::contains("Latest: 140/80 mmHg"));
}

#[test]
fn test_trend_not_enough_readings() {
    let temp_dir = setup_test_dir();
    let path = write_readings(&temp_dir, &[120, 130, 140]);

    cli()
        .arg("trend")
        .arg("--file")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Not enough readings"));
}

#[test]
fn test_trend_from_csv() {
    let temp_dir = setup_test_dir();
    let path = temp_dir.path().join("readings.csv");
    fs::write(
        &path,
        "systolic,diastolic,taken_at,source\n\
         150,90,2024-03-01T08:00:00Z,pre_dialysis\n\
         152,91,2024-03-02T08:00:00Z,pre_dialysis\n\
         149,90,2024-03-03T08:00:00Z,pre_dialysis\n\
         130,82,2024-03-04T08:00:00Z,pre_dialysis\n\
         128,80,2024-03-05T08:00:00Z,pre_dialysis\n\
         131,81,2024-03-06T08:00:00Z,pre_dialysis\n",
    )
    .unwrap();

    cli()
        .arg("trend")
        .arg("--file")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Trend: Falling"));
}

#[test]
fn test_trend_missing_file_fails() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("trend")
        .arg("--file")
        .arg(temp_dir.path().join("missing.json"))
        .assert()
        .failure();
}

#[test]
fn test_usage_within_limit() {
    cli()
        .args(["usage", "--resource", "sessions", "--current", "4", "--plan", "free"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Used: 4 of 12 (33%)"))
        .stdout(predicate::str::contains("Remaining: 8"))
        .stdout(predicate::str::contains("Status: ok"))
        .stdout(predicate::str::contains("Can add another: yes"));
}

#[test]
fn test_usage_at_limit() {
    cli()
        .args(["usage", "--resource", "sessions", "--current", "12", "--plan", "free"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Status: at limit"))
        .stdout(predicate::str::contains("Can add another: no"));
}

#[test]
fn test_usage_unlimited() {
    cli()
        .args([
            "usage",
            "--resource",
            "medications",
            "--current",
            "250",
            "--plan",
            "premium",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Used: 250 (unlimited)"))
        .stdout(predicate::str::contains("Remaining: unlimited"));
}

#[test]
fn test_usage_defaults_to_free_plan() {
    cli()
        .args(["usage", "--resource", "nutrition_scans", "--current", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("on Free plan"))
        .stdout(predicate::str::contains("Can add another: no"));
}

#[test]
fn test_usage_unknown_resource() {
    cli()
        .args(["usage", "--resource", "dialyzers", "--current", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown resource"));
}

#[test]
fn test_usage_rejects_negative_count() {
    cli()
        .args(["usage", "--resource", "sessions", "--current=-1"])
        .assert()
        .failure();
}

#[test]
fn test_feature_requires_upgrade() {
    cli()
        .args(["feature", "--feature", "nutriScanAI", "--plan", "free"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Free plan does not include nutriScanAI"))
        .stdout(predicate::str::contains("Minimum plan: Premium"));
}

#[test]
fn test_feature_included() {
    cli()
        .args(["feature", "--feature", "nutriScanAI", "--plan", "premium"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Premium plan includes nutriScanAI"));
}

#[test]
fn test_feature_plan_from_config() {
    let temp_dir = setup_test_dir();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[subscription]\nplan = \"basic\"\n").unwrap();

    cli()
        .arg("--config")
        .arg(&config_path)
        .args(["feature", "--feature", "trendCharts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Basic plan includes trendCharts"));
}

#[test]
fn test_plans_listing() {
    cli()
        .arg("plans")
        .assert()
        .success()
        .stdout(predicate::str::contains("free"))
        .stdout(predicate::str::contains("$9.99/mo"))
        .stdout(predicate::str::contains("sessions unlimited"))
        .stdout(predicate::str::contains("nutriScanAI"));
}
