use std::{fs, path::PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

const SOURCE_DEFINITION: &str = "0190f5d4-3c5a-7d5e-9a41-6f1f0c2b7a10";
const DESTINATION: &str = "0190f5d4-3c5a-7d5e-9a41-6f1f0c2b7a21";
const CONNECTION: &str = "0190f5d4-3c5a-7d5e-9a41-6f1f0c2b7a40";

const STATE: &str = r#"
[[definitions]]
id = "0190f5d4-3c5a-7d5e-9a41-6f1f0c2b7a10"
role = "source"
name = "Postgres"
docker_repository = "airbyte/source-postgres"
docker_image_tag = "0.4.1"

[[definitions]]
id = "0190f5d4-3c5a-7d5e-9a41-6f1f0c2b7a12"
role = "source"
name = "GitHub"
docker_repository = "airbyte/source-github"
docker_image_tag = "0.2.3"

[[definitions]]
id = "0190f5d4-3c5a-7d5e-9a41-6f1f0c2b7a20"
role = "destination"
name = "BigQuery"
docker_repository = "airbyte/destination-bigquery"
docker_image_tag = "0.3.0"

[[instances]]
id = "0190f5d4-3c5a-7d5e-9a41-6f1f0c2b7a11"
role = "source"
definition_id = "0190f5d4-3c5a-7d5e-9a41-6f1f0c2b7a10"
name = "orders"
configuration = { host = "db.internal" }

[[instances]]
id = "0190f5d4-3c5a-7d5e-9a41-6f1f0c2b7a21"
role = "destination"
definition_id = "0190f5d4-3c5a-7d5e-9a41-6f1f0c2b7a20"
name = "warehouse"
configuration = { project_id = "analytics", credentials_json = "key-7f3a" }

[[syncs]]
connection_id = "0190f5d4-3c5a-7d5e-9a41-6f1f0c2b7a40"
name = "orders to warehouse"
source_id = "0190f5d4-3c5a-7d5e-9a41-6f1f0c2b7a11"
destination_id = "0190f5d4-3c5a-7d5e-9a41-6f1f0c2b7a21"

[[specs]]
image = "airbyte/source-postgres:0.4.1"

[specs.specification]
documentation_url = "https://docs.airbyte.io/postgres"

[specs.specification.connection_specification]
type = "object"
required = ["host"]

[specs.specification.connection_specification.properties.host]
type = "string"

[[specs]]
image = "airbyte/destination-bigquery:0.3.0"

[specs.specification]
documentation_url = "https://docs.airbyte.io/bigquery"

[specs.specification.connection_specification]
type = "object"
required = ["project_id", "credentials_json"]

[specs.specification.connection_specification.properties.project_id]
type = "string"

[specs.specification.connection_specification.properties.credentials_json]
type = "string"
airbyte_secret = true
pattern = "^key-"
"#;

fn state_file(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("state.toml");
    fs::write(&path, STATE).expect("write state");
    path
}

#[test]
fn help_lists_subcommands() {
    let mut cmd = cargo_bin_cmd!("ferryctl");
    let out = cmd.arg("--help").assert().success().get_output().stdout.clone();
    let text = String::from_utf8_lossy(&out);
    for sub in ["definitions", "spec", "validate", "validate-update", "sync", "reset"] {
        assert!(text.contains(sub), "help missing '{sub}'");
    }
}

#[test]
fn validate_help_mentions_flags() {
    let mut cmd = cargo_bin_cmd!("ferryctl");
    let out = cmd
        .arg("validate")
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8_lossy(&out);
    assert!(text.contains("--role"), "validate help missing --role");
    assert!(
        text.contains("--definition-id"),
        "validate help missing --definition-id"
    );
    assert!(text.contains("--config"), "validate help missing --config");
}

#[test]
fn definitions_are_printed_by_name() {
    let dir = TempDir::new().unwrap();
    let state = state_file(&dir);

    let mut cmd = cargo_bin_cmd!("ferryctl");
    let out = cmd
        .current_dir(dir.path())
        .arg("--state")
        .arg(&state)
        .args(["definitions", "list", "--role", "source"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8_lossy(&out);
    let names: Vec<&str> = text
        .lines()
        .filter_map(|line| line.split('\t').next())
        .collect();
    assert_eq!(names, ["GitHub", "Postgres"]);
}

#[test]
fn spec_prints_cached_specification() {
    let dir = TempDir::new().unwrap();
    let state = state_file(&dir);

    cargo_bin_cmd!("ferryctl")
        .current_dir(dir.path())
        .arg("--state")
        .arg(&state)
        .args(["spec", "--role", "source", "--definition-id", SOURCE_DEFINITION])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://docs.airbyte.io/postgres"));
}

#[test]
fn validate_reports_violations() {
    let dir = TempDir::new().unwrap();
    let state = state_file(&dir);
    let good = dir.path().join("good.json");
    let bad = dir.path().join("bad.json");
    fs::write(&good, r#"{ "host": "db.internal" }"#).unwrap();
    fs::write(&bad, r#"{ "host": 5432 }"#).unwrap();

    cargo_bin_cmd!("ferryctl")
        .current_dir(dir.path())
        .arg("--state")
        .arg(&state)
        .args(["validate", "--role", "source", "--definition-id", SOURCE_DEFINITION])
        .arg("--config")
        .arg(&good)
        .assert()
        .success()
        .stdout(predicate::str::contains("configuration is valid"));

    cargo_bin_cmd!("ferryctl")
        .current_dir(dir.path())
        .arg("--state")
        .arg(&state)
        .args(["validate", "--role", "source", "--definition-id", SOURCE_DEFINITION])
        .arg("--config")
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed validation"));
}

#[test]
fn validate_update_applies_configured_secret_mask() {
    let dir = TempDir::new().unwrap();
    let state = state_file(&dir);
    let settings = dir.path().join("settings.toml");
    fs::write(&settings, "[merge]\nsecret_mask = \"<hidden>\"\n").unwrap();
    let update = dir.path().join("update.json");
    fs::write(
        &update,
        r#"{ "project_id": "reporting", "credentials_json": "<hidden>" }"#,
    )
    .unwrap();

    let out = cargo_bin_cmd!("ferryctl")
        .current_dir(dir.path())
        .env_remove("FERRY_CONFIG_PATH")
        .env_remove("FERRY_CONFIG_JSON")
        .arg("--ferry-config")
        .arg(&settings)
        .arg("--state")
        .arg(&state)
        .args(["validate-update", "--role", "destination", "--instance-id", DESTINATION])
        .arg("--config")
        .arg(&update)
        .assert()
        .success()
        .stdout(predicate::str::contains("configuration is valid"))
        .get_output()
        .stdout
        .clone();
    assert!(!String::from_utf8_lossy(&out).contains("key-7f3a"));

    // Without the setting the placeholder is taken literally.
    cargo_bin_cmd!("ferryctl")
        .current_dir(dir.path())
        .env_remove("FERRY_CONFIG_PATH")
        .env_remove("FERRY_CONFIG_JSON")
        .arg("--state")
        .arg(&state)
        .args(["validate-update", "--role", "destination", "--instance-id", DESTINATION])
        .arg("--config")
        .arg(&update)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed validation"));
}

#[test]
fn sync_prints_job_result() {
    let dir = TempDir::new().unwrap();
    let state = state_file(&dir);

    let out = cargo_bin_cmd!("ferryctl")
        .current_dir(dir.path())
        .arg("--state")
        .arg(&state)
        .args(["sync", "--connection-id", CONNECTION])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let job: serde_json::Value = serde_json::from_slice(&out).expect("job json");
    assert_eq!(job["kind"], "sync");
    assert_eq!(job["status"], "pending");
    assert_eq!(job["config_id"], CONNECTION);
}

#[test]
fn reset_of_unknown_connection_fails() {
    let dir = TempDir::new().unwrap();
    let state = state_file(&dir);

    cargo_bin_cmd!("ferryctl")
        .current_dir(dir.path())
        .arg("--state")
        .arg(&state)
        .args([
            "reset",
            "--connection-id",
            "0190f5d4-3c5a-7d5e-9a41-6f1f0c2b7aff",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
