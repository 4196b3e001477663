//! Command-line tests for the extractor binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const LAYER: &str = r#"{"fields":[{"name":"id","type":"esriFieldTypeInteger"},{"name":"name","type":"esriFieldTypeString"}],
"features":[{"attributes":{"id":1,"name":"Say \"hi\""}}]}"#;

fn extractor() -> Command {
    Command::cargo_bin("copdata-extractor").unwrap()
}

#[test]
fn test_convert_command() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("Parks.json"), LAYER).unwrap();

    extractor()
        .arg("convert")
        .arg(dir.path())
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dir.path().join("csv/Parks.json.csv")).unwrap(),
        "id,name\n1,\"Say \"hi\"\"\n"
    );
}

#[test]
fn test_convert_command_strict_quoting() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("Parks.json"), LAYER).unwrap();

    extractor()
        .args(["convert", "--quoting", "rfc4180"])
        .arg(dir.path())
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dir.path().join("csv/Parks.json.csv")).unwrap(),
        "id,name\n1,\"Say \"\"hi\"\"\"\n"
    );
}

#[test]
fn test_missing_settings_file_fails() {
    let dir = TempDir::new().unwrap();

    extractor()
        .args(["run", "--no-prompt", "--config"])
        .arg(dir.path().join("absent.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("absent.yaml"));
}

#[test]
fn test_invalid_layer_override_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("extractor.yaml");
    fs::write(
        &config,
        format!(
            "layers: \"1\"\ncatalogs:\n  - language: English\n    base_url: http://127.0.0.1:9\n    layer_names: Roads\n    output_dir: \"{}\"\n",
            dir.path().join("en").display()
        ),
    )
    .unwrap();

    extractor()
        .args(["fetch", "--layers", "5-2", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("5-2"));
}
