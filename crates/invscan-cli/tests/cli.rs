use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn invscan() -> Command {
    Command::cargo_bin("invscan").unwrap()
}

/// Config pointing the CSV sink at `csv_path`; returns the config path.
fn write_config(dir: &Path, csv_path: &Path) -> String {
    let config = serde_json::json!({
        "sink": { "backend": "csv", "csv_path": csv_path },
        "ocr": { "model_dir": dir.join("no-models") },
    });
    let path = dir.join("config.json");
    fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    path.display().to_string()
}

#[test]
fn test_help_lists_commands() {
    invscan()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_config_path_honors_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.json");

    invscan()
        .args(["config", "path", "--config", &path.display().to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.json"))
        .stdout(predicate::str::contains("not created"));
}

#[test]
fn test_verbose_after_subcommand() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.json").display().to_string();

    invscan()
        .args(["config", "path", "-vv", "--config", &path])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.json"));
}

#[test]
fn test_config_init_set_get() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json").display().to_string();

    invscan()
        .args(["config", "init", "--config", &path])
        .assert()
        .success();

    invscan()
        .args(["config", "set", "lookup.timeout_secs", "30", "--config", &path])
        .assert()
        .success();

    invscan()
        .args(["config", "get", "lookup.timeout_secs", "--config", &path])
        .assert()
        .success()
        .stdout(predicate::str::diff("30\n"));

    invscan()
        .args(["config", "get", "lookup.missing", "--config", &path])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn test_list_reads_csv_table() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("inventory.csv");
    fs::write(
        &csv_path,
        "Product Number,Barcode,Ferguson Link,Home Depot Link,Lowe's Link\n\
         K-3999,012345678905,https://www.ferguson.com/p/K-3999,Not Found,Not Found\n\
         AB-12,N/A,Not Searched,Not Searched,Not Searched\n",
    )
    .unwrap();
    let config = write_config(dir.path(), &csv_path);

    invscan()
        .args(["list", "--config", &config])
        .assert()
        .success()
        .stdout(predicate::str::contains("K-3999"))
        .stdout(predicate::str::contains("2 rows"));

    invscan()
        .args(["list", "--format", "json", "--config", &config])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"product_number\": \"AB-12\""));
}

#[test]
fn test_list_creates_empty_table() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("inventory.csv");
    let config = write_config(dir.path(), &csv_path);

    invscan()
        .args(["list", "--format", "csv", "--config", &config])
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "Product Number,Barcode,Ferguson Link,Home Depot Link,Lowe's Link\n",
        ));

    assert!(csv_path.exists());
}

#[test]
fn test_scan_missing_image() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &dir.path().join("inventory.csv"));

    invscan()
        .args(["scan", "does-not-exist.png", "--no-save", "--config", &config])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Image not found"));
}

#[test]
fn test_batch_without_matches() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &dir.path().join("inventory.csv"));
    let pattern = dir.path().join("*.png").display().to_string();

    invscan()
        .args(["batch", &pattern, "--config", &config])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching images"));
}
