use std::error::Error;
use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn cli() -> Result<Command, Box<dyn Error>> {
    Ok(Command::cargo_bin("lsldetails-cli")?)
}

#[test]
fn export_writes_default_preferences() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let output = workspace.path().join("exported").join("prefs.json");

    cli()?
        .args([
            "--workspace",
            workspace.path().to_str().unwrap(),
            "preferences",
            "export",
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported preferences"));

    let exported: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output)?)?;
    assert_eq!(exported["caption"]["marker_suffix"], "*");
    assert_eq!(exported["enumeration"]["batch_size"], 1);
    assert_eq!(exported["output"]["pane_caption"], "Lightweight solution load");
    Ok(())
}

#[test]
fn import_replaces_workspace_preferences() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let source = workspace.path().join("incoming.json");
    fs::write(&source, r#"{ "enumeration": { "batch_size": 4 } }"#)?;

    cli()?
        .args([
            "--workspace",
            workspace.path().to_str().unwrap(),
            "preferences",
            "import",
            source.to_str().unwrap(),
        ])
        .assert()
        .success();

    let stored = workspace.path().join(".lsldetails").join("preferences.json");
    let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(stored)?)?;
    assert_eq!(saved["enumeration"]["batch_size"], 4);
    Ok(())
}

#[test]
fn import_rejects_missing_file() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let missing = workspace.path().join("nope.json");

    cli()?
        .args([
            "--workspace",
            workspace.path().to_str().unwrap(),
            "preferences",
            "import",
            missing.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
    Ok(())
}
