//! Smoke tests driving the compiled binary end to end.

use assert_cmd::Command;

fn studio(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("studio").unwrap();
    cmd.arg("--home").arg(home);
    cmd
}

#[test]
fn test_version_reports_json() {
    let tmp = tempfile::tempdir().unwrap();
    let output = studio(tmp.path())
        .args(["--json", "version"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
    assert!(value["data_dir"]
        .as_str()
        .unwrap()
        .contains(tmp.path().to_str().unwrap()));
}

#[test]
fn test_status_initializes_a_default_project() {
    let tmp = tempfile::tempdir().unwrap();
    let output = studio(tmp.path())
        .args(["--json", "status"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["project_name"], "project1");
    assert_eq!(value["files"], 3);
    assert!(tmp.path().join("projects.json").exists());
}

#[test]
fn test_missing_file_maps_to_not_found_exit_code() {
    let tmp = tempfile::tempdir().unwrap();
    let output = studio(tmp.path())
        .args(["file", "show", "nope.js"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}
