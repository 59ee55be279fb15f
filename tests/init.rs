use std::process::Command;

#[test]
fn init_creates_valid_toml() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_gitdelta"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "gitdelta init failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let config_path = dir.path().join(".gitdelta.toml");
    assert!(config_path.exists(), ".gitdelta.toml should exist");

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[git]"));
    assert!(content.contains("[graph]"));

    let _config: gitdelta_core::DeltaConfig = toml::from_str(&content).unwrap();
}

#[test]
fn init_refuses_if_exists() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".gitdelta.toml"), "# existing").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_gitdelta"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let content = std::fs::read_to_string(dir.path().join(".gitdelta.toml")).unwrap();
    assert_eq!(content, "# existing");
}

#[test]
fn invalid_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".gitdelta.toml"), "[git]\ntimeout_secs = 0\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_gitdelta"))
        .args(["stat", "--file", "missing.txt"])
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("timeout_secs"));
}
