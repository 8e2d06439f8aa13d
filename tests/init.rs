use std::process::Command;

#[test]
fn init_creates_valid_toml() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_impactlens"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "impactlens init failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let config_path = dir.path().join(".impactlens.toml");
    assert!(config_path.exists(), ".impactlens.toml should exist");

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[collect]"));
    assert!(content.contains("[report]"));

    let config: impactlens_core::ImpactConfig = toml::from_str(&content).unwrap();
    assert_eq!(config.report.timeout_secs, 30);
}

#[test]
fn init_refuses_if_exists() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".impactlens.toml"), "# existing").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_impactlens"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert_eq!(
        std::fs::read_to_string(dir.path().join(".impactlens.toml")).unwrap(),
        "# existing"
    );
}
