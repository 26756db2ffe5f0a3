use std::process::Command;

fn docgenny() -> Command {
    Command::new(env!("CARGO_BIN_EXE_docgenny"))
}

#[test]
fn generates_default_document() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("a.py"),
        "class Foo:\n    x: int = 1\n    def bar(self): pass\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("b.js"), "function baz(x, y) { return x; }").unwrap();

    let output = docgenny().arg(dir.path()).output().unwrap();
    assert!(
        output.status.success(),
        "docgenny failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✓ Documentation generated:"));
    assert!(stdout.contains("  - 1 models documented"));
    assert!(stdout.contains("  - 1 functions documented"));
    assert!(stdout.contains("  - 3 files in tree"));

    let doc = std::fs::read_to_string(dir.path().join("TECHNICAL_DOCS.md")).unwrap();
    assert!(doc.contains("#### `Foo`"));
    assert!(doc.contains("#### `baz(x, y)`"));
}

#[test]
fn verbose_reports_counts() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("m.py"), "def f():\n    pass\n").unwrap();

    let output = docgenny()
        .args([dir.path().to_str().unwrap(), "--verbose", "-o", "OUT.md"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Models: 0"));
    assert!(stdout.contains("Functions: 1"));
    assert!(dir.path().join("OUT.md").exists());
}

#[test]
fn json_format_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".docgenny.toml"),
        "output = \"docs.json\"\nformat = \"json\"\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("m.py"), "def f(a):\n    pass\n").unwrap();

    let output = docgenny().arg(dir.path()).output().unwrap();
    assert!(output.status.success());

    let content = std::fs::read_to_string(dir.path().join("docs.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value["functions"][0]["name"], "f");
    assert_eq!(value["functions"][0]["params"][0], "a");
}

#[test]
fn missing_path_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");

    let output = docgenny().arg(&missing).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist"), "stderr: {stderr}");
}

#[test]
fn file_path_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("x.py");
    std::fs::write(&file, "").unwrap();

    let output = docgenny().arg(&file).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("is not a directory"), "stderr: {stderr}");
}

#[test]
fn version_exits_zero_without_scanning() {
    let dir = tempfile::tempdir().unwrap();

    for flag in ["--version", "-v", "-V"] {
        let output = docgenny()
            .arg(flag)
            .current_dir(dir.path())
            .output()
            .unwrap();
        assert!(output.status.success(), "{flag}");
        assert!(String::from_utf8_lossy(&output.stdout).starts_with("docgenny "), "{flag}");
    }
    assert!(!dir.path().join("TECHNICAL_DOCS.md").exists());
}
