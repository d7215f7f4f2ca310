//! Command-line contract: default paths and exit codes.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn run_cli(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wordfixture-cli"))
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap()
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn cli_without_arguments_encodes_default_paths() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("assets")).unwrap();
    fs::write(dir.path().join("assets/lang-english.txt"), b"alpha\nbeta\n").unwrap();

    let output = run_cli(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output)["success"], true);
    let bytes = fs::read(dir.path().join("assets/data.bin")).unwrap();
    let mut expected = vec![2, 0, 0, 0, 5, 0, 0, 0];
    expected.extend_from_slice(b"alpha");
    expected.extend_from_slice(&[4, 0, 0, 0]);
    expected.extend_from_slice(b"beta");
    assert_eq!(bytes, expected);
}

#[test]
fn cli_top_level_source_and_target() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("words.txt"), b"one\n").unwrap();

    let output = run_cli(dir.path(), &["--source", "words.txt", "--target", "out.bin"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        fs::read(dir.path().join("out.bin")).unwrap(),
        vec![1, 0, 0, 0, 3, 0, 0, 0, b'o', b'n', b'e']
    );

    let output = run_cli(dir.path(), &["verify", "--source", "words.txt", "--target", "out.bin"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output)["verified"], true);
}

#[test]
fn cli_usage_error_is_not_rejected_data() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_cli(dir.path(), &["--no-such-flag"]);

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn cli_rejected_word_list_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("words.txt"), "ok\nd\u{e9}j\u{e0}\n").unwrap();

    let output = run_cli(dir.path(), &["-s", "words.txt", "-t", "out.bin"]);

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout_json(&output)["kind"], "encoding_error");
    assert!(!dir.path().join("out.bin").exists());
}

#[test]
fn cli_inspect_missing_fixture() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_cli(dir.path(), &["inspect", "--fixture", "missing.bin"]);

    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["kind"], "fixture_unreadable");
    assert!(json["error"].as_str().unwrap().contains("missing.bin"));
}
