//! End-to-end checks of the `telingo` binary's transform path.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

fn telingo_with_stdin(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_telingo"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn telingo");
    child
        .stdin
        .take()
        .expect("stdin handle")
        .write_all(input.as_bytes())
        .expect("failed to write stdin");
    child.wait_with_output().expect("failed to wait for telingo")
}

#[test]
fn help_lists_both_commands() {
    let output = Command::new(env!("CARGO_BIN_EXE_telingo"))
        .arg("--help")
        .output()
        .expect("failed to execute telingo --help");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("transform"));
    assert!(stdout.contains("solve"));
}

#[test]
fn transform_prints_rewritten_demo() {
    let output = Command::new(env!("CARGO_BIN_EXE_telingo"))
        .arg("transform")
        .arg(demo("toggle.lp"))
        .output()
        .expect("failed to execute telingo transform");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("#program dynamic(__t)."));
    assert!(stdout.contains("on(__t) :- off((__t+-1)); switch(__t)."));
    assert!(stdout.contains("#false :- not on(__t); __final(__t)."));
    assert!(stdout.contains("#external __final(__t)."));
    assert!(stdout.contains("% part: dynamic Dynamic [0]"));
}

#[test]
fn transform_reads_standard_input() {
    let output = telingo_with_stdin(&["transform"], "a' :- b.\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("__future_a(1,(__t+1)) :- b(__t)."));
    assert!(stdout.contains("% future: __future_a/2"));
}

#[test]
fn transform_emits_json_report() {
    let output = telingo_with_stdin(&["transform", "--format", "json"], "a' :- b.\n");
    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout must be JSON");
    assert_eq!(value["future_signatures"][0]["name"], "__future_a");
    assert!(value["program"]
        .as_str()
        .expect("program text")
        .contains("#program static(__t)."));
}

#[test]
fn future_in_body_is_rejected() {
    let output = telingo_with_stdin(&["transform"], "p :- q'.\n");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("future atoms not supported"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn missing_file_is_reported() {
    let output = Command::new(env!("CARGO_BIN_EXE_telingo"))
        .arg("transform")
        .arg("does/not/exist.lp")
        .output()
        .expect("failed to execute telingo transform");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot read"));
}
