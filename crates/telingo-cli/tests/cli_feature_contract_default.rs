#![cfg(not(feature = "clingo"))]

use std::process::Command;

#[test]
fn default_binary_refuses_to_solve() {
    let demo = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/toggle.lp");
    let output = Command::new(env!("CARGO_BIN_EXE_telingo"))
        .arg("solve")
        .arg(demo)
        .output()
        .expect("failed to execute telingo solve");
    assert!(
        !output.status.success(),
        "solve must fail without a solver backend"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("without a solver backend"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn stop_criterion_is_validated() {
    let output = Command::new(env!("CARGO_BIN_EXE_telingo"))
        .args(["solve", "--istop", "maybe"])
        .output()
        .expect("failed to execute telingo solve");
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid stop criterion"));
}
