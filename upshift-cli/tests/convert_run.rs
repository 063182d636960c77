//! End-to-end runs of the `upshift` binary against stub fixer scripts.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).expect("mkdir");
    fs::write(&path, content).expect("write");
    path
}

/// Drop an executable stub fixer into `dir` and return its path.
fn stub_fixer(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fake2to3");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write fixer");
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

fn upshift() -> Command {
    Command::cargo_bin("upshift").expect("binary builds")
}

#[test]
fn mirrors_and_converts_a_tree() {
    let workspace = TempDir::new().unwrap();
    let source = workspace.path();
    write(source, "lib/pkg/module.py", "x = 1\n");
    write(source, "lib/pkg/data.bin", "\x00\x01");
    let fixer = stub_fixer(source, "exit 0");

    upshift()
        .arg("lib")
        .arg("--source-root")
        .arg(source)
        .arg("--fixer")
        .arg(&fixer)
        .assert()
        .success()
        .stdout(predicate::str::contains("'lib' synced"))
        .stdout(predicate::str::contains("2to3 processing done."));

    assert!(source.join("build/py3/lib/pkg/module.py").is_file());
    assert!(source.join("build/py3/lib/pkg/data.bin").is_file());
}

#[test]
fn second_run_converts_nothing() {
    let workspace = TempDir::new().unwrap();
    let source = workspace.path();
    write(source, "lib/module.py", "x = 1\n");
    let fixer = stub_fixer(source, "exit 0");

    for _ in 0..2 {
        upshift()
            .arg("lib")
            .arg("--source-root")
            .arg(source)
            .arg("--fixer")
            .arg(&fixer)
            .assert()
            .success();
    }

    upshift()
        .arg("lib")
        .arg("--source-root")
        .arg(source)
        .arg("--fixer")
        .arg(&fixer)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "(0 copied, 0 removed, 1 current, 0 converted)",
        ));
}

#[test]
fn failing_fixer_dumps_diagnostics_and_removes_the_file() {
    let workspace = TempDir::new().unwrap();
    let source = workspace.path();
    write(source, "lib/broken.py", "x = 1\n");
    let fixer = stub_fixer(source, "echo 'cannot parse broken.py' >&2\nexit 1");

    upshift()
        .arg("lib")
        .arg("--source-root")
        .arg(source)
        .arg("--fixer")
        .arg(&fixer)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot parse broken.py"))
        .stderr(predicate::str::contains("exited with status 1"));

    assert!(
        !source.join("build/py3/lib/broken.py").exists(),
        "failed conversion must not leave output behind"
    );
}

#[test]
fn unknown_trees_are_warned_about_and_skipped() {
    let workspace = TempDir::new().unwrap();
    let source = workspace.path();
    let fixer = stub_fixer(source, "exit 0");

    upshift()
        .arg("Bio")
        .arg("--source-root")
        .arg(source)
        .arg("--fixer")
        .arg(&fixer)
        .assert()
        .success()
        .stderr(predicate::str::contains("ignoring unknown subtree 'Bio'"))
        .stdout(predicate::str::contains("Nothing to do"));
}

#[test]
fn config_file_overrides_the_known_set() {
    let workspace = TempDir::new().unwrap();
    let source = workspace.path();
    write(source, "upshift.yaml", "subtrees: [src]\nplatform_tag: py3.9\n");
    write(source, "src/module.py", "x = 1\n");
    let fixer = stub_fixer(source, "exit 0");

    upshift()
        .arg("--source-root")
        .arg(source)
        .arg("--fixer")
        .arg(&fixer)
        .assert()
        .success()
        .stdout(predicate::str::contains("'src' synced"));

    assert!(source.join("build/py3.9/src/module.py").is_file());
}

#[test]
fn json_summary_is_machine_readable() {
    let workspace = TempDir::new().unwrap();
    let source = workspace.path();
    write(source, "lib/module.py", "x = 1\n");
    let fixer = stub_fixer(source, "exit 0");

    let output = upshift()
        .arg("lib")
        .arg("--source-root")
        .arg(source)
        .arg("--fixer")
        .arg(&fixer)
        .arg("--json")
        .output()
        .expect("run upshift --json");
    assert!(output.status.success());

    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(summary["trees"][0]["tree"], "lib");
    assert_eq!(summary["trees"][0]["sync"]["copied"][0], "module.py");
}
