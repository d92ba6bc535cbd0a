//! CLI end-to-end tests for the `gsc` binary.
//!
//! Drives the compiled executable directly with `assert_cmd`, the way the
//! corpus's own CLI integration suite does, rather than calling library
//! functions in-process.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn gsc_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_gsc"))
}

fn write_source(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_cli_help() {
    gsc_bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage").or(predicate::str::contains("gsc")));
}

#[test]
fn test_cli_version() {
    gsc_bin().arg("--version").assert().success().stdout(predicate::str::contains("0."));
}

#[test]
fn test_check_succeeds_on_valid_source() {
    let dir = TempDir::new().unwrap();
    let path = write_source(&dir, "main.gs", "package \"test\"; public int32 main() { return 0; }");

    gsc_bin().arg("check").arg(&path).assert().success();
}

#[test]
fn test_check_fails_on_invalid_source() {
    let dir = TempDir::new().unwrap();
    let path = write_source(&dir, "broken.gs", "this is not gunderscript {{{");

    gsc_bin().arg("check").arg(&path).assert().failure().code(1);
}

#[test]
fn test_build_prints_a_module_summary_on_success() {
    let dir = TempDir::new().unwrap();
    let path = write_source(&dir, "main.gs", "package \"test\"; public int32 main() { return 0; }");

    gsc_bin()
        .arg("build")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("function(s)"));
}

#[test]
fn test_build_fails_and_reports_diagnostics_on_invalid_source() {
    let dir = TempDir::new().unwrap();
    let path = write_source(&dir, "broken.gs", "this is not gunderscript {{{");

    gsc_bin()
        .arg("build")
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("broken.gs"));
}

#[test]
fn test_build_on_missing_path_reports_a_driver_error() {
    gsc_bin().arg("build").arg("/nonexistent/path.gs").assert().failure().code(2);
}

#[test]
fn test_config_flag_points_at_an_explicit_file() {
    let dir = TempDir::new().unwrap();
    write_source(&dir, "main.gs", "package \"test\"; public int32 main() { return 0; }");
    let config_path = write_source(
        &dir,
        "custom.toml",
        &format!("source_dir = \"{}\"\n", dir.path().display().to_string().replace('\\', "\\\\")),
    );

    gsc_bin().arg("--config").arg(&config_path).arg("check").assert().success();
}
