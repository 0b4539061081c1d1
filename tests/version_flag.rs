use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn prints_version() {
    Command::new(env!("CARGO_BIN_EXE_folio-tui"))
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn prints_help() {
    Command::new(env!("CARGO_BIN_EXE_folio-tui"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Folio TUI"))
        .stdout(predicate::str::contains("--version"));
}
