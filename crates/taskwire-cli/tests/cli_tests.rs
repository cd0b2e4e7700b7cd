/// CLI surface tests exercising the binary as a black box. Anything that
/// talks to the API needs a live server and is covered by the core crate's
/// tests instead; these stick to argument parsing and help output.
use assert_cmd::Command;
use predicates::prelude::*;

fn taskwire() -> Command {
    Command::cargo_bin("taskwire").expect("Failed to find taskwire binary")
}

#[test]
fn help_lists_the_command_surface() {
    taskwire()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("task manager"))
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("recur"))
        .stdout(predicate::str::contains("voice"));
}

#[test]
fn version_reports_the_binary_name() {
    taskwire()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("taskwire"));
}

#[test]
fn unknown_subcommands_fail() {
    taskwire()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn add_requires_a_title() {
    taskwire()
        .arg("add")
        .assert()
        .failure()
        .stderr(predicate::str::contains("TITLE"));
}

#[test]
fn voice_flags_are_mutually_exclusive() {
    taskwire()
        .args(["voice", "note.wav", "--transcribe-only", "--parse-only"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}
