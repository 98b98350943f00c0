use assert_cmd::Command;
use predicates::prelude::*;

fn combinator() -> Command {
    let mut cmd = Command::cargo_bin("combinator").unwrap();
    cmd.env_remove("COMBINATOR_MAX_STEPS");
    cmd
}

#[test]
fn prints_normal_forms() {
    combinator()
        .args(["--expr", "K a b\nC f a b\nAND T F"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Kab => a"))
        .stdout(predicate::str::contains("Cfab => fba"))
        .stdout(predicate::str::contains("[F, KI]"));
}

#[test]
fn diverging_term_exits_with_status_two() {
    combinator()
        .args(["--max-steps", "50", "--expr", "M M"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No normal form reached within 50 steps"));
}

#[test]
fn growing_term_exits_with_status_two() {
    combinator()
        .args(["--max-steps", "60000", "--expr", "(λx.xxx)λx.xxx"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No normal form reached within"));
}

#[test]
fn step_bound_from_environment() {
    combinator()
        .env("COMBINATOR_MAX_STEPS", "1")
        .args(["--expr", "K a b"])
        .assert()
        .code(2);
}

#[test]
fn open_definition_is_an_error() {
    combinator()
        .args(["--expr", "X := λa.ab"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not closed"));
}

#[test]
fn bare_environment_has_no_combinators() {
    combinator()
        .args(["--bare", "--expr", "I x"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("`I` is not defined"));
}

#[test]
fn runs_a_script_file() {
    let dir = std::env::temp_dir().join(format!("combinator-cli-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("booleans.lc");
    std::fs::write(
        &path,
        "# Church booleans\nXOR := λpq.p(NOT q)q\nXOR T F\nXOR T T\n",
    )
    .unwrap();
    combinator()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("XOR := "))
        .stdout(predicate::str::contains("XOR T F => λab.a"))
        .stdout(predicate::str::contains("XOR T T => λab.b"));
    std::fs::remove_dir_all(&dir).unwrap();
}
