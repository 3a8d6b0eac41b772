//! Integration tests for the `sr` CLI commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use assert_cmd::Command;
use predicates::prelude::*;

fn sr() -> Command {
    let mut cmd = Command::cargo_bin("sr").unwrap();
    cmd.env_remove("SR_PREFIX").env_remove("RUST_LOG");
    cmd
}

// -- roll --

#[test]
fn roll_heal_with_forced_dice() {
    sr().args(["roll", "heal", "b", "b", "5", "-c", "aoe", "--force", "14,14"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Action: Heal"))
        .stdout(predicate::str::contains("+27 HP to 3 allies"))
        .stdout(predicate::str::contains("[TEST] Forced rolls: 14, 14"));
}

#[test]
fn roll_accepts_negative_modifiers() {
    sr().args(["roll", "heal", "b", "b", "-5", "--force", "14,14"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-5 (mods)"));
}

#[test]
fn roll_generic_dice() {
    sr().args(["roll", "3d6", "--force", "1,2,3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("**6 total**"));
}

#[test]
fn roll_unknown_action() {
    sr().args(["roll", "fireball", "a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: unknown action: fireball"));
}

#[test]
fn roll_missing_rank() {
    sr().args(["roll", "attack"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing mastery rank"));
}

#[test]
fn roll_json_output() {
    sr().args([
        "roll", "heal", "b", "b", "5", "-c", "aoe", "--force", "14,14", "--json",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"final_total\":27"))
    .stdout(predicate::str::contains("\"tier\":\"Plain\""));
}

#[test]
fn seeded_rolls_repeat() {
    let first = sr()
        .args(["roll", "attack", "a", "s", "--seed", "7"])
        .output()
        .unwrap();
    let second = sr()
        .args(["roll", "attack", "a", "s", "--seed", "7"])
        .output()
        .unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

// -- exec --

#[test]
fn exec_flat_action() {
    sr().args(["exec", "?r torment d # ultra"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ultra Torment"))
        .stdout(predicate::str::contains("10 damage"));
}

#[test]
fn exec_star_breaker() {
    sr().args(["exec", "?r critical b b # r=100,100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("**1750 total** (STAR BREAKER)"));
}

#[test]
fn exec_missing_trigger() {
    sr().args(["exec", "?r cover"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires one of"));
}

#[test]
fn exec_not_a_command() {
    sr().args(["exec", "hello there"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a command"));
}

#[test]
fn exec_custom_prefix() {
    sr().args(["exec", "!r torment d", "--prefix", "!"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5 damage"));
}

#[test]
fn exec_prefix_from_env() {
    sr().env("SR_PREFIX", "!")
        .args(["exec", "!r torment d"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Torment"));
}

// -- listen --

#[test]
fn listen_replies_per_line() {
    sr().arg("listen")
        .write_stdin("hello\n?r torment d\n?r fireball\n?r torment s # radial\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Free Action"))
        .stdout(predicate::str::contains("Radial Torment"))
        .stdout(predicate::str::contains("hello").not())
        .stderr(predicate::str::contains("unknown action: fireball"));
}

#[test]
fn listen_json_lines() {
    let output = sr()
        .args(["listen", "--json"])
        .write_stdin("?r torment d\n?r torment c\n")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["final_total"], 5);
}

// -- actions / ranks --

#[test]
fn actions_lists_catalog() {
    sr().arg("actions")
        .assert()
        .success()
        .stdout(predicate::str::contains("heal"))
        .stdout(predicate::str::contains("ultracounter"))
        .stdout(predicate::str::contains("31 actions"));
}

#[test]
fn ranks_table() {
    sr().arg("ranks")
        .assert()
        .success()
        .stdout(predicate::str::contains("Counter check"))
        .stdout(predicate::str::contains("40"));
}

#[test]
fn ranks_json() {
    let output = sr().args(["ranks", "--json"]).output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["mastery"][5]["value"], 40);
    assert_eq!(value["mastery"][0]["counter_check"], 40);
    assert_eq!(value["weapon"][3]["rank"], "B");
}

#[test]
fn help_lists_subcommands() {
    sr().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("exec"))
        .stdout(predicate::str::contains("listen"));
}
