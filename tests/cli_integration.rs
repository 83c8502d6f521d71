//! Integration tests for the git-brancher binary.
//!
//! These tests exercise the full CLI and verify the repositories it writes.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

use git_brancher::git::GitEngine;

/// Get a command for running git-brancher with an isolated environment.
fn brancher(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("git-brancher").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("GIT_BRANCHER_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn branch_names(git: &GitEngine) -> Vec<String> {
    git.list_branches()
        .unwrap()
        .into_iter()
        .map(|(name, _)| name.to_string())
        .collect()
}

#[test]
fn help_flag_works() {
    let home = TempDir::new().unwrap();
    brancher(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("<OPEN>"))
        .stdout(predicate::str::contains("--push"));
}

#[test]
fn version_flag_works() {
    let home = TempDir::new().unwrap();
    brancher(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("git-brancher"));
}

#[test]
fn missing_counts_is_usage_error() {
    let home = TempDir::new().unwrap();
    brancher(&home).arg("3").assert().code(2);
}

#[test]
fn negative_count_is_usage_error() {
    let home = TempDir::new().unwrap();
    brancher(&home).args(["-1", "0"]).assert().code(2);
}

#[test]
fn scratch_run_reports_timings() {
    let home = TempDir::new().unwrap();
    brancher(&home)
        .args(["2", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created 5 branches"))
        .stderr(predicate::str::contains("creating 2 open branches took"))
        .stderr(predicate::str::contains("creating 1 merge branches took"));
}

#[test]
fn quiet_run_prints_nothing() {
    let home = TempDir::new().unwrap();
    brancher(&home)
        .args(["1", "1", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());
}

#[test]
fn output_directory_and_json_report() {
    let home = TempDir::new().unwrap();
    let out = home.child("fixture.git");

    let assert = brancher(&home)
        .args(["2", "2", "--json", "--output"])
        .arg(out.path())
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(report["branches"].as_array().unwrap().len(), 7);
    assert!(report["pushed_to"].is_null());

    let git = GitEngine::open(out.path()).unwrap();
    assert_eq!(
        branch_names(&git),
        vec![
            "master",
            "pr-merge-0",
            "pr-merge-1",
            "pr-open-0",
            "pr-open-1",
            "x-pr-merge-0",
            "x-pr-merge-1"
        ]
    );
}

#[test]
fn files_seed_master() {
    let home = TempDir::new().unwrap();
    let seed = home.child("inputs/notes.txt");
    seed.write_str("seeded content\n").unwrap();
    let out = home.child("fixture.git");

    brancher(&home)
        .args(["0", "0", "-f"])
        .arg(seed.path())
        .arg("--output")
        .arg(out.path())
        .assert()
        .success();

    let git = GitEngine::open(out.path()).unwrap();
    let master = git.resolve_ref("refs/heads/master").unwrap();
    let files = git.tree_files(&master).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files["notes.txt"], b"seeded content\n");
}

#[test]
fn missing_seed_file_fails() {
    let home = TempDir::new().unwrap();
    brancher(&home)
        .args(["1", "1", "-f"])
        .arg(home.path().join("absent.bin"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error: unable to read file"))
        .stderr(predicate::str::contains("absent.bin"));
}

#[test]
fn push_to_local_mirror() {
    let home = TempDir::new().unwrap();
    let mirror = home.child("mirror.git");
    drop(GitEngine::init(mirror.path()).unwrap());

    brancher(&home)
        .args(["2", "1", "--push"])
        .arg(mirror.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("pushing 2+1*2 branches took"));

    let git = GitEngine::open(mirror.path()).unwrap();
    assert_eq!(branch_names(&git).len(), 5);
}

#[test]
fn config_sets_author() {
    let home = TempDir::new().unwrap();
    let config = home.child("brancher.toml");
    config
        .write_str("[author]\nname = \"Bench Bot\"\nemail = \"bench@example.com\"\n")
        .unwrap();
    let out = home.child("fixture.git");

    brancher(&home)
        .args(["1", "0", "--config"])
        .arg(config.path())
        .arg("--output")
        .arg(out.path())
        .assert()
        .success();

    let git = GitEngine::open(out.path()).unwrap();
    let oid = git.resolve_ref("refs/heads/pr-open-0").unwrap();
    let info = git.commit_info(&oid).unwrap();
    assert_eq!(info.author_name, "Bench Bot");
    assert_eq!(info.author_email, "bench@example.com");
}

#[test]
fn invalid_config_fails() {
    let home = TempDir::new().unwrap();
    home.child(".git-brancher/config.toml")
        .write_str("remote = \"\"\n")
        .unwrap();

    brancher(&home)
        .args(["0", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unable to load configuration"));
}
