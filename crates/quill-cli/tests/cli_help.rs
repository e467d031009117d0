use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("quill")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("posts"))
        .stdout(predicate::str::contains("comments"))
        .stdout(predicate::str::contains("--api-url"));
}

#[test]
fn test_posts_help_shows_subcommands() {
    cargo_bin_cmd!("quill")
        .args(["posts", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("mine"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("like"));
}

#[test]
fn test_comments_help_shows_subcommands() {
    cargo_bin_cmd!("quill")
        .args(["comments", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("replies"));
}

#[test]
fn test_local_filters_conflict_with_server_paging() {
    cargo_bin_cmd!("quill")
        .args(["posts", "list", "--page", "2", "--tags", "math"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("quill")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
