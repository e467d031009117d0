use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_config_path_command() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("quill")
        .env("QUILL_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_creates_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    cargo_bin_cmd!("quill")
        .env("QUILL_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config at"));

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("api_url ="));
    assert!(contents.contains("# Posts per page"));
}

#[test]
fn test_config_init_fails_if_exists() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "# existing config").unwrap();

    cargo_bin_cmd!("quill")
        .env("QUILL_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_show_uses_env_api_url() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "api_url = \"http://config.example\"\npage_size = 5\n",
    )
    .unwrap();

    cargo_bin_cmd!("quill")
        .env("QUILL_HOME", dir.path())
        .env("QUILL_API_URL", "http://env.example")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://env.example"))
        .stdout(predicate::str::contains("page_size:     5"));
}

#[test]
fn test_config_generate_prints_defaults() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("quill")
        .env("QUILL_HOME", dir.path())
        .args(["config", "generate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("all_posts_limit = 100"));
}
