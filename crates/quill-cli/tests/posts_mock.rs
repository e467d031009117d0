//! Post and comment commands against a mocked backend.

mod fixtures;

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use fixtures::{can_bind_localhost, comment_json, data, post_json, posts_page, write_session};
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn temp_home() -> TempDir {
    TempDir::new().expect("create temp quill home")
}

#[tokio::test]
async fn test_posts_list_filters_locally_and_caches() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/posts"))
        .and(query_param("limit", "100"))
        .respond_with(posts_page(vec![
            post_json("p1", "Primes", &["math", "numbers"]),
            post_json("p2", "Graphs", &["math"]),
            post_json("p3", "Sonnets", &["poetry"]),
        ]))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("quill")
        .env("QUILL_HOME", home.path())
        .args(["--api-url", &server.uri()])
        .args(["posts", "list", "--tags", "math,numbers"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Primes"))
        .stdout(predicate::str::contains("Graphs").not())
        .stdout(predicate::str::contains("1 of 3 posts match"));

    let state = fs::read_to_string(home.path().join("state.json")).unwrap();
    assert!(state.contains("Sonnets"));

    // The cache serves later offline listings.
    cargo_bin_cmd!("quill")
        .env("QUILL_HOME", home.path())
        .args(["--api-url", "http://127.0.0.1:9"])
        .args(["posts", "list", "--offline", "--search", "sonn"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sonnets"))
        .stdout(predicate::str::contains("Primes").not());
}

#[test]
fn test_offline_list_without_cache_fails() {
    let home = temp_home();

    cargo_bin_cmd!("quill")
        .env("QUILL_HOME", home.path())
        .args(["posts", "list", "--offline"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No cached posts"));
}

#[tokio::test]
async fn test_posts_list_page_shows_pagination() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/posts"))
        .and(query_param("page", "2"))
        .and(query_param("tag", "math"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "posts": [post_json("p4", "Topology", &["math"])],
                "pagination": {"total": 11, "page": 2, "limit": 10, "pages": 2}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("quill")
        .env("QUILL_HOME", home.path())
        .args(["--api-url", &server.uri()])
        .args(["posts", "list", "--page", "2", "--tag", "math"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Topology"))
        .stdout(predicate::str::contains("Page 2 of 2 (11 posts)"));
}

#[tokio::test]
async fn test_posts_show_fetches_comments_when_not_embedded() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/posts/p1"))
        .respond_with(data(json!({"post": post_json("p1", "Primes", &["math"])})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/comments/post/p1"))
        .respond_with(data(json!({
            "comments": [comment_json("c1", "p1", "Lovely proof")],
            "pagination": {"total": 1, "page": 1, "limit": 10, "pages": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("quill")
        .env("QUILL_HOME", home.path())
        .args(["--api-url", &server.uri()])
        .args(["posts", "show", "p1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Primes"))
        .stdout(predicate::str::contains("#math"))
        .stdout(predicate::str::contains("[c1] Grace (1 likes): Lovely proof"));
}

#[test]
fn test_create_requires_login() {
    let home = temp_home();

    cargo_bin_cmd!("quill")
        .env("QUILL_HOME", home.path())
        .args(["posts", "create", "--title", "T", "--content", "C", "--tag", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_create_validates_before_sending() {
    let home = temp_home();
    write_session(home.path());

    cargo_bin_cmd!("quill")
        .env("QUILL_HOME", home.path())
        .args(["--api-url", "http://127.0.0.1:9"])
        .args(["posts", "create", "--title", " ", "--content", "Body"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Title is required"))
        .stderr(predicate::str::contains("At least one tag is required"));
}

#[tokio::test]
async fn test_create_sends_normalized_tags_with_bearer() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    write_session(home.path());
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/posts"))
        .and(header("authorization", "Bearer access-1"))
        .and(body_json(json!({
            "title": "Primes",
            "content": "Infinitely many.",
            "tags": ["math", "number-theory"]
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"data": {"post": post_json("p9", "Primes", &["math"])}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("quill")
        .env("QUILL_HOME", home.path())
        .args(["--api-url", &server.uri()])
        .args(["posts", "create", "--title", "Primes", "--content", "Infinitely many."])
        .args(["--tag", " Math ", "--tag", "number-theory,math"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created post p9 (Primes)"));
}

#[tokio::test]
async fn test_edit_refuses_other_authors_posts() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    write_session(home.path());
    let server = MockServer::start().await;
    let mut foreign = post_json("p5", "Not mine", &["misc"]);
    foreign["author"] = json!({"_id": "u7", "name": "Someone"});
    Mock::given(method("GET"))
        .and(path("/api/v1/posts/p5"))
        .respond_with(data(json!({"post": foreign})))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/posts/p5"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    cargo_bin_cmd!("quill")
        .env("QUILL_HOME", home.path())
        .args(["--api-url", &server.uri()])
        .args(["posts", "edit", "p5", "--title", "Mine now"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Only the author"));
}

#[tokio::test]
async fn test_comment_like_reports_updated_count() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    write_session(home.path());
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/comments/post/p1"))
        .respond_with(data(json!({
            "comments": [comment_json("c1", "p1", "Nice")],
            "pagination": {"total": 1, "page": 1, "limit": 10, "pages": 1}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/comments/c1/like"))
        .respond_with(data(json!({"liked": true, "likeCount": 2})))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("quill")
        .env("QUILL_HOME", home.path())
        .args(["--api-url", &server.uri()])
        .args(["comments", "like", "c1", "--post", "p1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Liked comment c1 (2 likes)"));
}

#[tokio::test]
async fn test_server_error_message_is_shown() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    write_session(home.path());
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/comments/c1"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"message": "Not your comment"})),
        )
        .mount(&server)
        .await;

    cargo_bin_cmd!("quill")
        .env("QUILL_HOME", home.path())
        .args(["--api-url", &server.uri()])
        .args(["comments", "delete", "c1", "--post", "p1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not your comment"));
}
