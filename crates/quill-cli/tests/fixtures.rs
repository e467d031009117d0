//! Backend payload helpers for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use serde_json::{Value, json};
use wiremock::ResponseTemplate;

pub fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

pub fn user_json(id: &str, name: &str) -> Value {
    json!({"_id": id, "name": name, "email": format!("{id}@example.com")})
}

pub fn post_json(id: &str, title: &str, tags: &[&str]) -> Value {
    json!({
        "_id": id,
        "title": title,
        "content": format!("{title} body"),
        "tags": tags,
        "author": user_json("u1", "Ada"),
        "likeCount": 2,
        "commentCount": 1,
        "createdAt": "2024-03-15T12:00:00Z"
    })
}

pub fn comment_json(id: &str, post_id: &str, content: &str) -> Value {
    json!({
        "_id": id,
        "post": post_id,
        "content": content,
        "author": user_json("u2", "Grace"),
        "likeCount": 1,
        "replies": []
    })
}

pub fn posts_page(posts: Vec<Value>) -> ResponseTemplate {
    let total = posts.len();
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "data": {
            "posts": posts,
            "pagination": {"total": total, "page": 1, "limit": 100, "pages": 1}
        }
    }))
}

pub fn data(value: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": value}))
}

/// Writes a logged-in session for `u1` into `home`.
pub fn write_session(home: &Path) {
    let session = json!({
        "access_token": "access-1",
        "refresh_token": "refresh-1",
        "user": user_json("u1", "Ada")
    });
    fs::write(home.join("session.json"), session.to_string()).unwrap();
}
