#![allow(dead_code)]

use httpmock::prelude::*;
use httpmock::Mock;
use serde_json::{json, Value};

pub fn user(id: u64, name: &str, company: &str, catch_phrase: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "username": name.to_lowercase(),
        "email": format!("{}@example.com", name.to_lowercase()),
        "address": {"street": "Kulas Light", "city": "Gwenborough"},
        "company": {"name": company, "catchPhrase": catch_phrase, "bs": "harness real-time e-markets"}
    })
}

pub fn mock_users<'a>(server: &'a MockServer, users: Value) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET).path("/users");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(users);
    })
}

pub fn mock_user<'a>(server: &'a MockServer, id: u64, body: Value) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET).path(format!("/users/{}", id));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(body);
    })
}

pub fn mock_posts<'a>(server: &'a MockServer, user_id: u64, posts: Value) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET)
            .path("/posts")
            .query_param("userId", user_id.to_string());
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(posts);
    })
}

pub fn mock_comments<'a>(server: &'a MockServer, post_id: u64, comments: Value) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET)
            .path("/comments")
            .query_param("postId", post_id.to_string());
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(comments);
    })
}
