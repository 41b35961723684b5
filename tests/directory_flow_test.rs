mod common;

use common::*;
use employee_directory::core::Storage;
use employee_directory::{
    Directory, Document, EventKind, HttpDirectoryApi, LocalStorage, Listener,
};
use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

fn directory(server: &MockServer) -> Directory<HttpDirectoryApi> {
    let api = HttpDirectoryApi::new(&server.base_url()).unwrap();
    Directory::new(Arc::new(api), Document::with_layout())
}

#[tokio::test]
async fn test_selecting_employee_renders_post_with_author_and_hidden_comments() {
    let server = MockServer::start();
    let users_mock = mock_users(&server, json!([{"id": 1, "name": "A"}]));
    let posts_mock = mock_posts(
        &server,
        1,
        json!([{"id": 10, "userId": 1, "title": "T", "body": "B"}]),
    );
    let author_mock = mock_user(&server, 1, json!({"id": 1, "name": "X", "company": {"name": "Y", "catchPhrase": "Z"}}));
    let comments_mock = mock_comments(&server, 10, json!([]));

    let mut dir = directory(&server);
    dir.init_app().await.unwrap();
    let outcome = dir.select_employee(1).await.unwrap();

    users_mock.assert();
    posts_mock.assert();
    author_mock.assert();
    comments_mock.assert();
    assert!(outcome.is_ok());

    let doc = dir.document();
    let main = dir.main().unwrap();
    let articles = doc.element_children(main);
    assert_eq!(articles.len(), 1);

    assert_eq!(
        doc.outer_html(articles[0]),
        "<article><h2>T</h2><p>B</p><p>Post ID: 10</p><p>Author: X with Y</p><p>Z</p>\
         <button data-post-id=\"10\">Show Comments</button>\
         <section data-post-id=\"10\" class=\"comments hide\"></section></article>"
    );

    let button = doc.find_by_data("button", "post-id", "10").unwrap();
    assert_eq!(
        doc.event_listeners(button, EventKind::Click),
        vec![Listener::ToggleComments { post_id: 10 }]
    );
}

#[tokio::test]
async fn test_posts_keep_server_order_and_show_comments() {
    let server = MockServer::start();
    mock_users(&server, json!([{"id": 3, "name": "Clementine Bauch"}]));
    mock_posts(
        &server,
        3,
        json!([
            {"id": 21, "userId": 3, "title": "asperiores ea ipsam", "body": "a"},
            {"id": 22, "userId": 3, "title": "dolor sint quo", "body": "b"},
            {"id": 23, "userId": 3, "title": "maxime id vitae", "body": "c"}
        ]),
    );
    let author_mock = mock_user(&server, 3, user(3, "Clementine Bauch", "Romaguera-Jacobson", "Face to face bifurcated interface"));
    mock_comments(
        &server,
        21,
        json!([
            {"postId": 21, "id": 101, "name": "quia", "email": "Kenton_Vandervort@friedrich.com", "body": "eos"},
            {"postId": 21, "id": 102, "name": "nam", "email": "Hayden_Olson@marianna.me", "body": "voluptas"}
        ]),
    );
    mock_comments(&server, 22, json!([]));
    mock_comments(&server, 23, json!([]));

    let mut dir = directory(&server).with_concurrency(2);
    dir.init_app().await.unwrap();
    dir.select_employee(3).await.unwrap();

    author_mock.assert_hits(3);
    let doc = dir.document();
    let main = dir.main().unwrap();
    let titles: Vec<String> = doc
        .descendants_by_tag(main, "h2")
        .into_iter()
        .map(|h2| doc.text_content(h2))
        .collect();
    assert_eq!(
        titles,
        vec!["asperiores ea ipsam", "dolor sint quo", "maxime id vitae"]
    );

    let section = doc.find_by_data("section", "post-id", "21").unwrap();
    let comment_articles = doc.descendants_by_tag(section, "article");
    assert_eq!(comment_articles.len(), 2);
    assert_eq!(
        doc.outer_html(comment_articles[1]),
        "<article><h3>nam</h3><p>voluptas</p><p>From: Hayden_Olson@marianna.me</p></article>"
    );
}

#[tokio::test]
async fn test_click_toggles_comment_section_and_back() {
    let server = MockServer::start();
    mock_users(&server, json!([{"id": 1, "name": "A"}]));
    mock_posts(&server, 1, json!([{"id": 10, "userId": 1, "title": "T", "body": "B"}]));
    mock_user(&server, 1, user(1, "X", "Y", "Z"));
    mock_comments(
        &server,
        10,
        json!([{"postId": 10, "id": 1, "name": "n", "email": "e@x.io", "body": "b"}]),
    );

    let mut dir = directory(&server);
    dir.init_app().await.unwrap();
    dir.select_employee(1).await.unwrap();

    dir.click_toggle(10).await.unwrap();
    {
        let doc = dir.document();
        let section = doc.find_by_data("section", "post-id", "10").unwrap();
        let button = doc.find_by_data("button", "post-id", "10").unwrap();
        assert!(!doc.class_contains(section, "hide"));
        assert_eq!(doc.text_content(button), "Hide Comments");
    }

    dir.click_toggle(10).await.unwrap();
    let doc = dir.document();
    let section = doc.find_by_data("section", "post-id", "10").unwrap();
    let button = doc.find_by_data("button", "post-id", "10").unwrap();
    assert!(doc.class_contains(section, "hide"));
    assert_eq!(doc.text_content(button), "Show Comments");
}

#[tokio::test]
async fn test_employee_without_posts_shows_placeholder() {
    let server = MockServer::start();
    mock_users(&server, json!([{"id": 5, "name": "Chelsey Dietrich"}]));
    mock_posts(&server, 5, json!([]));

    let mut dir = directory(&server);
    dir.init_app().await.unwrap();
    dir.select_employee(5).await.unwrap();

    let doc = dir.document();
    let main = dir.main().unwrap();
    assert_eq!(
        doc.outer_html(main),
        "<main><p class=\"default-text\">Select an Employee to display their posts.</p></main>"
    );
}

#[tokio::test]
async fn test_failed_posts_request_leaves_selector_enabled() {
    let server = MockServer::start();
    mock_users(&server, json!([{"id": 1, "name": "A"}]));
    server.mock(|when, then| {
        when.method(GET).path("/posts");
        then.status(502);
    });

    let mut dir = directory(&server);
    dir.init_app().await.unwrap();
    let outcome = dir.select_employee(1).await.unwrap();

    assert_eq!(outcome.failed, 1);
    let select = dir.select_menu().unwrap();
    assert!(!dir.document().is_disabled(select));
}

#[tokio::test]
async fn test_rendered_page_written_to_storage() {
    let server = MockServer::start();
    mock_users(&server, json!([{"id": 1, "name": "A & B"}]));
    mock_posts(&server, 1, json!([{"id": 10, "userId": 1, "title": "<T>", "body": "B"}]));
    mock_user(&server, 1, user(1, "X", "Y", "Z"));
    mock_comments(&server, 10, json!([]));

    let mut dir = directory(&server);
    dir.init_app().await.unwrap();
    dir.select_employee(1).await.unwrap();
    let html = dir.into_document().to_html();

    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path().display().to_string());
    storage.write_file("index.html", html.as_bytes()).await.unwrap();
    let written = String::from_utf8(storage.read_file("index.html").await.unwrap()).unwrap();

    assert!(written.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
    assert!(written.contains("<option value=\"1\" selected>A &amp; B</option>"));
    assert!(written.contains("<h2>&lt;T&gt;</h2>"));
}
