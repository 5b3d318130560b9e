//! Shared helpers for integration tests: socket guard and serve-style fixtures.

#![allow(dead_code)]

pub mod socket_guard;

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// One entry of a serve directory listing.
pub enum Item<'a> {
    File(&'a str),
    Folder(&'a str),
}

/// Builds the JSON body serve returns for a folder at `directory`.
pub fn listing_body(directory: &str, items: &[Item<'_>]) -> Value {
    let files: Vec<Value> = items
        .iter()
        .map(|item| match item {
            Item::File(name) => json!({ "base": name, "type": "file" }),
            Item::Folder(name) => json!({ "base": format!("{name}/"), "type": "folder" }),
        })
        .collect();
    json!({ "directory": directory, "files": files })
}

/// Serves the listing for `folder_path` (e.g. `/` or `/a/`).
pub async fn mount_listing(server: &MockServer, folder_path: &str, items: &[Item<'_>]) {
    Mock::given(method("GET"))
        .and(path(folder_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_body(folder_path, items)))
        .mount(server)
        .await;
}

/// Serves `body` at `file_path`, expecting exactly `expected_hits` requests.
pub async fn mount_file(server: &MockServer, file_path: &str, body: &[u8], expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(file_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .expect(expected_hits)
        .mount(server)
        .await;
}

/// Serves a tree with folder `a` holding `x.txt` and a top-level `root.txt`.
pub async fn mount_example_tree(server: &MockServer, x_hits: u64, root_hits: u64) {
    mount_listing(server, "/", &[Item::Folder("a"), Item::File("root.txt")]).await;
    mount_listing(server, "/a/", &[Item::File("x.txt")]).await;
    mount_file(server, "/a/x.txt", b"x contents", x_hits).await;
    mount_file(server, "/root.txt", b"root contents", root_hits).await;
}
