//! Shared helpers for the integration tests.
//!
//! Every test talks to a `wiremock` server standing in for the merger
//! backend, and stages its files in a temporary directory.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use pdfmerger::api::ApiClient;
use pdfmerger::config::Config;
use pdfmerger::selection::SelectedFile;
use serde_json::{Value, json};
use tempfile::TempDir;
use url::Url;
use wiremock::{MockServer, ResponseTemplate};

/// Session id returned by the mocked upload endpoint.
pub const SESSION_ID: &str = "3f9c2a7e-session";

/// Client pointed at the mock server.
pub fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(server_url(server)).expect("client should build")
}

/// Base URL of the mock server.
pub fn server_url(server: &MockServer) -> Url {
    Url::parse(&server.uri()).expect("mock server URI should parse")
}

/// Configuration pointed at the mock server with fast polling and no
/// progress bar.
pub fn config_for(server: &MockServer) -> Config {
    let mut config = Config::new(server_url(server));
    config.poll_interval = Duration::from_millis(5);
    config.max_polls = 5;
    config.show_progress = false;
    config.quiet = true;
    config
}

/// An in-memory file named `name` with `size` bytes.
pub fn pdf(name: &str, size: usize) -> SelectedFile {
    SelectedFile::in_memory(name, fake_pdf_bytes(size))
}

/// Bytes that start like a PDF.
pub fn fake_pdf_bytes(size: usize) -> Vec<u8> {
    let mut bytes = b"%PDF-1.4\n".to_vec();
    bytes.resize(size.max(bytes.len()), b' ');
    bytes
}

/// Write a file into `dir` and return its path.
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("failed to write fixture");
    path
}

/// A temporary directory holding the given PDF names.
pub fn pdf_dir(names: &[&str]) -> TempDir {
    let dir = TempDir::new().expect("failed to create temp dir");
    for name in names {
        write_file(dir.path(), name, &fake_pdf_bytes(2048));
    }
    dir
}

/// Successful upload response listing `(name, pages, size)` entries.
pub fn upload_ok(files: &[(&str, u64, u64)]) -> ResponseTemplate {
    let files: Vec<Value> = files
        .iter()
        .map(|(name, pages, size)| json!({"name": name, "pages": pages, "size": size}))
        .collect();

    ResponseTemplate::new(200).set_body_json(json!({
        "status": "success",
        "session_id": SESSION_ID,
        "files": files,
    }))
}

/// Successful synchronous merge response.
pub fn merge_ok(filename: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "status": "success",
        "download_url": format!("/download_file/{filename}"),
        "filename": filename,
    }))
}

/// Status response with the given state and progress.
pub fn status_body(status: &str, progress: f64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "status": status,
        "progress": progress,
    }))
}
