//! HTTP wrappers against a mocked backend.

use pdfmerger::api::{ApiEnvelope, MergeOptions};
use pdfmerger::error::MergerError;
use rstest::rstest;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{SESSION_ID, client_for, fake_pdf_bytes, merge_ok, pdf, upload_ok};

#[tokio::test]
async fn test_upload_sends_one_part_per_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(upload_ok(&[("a.pdf", 2, 1024), ("b.pdf", 5, 2048)]))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .upload_files(&[pdf("a.pdf", 1024), pdf("b.pdf", 2048)])
        .await
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(response.session_id.as_deref(), Some(SESSION_ID));
    assert_eq!(response.files.len(), 2);

    let requests = server.received_requests().await.unwrap();
    let request = &requests[0];
    let content_type = request
        .headers
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data"));

    let body = String::from_utf8_lossy(&request.body);
    assert_eq!(body.matches("name=\"files\"").count(), 2);
    assert!(body.contains("filename=\"a.pdf\""));
    assert!(body.contains("filename=\"b.pdf\""));
    assert!(body.to_lowercase().contains("content-type: application/pdf"));
}

#[tokio::test]
async fn test_upload_reads_files_from_disk() {
    let dir = TempDir::new().unwrap();
    let file_path = crate::common::write_file(dir.path(), "disk.pdf", &fake_pdf_bytes(600));
    let file = pdfmerger::SelectedFile::from_path(&file_path).await.unwrap();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(upload_ok(&[("disk.pdf", 1, 600)]))
        .mount(&server)
        .await;

    client_for(&server).upload_files(&[file]).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("%PDF-1.4"));
}

#[tokio::test]
async fn test_merge_posts_json_options() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/merge"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "session_id": SESSION_ID,
            "output_filename": "book.pdf",
            "bookmarks": true,
        })))
        .respond_with(merge_ok("book.pdf"))
        .expect(1)
        .mount(&server)
        .await;

    let options = MergeOptions::new(SESSION_ID, "book.pdf").with_option("bookmarks", true);
    let response = client_for(&server).merge_pdfs(&options).await.unwrap();

    assert_eq!(response.download_url.as_deref(), Some("/download_file/book.pdf"));
    assert_eq!(response.filename.as_deref(), Some("book.pdf"));
    assert!(response.task_id.is_none());
}

#[tokio::test]
async fn test_check_status_encodes_task_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status/task%2042"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "processing", "progress": 40})),
        )
        .mount(&server)
        .await;

    let status = client_for(&server).check_status("task 42").await.unwrap();

    assert_eq!(status.status, "processing");
    assert_eq!(status.progress, Some(40.0));
}

#[rstest]
#[case(500)]
#[case(404)]
#[case(413)]
#[tokio::test]
async fn test_upload_http_error_reports_status(#[case] code: u16) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(code))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .upload_files(&[pdf("a.pdf", 10)])
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(code));
    assert!(err.to_string().contains(&code.to_string()));
    assert_eq!(err.to_string(), format!("HTTP error! status: {code}"));
}

#[tokio::test]
async fn test_merge_http_error_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/merge"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .merge_pdfs(&MergeOptions::new(SESSION_ID, "out.pdf"))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_status_http_error_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server).check_status("missing").await.unwrap_err();

    assert!(matches!(err, MergerError::Http { status: 404 }));
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_non_json_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).check_status("t1").await.unwrap_err();

    assert!(matches!(err, MergerError::InvalidResponse { .. }));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_error_envelope_with_http_200() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/merge"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "error", "message": "Session not found"})),
        )
        .mount(&server)
        .await;

    let response = client_for(&server)
        .merge_pdfs(&MergeOptions::new("stale", "out.pdf"))
        .await
        .unwrap();
    let err = response.into_result().unwrap_err();

    assert_eq!(err.to_string(), "Server reported an error: Session not found");
    assert_eq!(err.exit_code(), 6);
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Reserve a port, then release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let base = url::Url::parse(&format!("http://127.0.0.1:{port}")).unwrap();
    let client = pdfmerger::ApiClient::new(base).unwrap();

    let err = client.check_status("t1").await.unwrap_err();

    assert!(matches!(err, MergerError::Network { .. }));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_download_streams_to_disk() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download_file/book.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(fake_pdf_bytes(4096)))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let saved = client_for(&server)
        .download("/download_file/book.pdf", dir.path())
        .await
        .unwrap();

    assert_eq!(saved, dir.path().join("book.pdf"));
    assert_eq!(std::fs::read(&saved).unwrap(), fake_pdf_bytes(4096));
}

#[tokio::test]
async fn test_download_missing_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download_file/gone.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let err = client_for(&server)
        .download("/download_file/gone.pdf", dir.path())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(404));
    assert!(!dir.path().join("gone.pdf").exists());
}

#[tokio::test]
async fn test_download_into_missing_directory() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download_file/book.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(fake_pdf_bytes(128)))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("not-created");
    let err = client_for(&server)
        .download("/download_file/book.pdf", &missing)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        MergerError::FileNotAccessible { ref path, .. } if *path == missing.join("book.pdf")
    ));
    assert!(!missing.exists());
}

#[tokio::test]
async fn test_truncated_download_is_removed() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    // Announce more bytes than are sent, then close the connection.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 1024];
        let _ = socket.read(&mut request).await;
        let head = "HTTP/1.1 200 OK\r\ncontent-type: application/pdf\r\ncontent-length: 4096\r\n\r\n";
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(b"%PDF-1.4 partial").await.unwrap();
        socket.shutdown().await.unwrap();
    });

    let base = url::Url::parse(&format!("http://{addr}")).unwrap();
    let client = pdfmerger::ApiClient::new(base).unwrap();
    let dir = TempDir::new().unwrap();

    let result = client.download("/download_file/book.pdf", dir.path()).await;

    assert!(result.is_err());
    assert!(!dir.path().join("book.pdf").exists());
}
