//! HTTP client for the merger backend.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use percent_encoding::percent_decode_str;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use super::types::{MergeOptions, MergeResponse, StatusResponse, UploadResponse};
use crate::config::Config;
use crate::error::{MergerError, Result};
use crate::selection::SelectedFile;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Client for the upload, merge and status endpoints.
///
/// Every call is independent: there is no retry and no cancellation, and a
/// request only times out when a timeout was configured.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client without a request timeout.
    pub fn new(base_url: Url) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    /// Create a client with an optional per-request timeout.
    pub fn with_timeout(base_url: Url, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|err| MergerError::other(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self { client, base_url })
    }

    /// Create a client for the configured server.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_timeout(config.server.clone(), config.timeout)
    }

    /// Base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Upload files as one multipart request with a `files` part per file.
    pub async fn upload_files(&self, files: &[SelectedFile]) -> Result<UploadResponse> {
        self.send_upload(files)
            .await
            .inspect_err(|err| error!(error = %err, "Upload error"))
    }

    /// Ask the backend to merge an upload batch.
    pub async fn merge_pdfs(&self, options: &MergeOptions) -> Result<MergeResponse> {
        self.send_merge(options)
            .await
            .inspect_err(|err| error!(error = %err, "Merge error"))
    }

    /// Fetch the state of an asynchronous task.
    pub async fn check_status(&self, task_id: &str) -> Result<StatusResponse> {
        self.send_status(task_id)
            .await
            .inspect_err(|err| error!(error = %err, task_id, "Status check error"))
    }

    /// Download the merged document into `dest_dir`.
    ///
    /// `download_url` may be absolute or relative to the base URL. The file
    /// is named after the last path segment of the URL.
    pub async fn download(&self, download_url: &str, dest_dir: &Path) -> Result<PathBuf> {
        self.send_download(download_url, dest_dir)
            .await
            .inspect_err(|err| error!(error = %err, download_url, "Download error"))
    }

    #[instrument(skip_all, fields(files = files.len()))]
    async fn send_upload(&self, files: &[SelectedFile]) -> Result<UploadResponse> {
        let url = self.endpoint(&["api", "upload"])?;

        let mut form = Form::new();
        for file in files {
            let bytes = file.read_bytes().await?;
            let part = Part::bytes(bytes)
                .file_name(file.name.clone())
                .mime_str(&file.mime_type)
                .map_err(|err| MergerError::other(format!("Invalid MIME type: {err}")))?;
            form = form.part("files", part);
        }

        debug!(%url, "Uploading files");
        let response = self.client.post(url).multipart(form).send().await?;
        read_json(response).await
    }

    #[instrument(skip_all, fields(session_id = %options.session_id))]
    async fn send_merge(&self, options: &MergeOptions) -> Result<MergeResponse> {
        let url = self.endpoint(&["api", "merge"])?;

        debug!(%url, "Requesting merge");
        let response = self.client.post(url).json(options).send().await?;
        read_json(response).await
    }

    async fn send_status(&self, task_id: &str) -> Result<StatusResponse> {
        let url = self.endpoint(&["api", "status", task_id])?;

        let response = self.client.get(url).send().await?;
        read_json(response).await
    }

    async fn send_download(&self, download_url: &str, dest_dir: &Path) -> Result<PathBuf> {
        let url = self
            .base_url
            .join(download_url)
            .map_err(|err| MergerError::invalid_url(download_url, err))?;

        let file_name = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|name| !name.is_empty())
            .map(percent_decode)
            .ok_or_else(|| MergerError::invalid_url(url.as_str(), "URL has no file name"))?;

        if file_name.contains(['/', '\\']) || file_name == ".." {
            return Err(MergerError::invalid_url(url.as_str(), "unsafe file name"));
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MergerError::http(status.as_u16()));
        }

        let dest = dest_dir.join(&file_name);
        let output = tokio::fs::File::create(&dest).await.map_err(|err| {
            MergerError::FileNotAccessible {
                path: dest.clone(),
                source: err,
            }
        })?;

        match write_body(response, output).await {
            Ok(written) => {
                info!(path = %dest.display(), bytes = written, "Downloaded merged document");
                Ok(dest)
            }
            Err(err) => {
                // Never leave a truncated document behind.
                if let Err(remove_err) = tokio::fs::remove_file(&dest).await {
                    warn!(path = %dest.display(), error = %remove_err, "Failed to remove partial download");
                }
                Err(err)
            }
        }
    }

    /// Resolve an endpoint below the base URL, encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MergerError::invalid_url(self.base_url.as_str(), "cannot be a base URL"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Decode a JSON body after checking the status code.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(MergerError::http(status.as_u16()));
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|err| MergerError::invalid_response(err.to_string()))
}

/// Stream a response body into `output`, returning the bytes written.
async fn write_body(response: reqwest::Response, mut output: tokio::fs::File) -> Result<u64> {
    let mut written: u64 = 0;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        output.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    output.flush().await?;
    Ok(written)
}

fn percent_decode(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}
