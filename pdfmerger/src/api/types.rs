//! Request and response payloads of the merger backend.
//!
//! The backend owns these schemas. Every field is optional or defaulted and
//! unknown fields are kept in `extra`, so any JSON object decodes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{MergerError, Result};

/// Status value the backend uses for application-level failures.
pub const STATUS_ERROR: &str = "error";

/// Status value of a successful upload or merge.
pub const STATUS_SUCCESS: &str = "success";

/// Status value of a finished task.
pub const STATUS_COMPLETED: &str = "completed";

/// Status value of a task that stopped without producing output.
pub const STATUS_FAILED: &str = "failed";

/// A file the backend accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Stored (sanitized) file name.
    #[serde(default)]
    pub name: String,
    /// Number of pages detected by the backend.
    #[serde(default)]
    pub pages: u64,
    /// File size in bytes.
    #[serde(default)]
    pub size: u64,
}

/// Response of `POST /api/upload`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// `"success"` or `"error"`.
    #[serde(default)]
    pub status: String,
    /// Identifier of the upload batch, passed back to the merge call.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Files the backend kept; corrupted or non-PDF files are dropped.
    #[serde(default)]
    pub files: Vec<UploadedFile>,
    /// Error description when `status` is `"error"`.
    #[serde(default)]
    pub message: Option<String>,
    /// Fields this client does not know about.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Options sent as the JSON body of `POST /api/merge`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeOptions {
    /// Upload batch to merge.
    pub session_id: String,
    /// Name of the merged document.
    pub output_filename: String,
    /// Additional caller-supplied options, forwarded verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MergeOptions {
    /// Create merge options for an upload batch.
    pub fn new(session_id: impl Into<String>, output_filename: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            output_filename: output_filename.into(),
            extra: Map::new(),
        }
    }

    /// Add a free-form option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Response of `POST /api/merge`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeResponse {
    /// `"success"` or `"error"`.
    #[serde(default)]
    pub status: String,
    /// Server-relative URL of the merged file.
    #[serde(default)]
    pub download_url: Option<String>,
    /// Name of the merged file.
    #[serde(default)]
    pub filename: Option<String>,
    /// Task to poll when the merge runs asynchronously.
    #[serde(default)]
    pub task_id: Option<String>,
    /// Error description when `status` is `"error"`.
    #[serde(default)]
    pub message: Option<String>,
    /// Fields this client does not know about.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of `GET /api/status/{task_id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Task state, e.g. `"processing"` or `"completed"`.
    #[serde(default)]
    pub status: String,
    /// Completion in percent.
    #[serde(default)]
    pub progress: Option<f64>,
    /// Optional human-readable detail.
    #[serde(default)]
    pub message: Option<String>,
    /// Fields this client does not know about.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StatusResponse {
    /// Whether the task finished.
    pub fn is_complete(&self) -> bool {
        self.status == STATUS_COMPLETED || self.progress.is_some_and(|p| p >= 100.0)
    }

    /// Whether the task stopped without finishing.
    pub fn is_failed(&self) -> bool {
        self.status == STATUS_FAILED || self.status == STATUS_ERROR
    }
}

/// Responses that may report an application-level error with HTTP 200.
pub trait ApiEnvelope: Sized {
    /// The `status` field.
    fn status(&self) -> &str;

    /// The `message` field.
    fn message(&self) -> Option<&str>;

    /// Turn an `{"status": "error"}` payload into [`MergerError::Api`].
    fn into_result(self) -> Result<Self> {
        if self.status() == STATUS_ERROR {
            let message = self.message().unwrap_or("unknown error").to_string();
            return Err(MergerError::api(message));
        }
        Ok(self)
    }
}

impl ApiEnvelope for UploadResponse {
    fn status(&self) -> &str {
        &self.status
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl ApiEnvelope for MergeResponse {
    fn status(&self) -> &str {
        &self.status
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
