//! Error types for pdfmerger.
//!
//! Every fallible operation in the crate returns [`MergerError`]. For the
//! HTTP wrappers the taxonomy is flat: any non-success response becomes
//! [`MergerError::Http`] carrying only the status code, and any transport
//! failure becomes [`MergerError::Network`].
//!
//! # Error Categories
//!
//! - **Transport**: non-2xx responses, connection failures, undecodable bodies
//! - **Application**: the backend answered `{"status": "error"}`
//! - **Local**: missing files, bad indices, oversized selections
//! - **Configuration**: invalid URLs or option combinations

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfmerger operations.
pub type Result<T> = std::result::Result<T, MergerError>;

/// Main error type for pdfmerger operations.
#[derive(Debug, thiserror::Error)]
pub enum MergerError {
    /// The backend answered with a non-success HTTP status.
    #[error("HTTP error! status: {status}")]
    Http {
        /// Numeric HTTP status code.
        status: u16,
    },

    /// The request never produced a response (DNS, refused connection, timeout).
    #[error("Network error: {source}")]
    Network {
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be decoded as the expected JSON.
    #[error("Invalid response from server: {reason}")]
    InvalidResponse {
        /// Decoder message.
        reason: String,
    },

    /// The backend reported an application-level failure.
    #[error("Server reported an error: {message}")]
    Api {
        /// Message sent by the backend.
        message: String,
    },

    /// Status polling gave up before the task reached a final state.
    #[error("Task {task_id} did not complete after {attempts} status checks")]
    PollExhausted {
        /// Task being polled.
        task_id: String,
        /// Number of status checks performed.
        attempts: u32,
    },

    /// Input file was not found.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input path exists but is not a regular file.
    #[error("Not a file: {}", .path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// Input file could not be read.
    #[error("Cannot access file: {}\n  Reason: {source}", .path.display())]
    FileNotAccessible {
        /// Path to the inaccessible file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The selection contains no PDF files.
    #[error("No PDF files selected")]
    NoFilesSelected,

    /// A file index does not exist in the selection.
    #[error("File index {index} is out of range (selection has {len} file(s))")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of files in the selection.
        len: usize,
    },

    /// The selected files exceed the backend's upload limit.
    #[error(
        "Selected files total {size} bytes, which exceeds the upload limit of {limit} bytes\n  \
         Hint: remove some files or split the merge into several runs"
    )]
    PayloadTooLarge {
        /// Total size of the selection in bytes.
        size: u64,
        /// Maximum accepted size in bytes.
        limit: u64,
    },

    /// A URL could not be parsed or joined.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<reqwest::Error> for MergerError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::http(status.as_u16());
        }
        if err.is_decode() {
            return Self::invalid_response(err.to_string());
        }
        Self::Network { source: err }
    }
}

impl MergerError {
    /// Create an Http error.
    pub fn http(status: u16) -> Self {
        Self::Http { status }
    }

    /// Create an InvalidResponse error.
    pub fn invalid_response(reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            reason: reason.into(),
        }
    }

    /// Create an Api error.
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// HTTP status code carried by this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status } => Some(*status),
            _ => None,
        }
    }

    /// Whether the error came from talking to the backend.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::Network { .. } | Self::InvalidResponse { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::FileNotAccessible { .. } => 2,
            Self::NoFilesSelected => 1,
            Self::IndexOutOfRange { .. } => 1,
            Self::PayloadTooLarge { .. } => 4,
            Self::Http { .. } => 5,
            Self::Network { .. } => 5,
            Self::InvalidResponse { .. } => 5,
            Self::Api { .. } => 6,
            Self::PollExhausted { .. } => 7,
            Self::InvalidUrl { .. } => 1,
            Self::InvalidConfig { .. } => 1,
            Self::Io(_) => 5,
            Self::Other { .. } => 1,
        }
    }
}
