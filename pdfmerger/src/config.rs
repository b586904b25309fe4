//! Configuration for talking to the merger backend.
//!
//! The CLI turns its arguments into a [`Config`], which is validated once
//! and then drives the client, the poller and the merge workflow.

use anyhow::bail;

use crate::error::{MergerError, Result};
use crate::selection::FileSelection;
use std::{path::PathBuf, str::FromStr, time::Duration};
use url::Url;

/// Server used when none is configured.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// Output name used when none is given.
pub const DEFAULT_OUTPUT_FILENAME: &str = "merged.pdf";

/// Largest upload the backend accepts (50 MiB).
pub const MAX_UPLOAD_SIZE: u64 = 50 * 1024 * 1024;

/// Delay between two status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Status checks before giving up on a task.
pub const DEFAULT_MAX_POLLS: u32 = 120;

/// Order in which selected files are uploaded and merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeOrder {
    /// Sort by file name, which is how the backend merges a session.
    #[default]
    Filename,
    /// Keep the selection order.
    UploadOrder,
}

impl MergeOrder {
    /// Reorder a selection in place.
    pub fn apply(&self, selection: &mut FileSelection) {
        match self {
            Self::Filename => selection.sort_by_name(),
            Self::UploadOrder => {}
        }
    }

    /// The name accepted by [`MergeOrder::from_str`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Filename => "filename",
            Self::UploadOrder => "upload_order",
        }
    }
}

impl FromStr for MergeOrder {
    type Err = MergerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "filename" => Ok(Self::Filename),
            "upload_order" | "upload" => Ok(Self::UploadOrder),
            _ => Err(MergerError::invalid_config(format!(
                "Invalid merge order: {s}. Must be one of: filename, upload_order"
            ))),
        }
    }
}

/// Normalize the requested output name.
///
/// Surrounding whitespace is trimmed, an empty name becomes
/// [`DEFAULT_OUTPUT_FILENAME`], and `.pdf` is appended when missing.
///
/// # Errors
///
/// Returns [`MergerError::InvalidConfig`] if the name contains a path
/// separator or is a relative path component.
///
/// # Examples
///
/// ```
/// use pdfmerger::config::normalize_output_filename;
///
/// assert_eq!(normalize_output_filename("report").unwrap(), "report.pdf");
/// assert_eq!(normalize_output_filename("  ").unwrap(), "merged.pdf");
/// assert!(normalize_output_filename("../x.pdf").is_err());
/// ```
pub fn normalize_output_filename(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(DEFAULT_OUTPUT_FILENAME.to_string());
    }

    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(MergerError::invalid_config(format!(
            "Output filename must not contain a path: {name}"
        )));
    }

    if name.ends_with(".pdf") {
        Ok(name.to_string())
    } else {
        Ok(format!("{name}.pdf"))
    }
}

/// Settings for one CLI invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the merger backend.
    pub server: Url,

    /// Files, directories or glob patterns to select.
    pub inputs: Vec<PathBuf>,

    /// Name of the merged document, already normalized.
    pub output_filename: String,

    /// Order of the uploaded files.
    pub order: MergeOrder,

    /// Where to save the merged document, if anywhere.
    pub download_dir: Option<PathBuf>,

    /// Per-request timeout. `None` waits forever.
    pub timeout: Option<Duration>,

    /// Delay between status checks.
    pub poll_interval: Duration,

    /// Status checks before giving up.
    pub max_polls: u32,

    /// Show the simulated progress bar while merging.
    pub show_progress: bool,

    /// Stop after validating the selection.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,
}

impl Config {
    /// Create a configuration with defaults for everything but the server.
    pub fn new(server: Url) -> Self {
        Self {
            server,
            inputs: Vec::new(),
            output_filename: DEFAULT_OUTPUT_FILENAME.to_string(),
            order: MergeOrder::default(),
            download_dir: None,
            timeout: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
            show_progress: true,
            dry_run: false,
            verbose: false,
            quiet: false,
        }
    }

    /// Parse a server URL.
    ///
    /// # Errors
    ///
    /// Returns [`MergerError::InvalidUrl`] if the URL does not parse.
    pub fn parse_server(server: &str) -> Result<Url> {
        Url::parse(server).map_err(|err| MergerError::invalid_url(server, err))
    }

    /// Returns a reference to inputs.
    pub fn inputs(&self) -> &[PathBuf] {
        self.inputs.as_ref()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MergerError::InvalidConfig`] if:
    /// - The server URL is not http or https
    /// - Verbose and quiet modes are both enabled
    /// - The poll interval is zero
    /// - The poll count is zero
    pub fn validate(&self) -> Result<()> {
        self.check()
            .map_err(|err| MergerError::invalid_config(err.to_string()))
    }

    fn check(&self) -> anyhow::Result<()> {
        if !matches!(self.server.scheme(), "http" | "https") {
            bail!("Server URL must use http or https: {}", self.server);
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if self.poll_interval.is_zero() {
            bail!("Poll interval must be greater than zero");
        }

        if self.max_polls == 0 {
            bail!("Number of status checks must be at least 1");
        }

        Ok(())
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }
}
