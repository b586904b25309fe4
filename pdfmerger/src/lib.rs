//! pdfmerger - client toolkit for a PDF-merging web service.
//!
//! The backend accepts a batch of uploaded PDFs, merges them into one
//! document and serves the result for download. This library covers the
//! client side of that exchange:
//!
//! - Selecting files, rendering the list of PDFs and editing it
//! - Staging files through a drag-and-drop zone
//! - Summing page counts and sizes for the merge list
//! - Calling the upload, merge and status endpoints
//! - Simulated upload progress
//!
//! # Examples
//!
//! ## Listing a selection
//!
//! ```
//! use pdfmerger::selection::{FileSelection, SelectedFile};
//!
//! let selection = FileSelection::from_files(vec![
//!     SelectedFile::in_memory("a.pdf", vec![0; 1536]),
//!     SelectedFile::in_memory("b.pdf", vec![0; 512]),
//! ]);
//!
//! let view = selection.render();
//! assert_eq!(view.total_size_label, "2.0 KB");
//! ```
//!
//! ## Merging through the backend
//!
//! ```no_run
//! use pdfmerger::{ApiClient, Config};
//! use pdfmerger::selection::load_selection;
//! use pdfmerger::workflow::run_merge;
//!
//! # async fn example() -> pdfmerger::Result<()> {
//! let config = Config::new(Config::parse_server("http://localhost:5000")?);
//! let client = ApiClient::from_config(&config)?;
//!
//! let mut selection = load_selection(&["a.pdf", "b.pdf"]).await?;
//! let outcome = run_merge(&client, &mut selection, &config, None, |_| {}).await?;
//! println!("Merged {} pages", outcome.summary.total_pages);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod config;
pub mod error;
pub mod output;
pub mod selection;
pub mod summary;
pub mod utils;
pub mod workflow;

// Re-export commonly used types
pub use api::{ApiClient, StatusPoller};
pub use config::{Config, MergeOrder};
pub use error::{MergerError, Result};
pub use selection::{FileSelection, SelectedFile};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
