//! User-facing output: messages, listings and the progress bar.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerger::output::OutputFormatter;
//! use pdfmerger::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Uploading files");
//! formatter.success("Merge completed successfully");
//! # }
//! ```

pub mod formatter;
pub mod progress;

pub use formatter::{MessageLevel, OutputFormatter};
pub use progress::{ProgressBar, SimulatedProgress, animate};

use crate::selection::FileListView;
use crate::summary::{MergeListItem, MergeSummary};

/// Format one row of the selected-files list.
///
/// The index is the position in the selection, which is what
/// `--remove` takes.
pub fn format_file_row(index: usize, name: &str, size_label: &str) -> String {
    format!("[{index}] {name} ({size_label})")
}

/// Format one row of the merge list.
pub fn format_merge_row(item: &MergeListItem) -> String {
    let pages = item.pages_label.as_deref().unwrap_or("?");
    let size = item.size_label.as_deref().unwrap_or("?");
    format!("{} - {pages} pages, {size}", item.name)
}

/// Display the selected PDFs and their total size.
pub fn display_file_list(formatter: &OutputFormatter, view: &FileListView) {
    if view.is_empty() {
        formatter.warning("No PDF files selected");
        return;
    }

    formatter.section("Selected files:");
    for item in &view.items {
        formatter.info(&format!(
            "  {}",
            format_file_row(item.index, &item.name, &item.size_label)
        ));
    }
    formatter.detail("Total size", &view.total_size_label);
}

/// Display the files accepted by the backend with their totals.
pub fn display_merge_summary(
    formatter: &OutputFormatter,
    items: &[MergeListItem],
    summary: &MergeSummary,
) {
    formatter.section("Files to merge:");
    for (position, item) in items.iter().enumerate() {
        formatter.list_item(position + 1, &format_merge_row(item));
    }
    formatter.detail("Files", &summary.file_count.to_string());
    formatter.detail("Total pages", &summary.total_pages.to_string());
    formatter.detail("Estimated size", &summary.estimated_size);
}
