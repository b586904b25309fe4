//! Aggregate page and size counts for the merge list.
//!
//! After upload the backend reports each accepted file with its page count
//! and size. Those rows are rendered as text labels, and the totals are
//! computed by scanning the labels back, so a row with a missing or garbled
//! label simply contributes nothing.

use serde::Serialize;

use crate::api::UploadedFile;
use crate::utils::{format_kb, parse_leading_float, parse_leading_int, round_tenths};

/// One rendered row of the merge list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeListItem {
    /// File name.
    pub name: String,
    /// Page count label, e.g. `"12"`.
    pub pages_label: Option<String>,
    /// Size label, e.g. `"34.5 KB"`.
    pub size_label: Option<String>,
}

impl MergeListItem {
    /// Render a row from an uploaded file entry.
    pub fn from_uploaded(file: &UploadedFile) -> Self {
        Self {
            name: file.name.clone(),
            pages_label: Some(file.pages.to_string()),
            size_label: Some(format_kb(file.size)),
        }
    }
}

/// Render the merge list for a set of uploaded files.
pub fn merge_list(files: &[UploadedFile]) -> Vec<MergeListItem> {
    files.iter().map(MergeListItem::from_uploaded).collect()
}

/// Totals shown next to the merge list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeSummary {
    /// Number of rows.
    pub file_count: usize,
    /// Sum of all page counts.
    pub total_pages: u64,
    /// Estimated output size, e.g. `"1.2 MB"`.
    pub estimated_size: String,
}

impl MergeSummary {
    /// Compute the totals for the given rows.
    pub fn from_items(items: &[MergeListItem]) -> Self {
        Self {
            file_count: items.len(),
            total_pages: total_pages(items),
            estimated_size: estimated_size(items),
        }
    }
}

/// Sum the page-count labels.
///
/// A label counts as its leading integer; missing, unparsable or negative
/// labels count as 0.
pub fn total_pages(items: &[MergeListItem]) -> u64 {
    items
        .iter()
        .filter_map(|item| item.pages_label.as_deref())
        .filter_map(parse_leading_int)
        .map(|pages| u64::try_from(pages).unwrap_or(0))
        .fold(0, u64::saturating_add)
}

/// Estimate the merged size from the size labels, in megabytes.
///
/// Each label is read as kilobytes; missing or unparsable labels count as 0.
pub fn estimated_size(items: &[MergeListItem]) -> String {
    let total_kb: f64 = items
        .iter()
        .filter_map(|item| item.size_label.as_deref())
        .filter_map(|label| parse_leading_float(&label.replace(" KB", "")))
        .sum();

    format!("{:.1} MB", round_tenths(total_kb / 1024.0))
}
