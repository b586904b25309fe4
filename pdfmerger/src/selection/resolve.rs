//! Turning command-line inputs into a selection.
//!
//! Inputs may be plain file paths, glob patterns, or directories. A
//! directory behaves like a dropped folder: every regular file below it is
//! staged, in file-name order, and the PDF filter is left to rendering.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::FileSelection;
use crate::error::{MergerError, Result};
use crate::utils::{collect_paths_for_patterns, is_glob_pattern};

/// Expand inputs into concrete file paths, keeping the input order.
///
/// # Errors
///
/// Returns an error if a plain path does not exist, a glob pattern is
/// malformed, or a directory cannot be walked.
pub fn resolve_inputs<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<PathBuf>> {
    let mut resolved = Vec::new();

    for input in inputs {
        let input = input.as_ref();
        let text = input.to_string_lossy();

        if is_glob_pattern(&text) && !input.exists() {
            let matches = collect_paths_for_patterns([&*text])?;
            debug!(pattern = %text, matches = matches.len(), "Expanded glob pattern");
            resolved.extend(matches.into_iter().filter(|path| path.is_file()));
        } else if input.is_dir() {
            let before = resolved.len();
            walk_directory(input, &mut resolved)?;
            debug!(
                dir = %input.display(),
                files = resolved.len() - before,
                "Collected files from directory"
            );
        } else if input.exists() {
            resolved.push(input.to_path_buf());
        } else {
            return Err(MergerError::file_not_found(input.to_path_buf()));
        }
    }

    Ok(resolved)
}

fn walk_directory(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|err| MergerError::other(err.to_string()))?;
        if entry.file_type().is_file() {
            out.push(entry.into_path());
        }
    }
    Ok(())
}

/// Resolve inputs and describe every resulting file.
pub async fn load_selection<P: AsRef<Path>>(inputs: &[P]) -> Result<FileSelection> {
    let paths = resolve_inputs(inputs)?;
    FileSelection::from_paths(&paths).await
}
