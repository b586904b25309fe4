//! File selection and list rendering.
//!
//! A [`FileSelection`] is the ordered set of files the user picked, in the
//! role of a file input's file list. It may contain files of any type; only
//! PDFs (by MIME type) are rendered and counted towards the total size.
//!
//! # Examples
//!
//! ```
//! use pdfmerger::selection::{FileSelection, SelectedFile};
//!
//! let mut selection = FileSelection::from_files(vec![
//!     SelectedFile::in_memory("a.pdf", vec![0; 2048]),
//!     SelectedFile::in_memory("notes.txt", vec![0; 100]),
//!     SelectedFile::in_memory("b.pdf", vec![0; 1024]),
//! ]);
//!
//! let view = selection.render();
//! assert_eq!(view.items.len(), 2);
//! assert_eq!(view.total_size_label, "3.0 KB");
//!
//! selection.remove(0).unwrap();
//! assert_eq!(selection.render().items[0].name, "b.pdf");
//! ```

pub mod dropzone;
pub mod resolve;

pub use dropzone::{DragEvent, DropZone};
pub use resolve::{load_selection, resolve_inputs};

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::{MergerError, Result};
use crate::utils::format_kb;

/// MIME type that marks a file as a PDF.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Where the bytes of a selected file live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContents {
    /// Read from disk at upload time.
    Path(PathBuf),
    /// Already held in memory.
    Bytes(Vec<u8>),
}

/// A single file picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// File name as shown to the user and sent to the backend.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type guessed from the file name.
    pub mime_type: String,
    /// Source of the file's bytes.
    pub contents: FileContents,
}

impl SelectedFile {
    /// Create a file entry with an explicit MIME type.
    pub fn new(
        name: impl Into<String>,
        size: u64,
        mime_type: impl Into<String>,
        contents: FileContents,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            contents,
        }
    }

    /// Create an in-memory file; size and MIME type are derived.
    pub fn in_memory(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = guess_mime_type(Path::new(&name));
        Self {
            size: bytes.len() as u64,
            mime_type,
            name,
            contents: FileContents::Bytes(bytes),
        }
    }

    /// Describe a file on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not exist, is not a regular file,
    /// or its metadata cannot be read.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let metadata = tokio::fs::metadata(path).await.map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                MergerError::file_not_found(path.to_path_buf())
            } else {
                MergerError::FileNotAccessible {
                    path: path.to_path_buf(),
                    source: err,
                }
            }
        })?;

        if !metadata.is_file() {
            return Err(MergerError::not_a_file(path.to_path_buf()));
        }

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            size: metadata.len(),
            mime_type: guess_mime_type(path),
            contents: FileContents::Path(path.to_path_buf()),
        })
    }

    /// Whether this file is a PDF.
    pub fn is_pdf(&self) -> bool {
        self.mime_type == PDF_MIME_TYPE
    }

    /// Size label, e.g. `"12.5 KB"`.
    pub fn size_label(&self) -> String {
        format_kb(self.size)
    }

    /// Load the file's bytes.
    pub async fn read_bytes(&self) -> Result<Vec<u8>> {
        match &self.contents {
            FileContents::Bytes(bytes) => Ok(bytes.clone()),
            FileContents::Path(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|err| MergerError::FileNotAccessible {
                        path: path.clone(),
                        source: err,
                    })
            }
        }
    }
}

fn guess_mime_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// One rendered row of the selected-files list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileItem {
    /// Position of the file in the full selection; pass it to [`FileSelection::remove`].
    pub index: usize,
    /// File name.
    pub name: String,
    /// Size label, e.g. `"12.5 KB"`.
    pub size_label: String,
}

/// The rendered selected-files list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListView {
    /// One item per PDF file, in selection order.
    pub items: Vec<FileItem>,
    /// Total size of the listed files, e.g. `"40.0 KB"`.
    pub total_size_label: String,
}

impl FileListView {
    /// Whether nothing is listed.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Ordered set of files picked by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    files: Vec<SelectedFile>,
}

impl FileSelection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a selection from files, keeping their order.
    pub fn from_files(files: Vec<SelectedFile>) -> Self {
        Self { files }
    }

    /// Describe every path and build a selection in the given order.
    ///
    /// Metadata is read concurrently.
    pub async fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let files =
            futures::future::try_join_all(paths.iter().map(SelectedFile::from_path)).await?;
        Ok(Self { files })
    }

    /// All files, including non-PDFs.
    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    /// PDF files only, in selection order.
    pub fn pdf_files(&self) -> impl Iterator<Item = &SelectedFile> {
        self.files.iter().filter(|file| file.is_pdf())
    }

    /// Number of files, including non-PDFs.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the selection is empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Append a file.
    pub fn push(&mut self, file: SelectedFile) {
        self.files.push(file);
    }

    /// Append several files, keeping their order.
    pub fn extend(&mut self, files: impl IntoIterator<Item = SelectedFile>) {
        self.files.extend(files);
    }

    /// Total size of the PDF files in bytes.
    pub fn total_size(&self) -> u64 {
        self.pdf_files().map(|file| file.size).sum()
    }

    /// Render the list of PDF files and their total size.
    pub fn render(&self) -> FileListView {
        let items = self
            .files
            .iter()
            .enumerate()
            .filter(|(_, file)| file.is_pdf())
            .map(|(index, file)| FileItem {
                index,
                name: file.name.clone(),
                size_label: file.size_label(),
            })
            .collect();

        FileListView {
            items,
            total_size_label: format_kb(self.total_size()),
        }
    }

    /// Remove the file at `index`; every other file keeps its relative order.
    ///
    /// # Errors
    ///
    /// Returns [`MergerError::IndexOutOfRange`] if `index` is past the end.
    pub fn remove(&mut self, index: usize) -> Result<SelectedFile> {
        self.check_index(index)?;
        Ok(self.files.remove(index))
    }

    /// Remove the file at `index` and render the updated list.
    pub fn remove_and_render(&mut self, index: usize) -> Result<FileListView> {
        self.remove(index)?;
        Ok(self.render())
    }

    /// Move the file at `from` so that it ends up at position `to`.
    pub fn move_file(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;

        let file = self.files.remove(from);
        self.files.insert(to, file);
        Ok(())
    }

    /// Reorder the selection to follow `names`.
    ///
    /// For each name the first file with that name is taken. Files whose
    /// name is not listed are dropped from the selection.
    pub fn reorder_by_names<S: AsRef<str>>(&mut self, names: &[S]) {
        let reordered = names
            .iter()
            .filter_map(|name| {
                self.files
                    .iter()
                    .find(|file| file.name == name.as_ref())
                    .cloned()
            })
            .collect();

        self.files = reordered;
    }

    /// Sort files by name; equal names keep their relative order.
    pub fn sort_by_name(&mut self) {
        self.files.sort_by(|a, b| a.name.cmp(&b.name));
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.files.len() {
            return Err(MergerError::IndexOutOfRange {
                index,
                len: self.files.len(),
            });
        }
        Ok(())
    }
}
