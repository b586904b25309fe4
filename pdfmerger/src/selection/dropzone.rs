//! Drag-and-drop staging area.
//!
//! The drop zone only tracks whether something is being dragged over it.
//! A drop stages the dropped files into the selection exactly as if they had
//! been picked through the file chooser, so rendering applies the same PDF
//! filter to both paths.

use tracing::debug;

use super::{FileSelection, SelectedFile};

/// Class name a front-end applies while the zone is highlighted.
pub const DRAGOVER_CLASS: &str = "dragover";

/// Events a drop zone reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    /// Something is dragged over the zone.
    Over,
    /// The drag left the zone.
    Leave,
    /// Files were released over the zone.
    Drop(Vec<SelectedFile>),
}

/// Highlight state of the drop target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropZone {
    highlighted: bool,
}

impl DropZone {
    /// Create an idle drop zone.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the zone is currently highlighted.
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// CSS-style classes for the zone in its current state.
    pub fn classes(&self) -> Vec<&'static str> {
        let mut classes = vec!["file-drop-zone"];
        if self.highlighted {
            classes.push(DRAGOVER_CLASS);
        }
        classes
    }

    /// React to a drag event.
    ///
    /// Returns the number of dropped PDF files that were staged; other
    /// events return 0.
    pub fn handle(&mut self, event: DragEvent, selection: &mut FileSelection) -> usize {
        match event {
            DragEvent::Over => {
                self.highlighted = true;
                0
            }
            DragEvent::Leave => {
                self.highlighted = false;
                0
            }
            DragEvent::Drop(files) => {
                self.highlighted = false;
                debug!(count = files.len(), "Dropped files");

                let pdf_count = files.iter().filter(|file| file.is_pdf()).count();
                selection.extend(files);
                pdf_count
            }
        }
    }
}
