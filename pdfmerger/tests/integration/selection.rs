//! Selecting, listing and editing files from disk.

use pdfmerger::error::MergerError;
use pdfmerger::selection::{DragEvent, DropZone, FileSelection, load_selection};
use pdfmerger::utils::format_kb;
use tempfile::TempDir;

use crate::common::{fake_pdf_bytes, pdf, write_file};

fn names(selection: &FileSelection) -> Vec<String> {
    selection.render().items.into_iter().map(|item| item.name).collect()
}

#[tokio::test]
async fn test_listing_matches_selected_pdfs() {
    let dir = TempDir::new().unwrap();
    let sizes = [1500usize, 2048, 777];
    let mut inputs = Vec::new();
    for (i, size) in sizes.iter().enumerate() {
        inputs.push(write_file(dir.path(), &format!("doc{i}.pdf"), &fake_pdf_bytes(*size)));
    }

    let selection = load_selection(&inputs).await.unwrap();
    let view = selection.render();

    assert_eq!(view.items.len(), 3);
    assert_eq!(view.total_size_label, format_kb(sizes.iter().sum::<usize>() as u64));
    assert_eq!(view.total_size_label, "4.2 KB");
}

#[tokio::test]
async fn test_non_pdf_files_are_not_listed() {
    let dir = TempDir::new().unwrap();
    let a = write_file(dir.path(), "a.pdf", &fake_pdf_bytes(1024));
    let notes = write_file(dir.path(), "notes.txt", &[b'x'; 4096]);
    let image = write_file(dir.path(), "scan.png", &[0u8; 4096]);

    let selection = load_selection(&[notes, a, image]).await.unwrap();
    let view = selection.render();

    assert_eq!(selection.len(), 3);
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].name, "a.pdf");
    assert_eq!(view.items[0].index, 1);
    assert_eq!(view.total_size_label, "1.0 KB");
}

#[test]
fn test_remove_keeps_relative_order() {
    let files: Vec<_> = ["a.pdf", "b.pdf", "c.pdf", "d.pdf", "e.pdf"]
        .into_iter()
        .map(|name| pdf(name, 100))
        .collect();

    for index in 0..files.len() {
        let mut selection = FileSelection::from_files(files.clone());
        let removed = selection.remove(index).unwrap();

        let mut expected: Vec<String> = files.iter().map(|f| f.name.clone()).collect();
        expected.remove(index);

        assert_eq!(removed.name, files[index].name);
        assert_eq!(names(&selection), expected);
    }
}

#[test]
fn test_remove_out_of_range() {
    let mut selection = FileSelection::from_files(vec![pdf("a.pdf", 1)]);
    let err = selection.remove(1).unwrap_err();
    assert!(matches!(err, MergerError::IndexOutOfRange { index: 1, len: 1 }));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_drop_zone_stages_files() {
    let mut zone = DropZone::new();
    let mut selection = FileSelection::from_files(vec![pdf("first.pdf", 10)]);

    zone.handle(DragEvent::Over, &mut selection);
    assert!(zone.is_highlighted());
    assert!(zone.classes().contains(&"dragover"));

    zone.handle(DragEvent::Leave, &mut selection);
    assert!(!zone.is_highlighted());

    zone.handle(DragEvent::Over, &mut selection);
    let added = zone.handle(
        DragEvent::Drop(vec![pdf("second.pdf", 10), pdf("readme.txt", 10)]),
        &mut selection,
    );

    assert_eq!(added, 1);
    assert!(!zone.is_highlighted());
    assert_eq!(selection.len(), 3);
    assert_eq!(names(&selection), vec!["first.pdf", "second.pdf"]);
}

#[test]
fn test_reorder_by_names() {
    let mut selection = FileSelection::from_files(vec![
        pdf("a.pdf", 1),
        pdf("b.pdf", 1),
        pdf("c.pdf", 1),
    ]);

    selection.reorder_by_names(&["c.pdf", "missing.pdf", "a.pdf"]);

    assert_eq!(names(&selection), vec!["c.pdf", "a.pdf"]);
}

#[test]
fn test_move_file() {
    let mut selection = FileSelection::from_files(vec![
        pdf("a.pdf", 1),
        pdf("b.pdf", 1),
        pdf("c.pdf", 1),
    ]);

    selection.move_file(2, 0).unwrap();
    assert_eq!(names(&selection), vec!["c.pdf", "a.pdf", "b.pdf"]);

    assert!(selection.move_file(0, 3).is_err());
}

#[tokio::test]
async fn test_missing_input() {
    let dir = TempDir::new().unwrap();
    let err = load_selection(&[dir.path().join("nope.pdf")]).await.unwrap_err();

    assert!(matches!(err, MergerError::FileNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
}
