mod common;

#[cfg(test)]
mod tests {
  use flashgen::{
    chunkifier::{ChunkStrategy, Chunkifier},
    errors::PdfExtractorError,
    pdf_extractor::ExtractedDocument,
  };

  use crate::common::write_pdf;

  #[test]
  fn test_blank_pages_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.pdf");
    write_pdf(&path, &[Some("Photosynthesis converts light into chemical energy"), None, Some("Cells divide by mitosis")]);

    let document = ExtractedDocument::from_pdf(&path).unwrap();
    assert_eq!(document.total_pages, 3);
    assert_eq!(document.page_count(), 2);
    assert_eq!(document.pages.iter().map(|p| p.number).collect::<Vec<_>>(), vec![1, 3]);
    assert!(document.pages[0].text.contains("Photosynthesis converts light"));
    assert!(document.full_text().contains("mitosis"));
    assert!(document.failed_pages.is_empty());
  }

  #[test]
  fn test_image_only_pdf_has_no_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.pdf");
    write_pdf(&path, &[None, None]);

    let result = ExtractedDocument::from_pdf(&path);
    assert!(matches!(result, Err(PdfExtractorError::NoText(_))));
  }

  #[test]
  fn test_unreadable_pdf_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.pdf");
    std::fs::write(&path, b"this is not a pdf document").unwrap();

    let result = ExtractedDocument::from_pdf(&path);
    assert!(matches!(result, Err(PdfExtractorError::Load { .. })));
  }

  #[test]
  fn test_missing_pdf_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let result = ExtractedDocument::from_pdf(dir.path().join("gone.pdf"));
    assert!(matches!(result, Err(PdfExtractorError::NotFound(_))));
  }

  #[test]
  fn test_page_batches_follow_the_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chapters.pdf");
    write_pdf(&path, &[Some("one"), Some("two"), None, Some("three"), Some("four")]);

    let document = ExtractedDocument::from_pdf(&path).unwrap();
    let chunks = Chunkifier::chunkify_document(&document, &ChunkStrategy::Pages { batch_size: 3 }).unwrap();
    assert_eq!(chunks.len(), 2);
    assert!(chunks[0].text.contains("one") && chunks[0].text.contains("three"));
    assert!(chunks[1].text.contains("four"));
  }
}
