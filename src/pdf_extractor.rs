use lopdf::{Document, Object};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::errors::PdfExtractorError;

/// Text of a single page that had something on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
  pub number: u32,
  pub text: String,
}

#[derive(Debug, Clone)]
pub struct ExtractedDocument {
  pub path: PathBuf,
  pub total_pages: usize,
  pub pages: Vec<PageText>,
  /// Pages whose content stream could not be decoded.
  pub failed_pages: Vec<u32>,
}

// Object types that never carry page text. Dropping them while loading keeps
// image-heavy documents cheap to open.
static IGNORE: &[&str] = &["XObject", "Annot", "Metadata", "EmbeddedFile"];

fn filter_func(object_id: (u32, u16), object: &mut Object) -> Option<((u32, u16), Object)> {
  if IGNORE.contains(&object.type_name().unwrap_or_default()) {
    return None;
  }
  Some((object_id, object.to_owned()))
}

impl ExtractedDocument {
  /// Extracts the text of every page of a PDF, keeping only pages with
  /// non-whitespace content.
  pub fn from_pdf<P: AsRef<Path>>(pdf_path: P) -> Result<Self, PdfExtractorError> {
    let path = pdf_path.as_ref().to_path_buf();
    info!(path = %path.display(), "starting text extraction");
    if !path.exists() {
      return Err(PdfExtractorError::NotFound(path));
    }

    let doc = Document::load_filtered(&path, filter_func)
      .map_err(|source| PdfExtractorError::Load { path: path.clone(), source })?;

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    let total_pages = page_numbers.len();
    info!(total_pages, "pages found");

    let mut pages = Vec::new();
    let mut failed_pages = Vec::new();
    for page_num in page_numbers {
      debug!("processing page {}/{}", page_num, total_pages);
      match doc.extract_text(&[page_num]) {
        Ok(text) => {
          let text = normalize_page_text(&text);
          if !text.is_empty() {
            pages.push(PageText { number: page_num, text });
          }
        },
        Err(e) => {
          warn!(page = page_num, error = %e, "failed to extract page text, skipping page");
          failed_pages.push(page_num);
        },
      }
    }

    if pages.is_empty() {
      return Err(PdfExtractorError::NoText(path));
    }
    info!(pages_with_text = pages.len(), "text extracted from {}", path.display());
    Ok(ExtractedDocument { path, total_pages, pages, failed_pages })
  }

  /// Concatenates all page texts into a single string, one page per line block.
  pub fn full_text(&self) -> String {
    self.pages.iter().map(|page| page.text.as_str()).collect::<Vec<&str>>().join("\n")
  }

  pub fn page_count(&self) -> usize {
    self.pages.len()
  }
}

/// Trims trailing whitespace from every line and drops leading/trailing blank lines.
fn normalize_page_text(text: &str) -> String {
  text.split('\n').map(|line| line.trim_end()).collect::<Vec<&str>>().join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn test_normalize_page_text() {
    assert_eq!(normalize_page_text("\n  Title   \nbody text  \r\n\n"), "Title\nbody text");
    assert_eq!(normalize_page_text(" \n\t\n"), "");
  }

  #[test]
  fn test_missing_file_is_reported() {
    let result = ExtractedDocument::from_pdf("does/not/exist.pdf");
    assert!(matches!(result, Err(PdfExtractorError::NotFound(_))));
  }

  #[test]
  fn test_full_text_joins_pages() {
    let doc = ExtractedDocument {
      path: PathBuf::from("x.pdf"),
      total_pages: 3,
      pages: vec![
        PageText { number: 1, text: "first page".to_string() },
        PageText { number: 3, text: "third page".to_string() },
      ],
      failed_pages: vec![],
    };
    assert_eq!(doc.full_text(), "first page\nthird page");
    assert_eq!(doc.page_count(), 2);
  }
}
