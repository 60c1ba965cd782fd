use serde::{Deserialize, Serialize};
use std::{
  fs,
  path::{Path, PathBuf},
};
use tracing::info;

use crate::{config::OutputShape, errors::WriterError, types::Flashcard};

#[derive(Serialize)]
struct WrappedRef<'a> {
  flashcards: &'a [Flashcard],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlashcardFile {
  Bare(Vec<Flashcard>),
  Wrapped { flashcards: Vec<Flashcard> },
}

/// `notes/chapter1.pdf` becomes `notes/chapter1<suffix>`.
pub fn output_path_for(input: &Path, suffix: &str) -> PathBuf {
  let mut name = input.with_extension("").into_os_string();
  name.push(suffix);
  PathBuf::from(name)
}

/// Pretty JSON with two-space indentation; non-ASCII text is written as is.
pub fn render_flashcards(flashcards: &[Flashcard], shape: OutputShape) -> Result<String, WriterError> {
  let rendered = match shape {
    OutputShape::Array => serde_json::to_string_pretty(flashcards)?,
    OutputShape::Wrapped => serde_json::to_string_pretty(&WrappedRef { flashcards })?,
  };
  Ok(rendered)
}

pub fn write_flashcards(path: &Path, flashcards: &[Flashcard], shape: OutputShape) -> Result<(), WriterError> {
  let rendered = render_flashcards(flashcards, shape)?;
  fs::write(path, rendered).map_err(|source| WriterError::Write { path: path.to_path_buf(), source })?;
  info!(count = flashcards.len(), "flashcards saved to {}", path.display());
  Ok(())
}

/// Reads a flashcard file written in either shape. Every card must pass
/// the same validation generated cards do.
pub fn read_flashcards(path: &Path) -> Result<Vec<Flashcard>, WriterError> {
  let content = fs::read_to_string(path).map_err(|source| WriterError::Read { path: path.to_path_buf(), source })?;
  let flashcards = match serde_json::from_str::<FlashcardFile>(&content)? {
    FlashcardFile::Bare(flashcards) => flashcards,
    FlashcardFile::Wrapped { flashcards } => flashcards,
  };
  if let Some(index) = flashcards.iter().position(|flashcard| !flashcard.is_valid()) {
    return Err(WriterError::InvalidFlashcard { path: path.to_path_buf(), index });
  }
  Ok(flashcards)
}

pub fn format_preview(flashcards: &[Flashcard], count: usize) -> String {
  let mut preview = String::new();
  for (i, flashcard) in flashcards.iter().take(count).enumerate() {
    preview.push_str(&format!("\nFlashcard {}:\n", i + 1));
    preview.push_str(&format!("Question: {}\n", flashcard.front));
    preview.push_str(&format!("Correct answer: {}\n", flashcard.back));
    preview.push_str("Wrong options:\n");
    for wrong in &flashcard.wrong_options {
      preview.push_str(&format!("- {}\n", wrong));
    }
    preview.push_str(&"-".repeat(40));
    preview.push('\n');
  }
  preview
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn sample() -> Vec<Flashcard> {
    vec![
      Flashcard::new("¿Qué es la fotosíntesis?", "Conversión de luz en energía química", ["Respiración", "Digestión"]),
      Flashcard::new("What is 2 + 2?", "4", ["3", "5"]),
    ]
  }

  #[test]
  fn test_output_path_for() {
    assert_eq!(output_path_for(Path::new("docs/tema1.pdf"), "_test.json"), PathBuf::from("docs/tema1_test.json"));
    assert_eq!(output_path_for(Path::new("Notes.v2.PDF"), "_test.json"), PathBuf::from("Notes.v2_test.json"));
  }

  #[test]
  fn test_render_array() {
    let rendered = render_flashcards(&sample()[..1], OutputShape::Array).unwrap();
    insta::assert_snapshot!(rendered, @r###"
    [
      {
        "front": "¿Qué es la fotosíntesis?",
        "back": "Conversión de luz en energía química",
        "wrongOptions": [
          "Respiración",
          "Digestión"
        ]
      }
    ]
    "###);
  }

  #[test]
  fn test_render_wrapped() {
    let rendered = render_flashcards(&sample()[1..], OutputShape::Wrapped).unwrap();
    insta::assert_snapshot!(rendered, @r###"
    {
      "flashcards": [
        {
          "front": "What is 2 + 2?",
          "back": "4",
          "wrongOptions": [
            "3",
            "5"
          ]
        }
      ]
    }
    "###);
  }

  #[test]
  fn test_round_trip_both_shapes() {
    let dir = tempfile::tempdir().unwrap();
    for shape in [OutputShape::Array, OutputShape::Wrapped] {
      let path = dir.path().join("out_test.json");
      write_flashcards(&path, &sample(), shape).unwrap();
      assert_eq!(read_flashcards(&path).unwrap(), sample());
    }
  }

  #[test]
  fn test_read_rejects_invalid_cards() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edited_test.json");
    fs::write(
      &path,
      r#"[
        {"front": "q1", "back": "a1", "wrongOptions": ["x", "y"]},
        {"front": "q2", "back": " ", "wrongOptions": ["x", "y"]}
      ]"#,
    )
    .unwrap();
    assert!(matches!(read_flashcards(&path), Err(WriterError::InvalidFlashcard { index: 1, .. })));

    fs::write(&path, r#"{"flashcards": [{"front": "q", "back": "a", "wrongOptions": ["x"]}]}"#).unwrap();
    assert!(matches!(read_flashcards(&path), Err(WriterError::InvalidFlashcard { index: 0, .. })));
  }

  #[test]
  fn test_write_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing_dir").join("out_test.json");
    let result = write_flashcards(&path, &sample(), OutputShape::Array);
    assert!(matches!(result, Err(WriterError::Write { .. })));
  }

  #[test]
  fn test_format_preview_limits_count() {
    let preview = format_preview(&sample(), 1);
    assert!(preview.contains("Flashcard 1:"));
    assert!(preview.contains("Question: ¿Qué es la fotosíntesis?"));
    assert!(preview.contains("- Digestión"));
    assert!(!preview.contains("Flashcard 2:"));
  }
}
