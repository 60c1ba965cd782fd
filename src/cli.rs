use clap::Parser;
use std::{ffi::OsStr, path::Path, path::PathBuf};

use crate::{config::GenerationMode, errors::CliError, utils::version};

#[derive(Parser, Debug, Clone)]
#[command(author, version = version(), about)]
pub struct Cli {
  #[arg(value_name = "PDF", help = "PDF document to generate flashcards from")]
  pub input: PathBuf,

  #[arg(short, long, value_name = "PATH", help = "output file, defaults to <input-name>_test.json next to the input")]
  pub output: Option<PathBuf>,

  #[arg(short, long, value_name = "NAME", help = "OpenAI model used to generate questions")]
  pub model: Option<String>,

  #[arg(long, value_enum, help = "request a schema-constrained response or parse free text")]
  pub mode: Option<GenerationMode>,

  #[arg(long, value_name = "N", help = "stop once this many flashcards have been generated")]
  pub max_flashcards: Option<usize>,

  #[arg(long, help = "summarize the document first and pass the summary as context", default_value_t = false)]
  pub summarize: bool,

  #[arg(long, help = "write {\"flashcards\": [...]} instead of a bare array", default_value_t = false)]
  pub wrapped: bool,

  #[arg(short, long, value_name = "FILE", help = "configuration file")]
  pub config: Option<PathBuf>,
}

/// Checks the input path: the `.pdf` suffix first, without touching the
/// filesystem, then that it names an existing regular file.
pub fn validate_input_path(path: &Path) -> Result<(), CliError> {
  let is_pdf = path.extension().and_then(OsStr::to_str).is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
  if !is_pdf {
    return Err(CliError::NotPdf(path.to_path_buf()));
  }
  if !path.exists() {
    return Err(CliError::NotFound(path.to_path_buf()));
  }
  if !path.is_file() {
    return Err(CliError::NotAFile(path.to_path_buf()));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_arguments() {
    let cli = Cli::try_parse_from(["flashgen", "notes.pdf", "--mode", "text", "--max-flashcards", "20", "--wrapped"])
      .unwrap();
    assert_eq!(cli.input, PathBuf::from("notes.pdf"));
    assert_eq!(cli.mode, Some(GenerationMode::Text));
    assert_eq!(cli.max_flashcards, Some(20));
    assert!(cli.wrapped);
    assert!(!cli.summarize);
  }

  #[test]
  fn test_missing_input_is_a_usage_error() {
    let err = Cli::try_parse_from(["flashgen"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
  }

  #[test]
  fn test_extension_is_checked_before_existence() {
    let result = validate_input_path(Path::new("definitely/not/here/notes.txt"));
    assert!(matches!(result, Err(CliError::NotPdf(_))));
    let result = validate_input_path(Path::new("definitely/not/here/notes"));
    assert!(matches!(result, Err(CliError::NotPdf(_))));
  }

  #[test]
  fn test_missing_pdf_is_reported() {
    let result = validate_input_path(Path::new("definitely/not/here/notes.pdf"));
    assert!(matches!(result, Err(CliError::NotFound(_))));
  }

  #[test]
  fn test_directory_is_not_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let fake = dir.path().join("folder.pdf");
    std::fs::create_dir(&fake).unwrap();
    assert!(matches!(validate_input_path(&fake), Err(CliError::NotAFile(_))));

    let real = dir.path().join("Slides.PDF");
    std::fs::write(&real, b"%PDF-1.5").unwrap();
    assert!(validate_input_path(&real).is_ok());
  }
}
