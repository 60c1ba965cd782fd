use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::{
  chunkifier::Chunkifier,
  cli::{validate_input_path, Cli},
  config::{OutputShape, Settings},
  errors::FlashgenError,
  generator::QuestionGenerator,
  gpt_connector::FlashcardBackend,
  pdf_extractor::ExtractedDocument,
  writer::{format_preview, output_path_for, write_flashcards},
};

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
  pub output_path: PathBuf,
  pub flashcards: usize,
  pub chunks: usize,
  pub chunks_skipped: usize,
  pub cap_reached: bool,
}

pub struct App {
  pub input: PathBuf,
  pub output: PathBuf,
  pub settings: Settings,
}

impl App {
  /// Validates the input path, then loads settings and applies CLI overrides.
  pub fn from_cli(cli: &Cli) -> Result<Self, FlashgenError> {
    validate_input_path(&cli.input)?;
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(model) = &cli.model {
      settings.openai.model = model.clone();
    }
    if let Some(mode) = cli.mode {
      settings.generation.mode = mode;
    }
    if let Some(max_flashcards) = cli.max_flashcards {
      settings.generation.max_flashcards = max_flashcards;
    }
    if cli.summarize {
      settings.generation.summarize = true;
    }
    if cli.wrapped {
      settings.output.shape = OutputShape::Wrapped;
    }
    settings.validate()?;
    Ok(App::new(cli.input.clone(), cli.output.clone(), settings))
  }

  pub fn new(input: PathBuf, output: Option<PathBuf>, settings: Settings) -> Self {
    let output = output.unwrap_or_else(|| output_path_for(&input, &settings.output.suffix));
    App { input, output, settings }
  }

  /// Extracts, chunks, generates and writes, in that order. Extraction and
  /// write failures end the run; per-chunk failures do not.
  pub async fn run<B: FlashcardBackend + ?Sized>(&self, backend: &B) -> Result<RunSummary, FlashgenError> {
    let document = ExtractedDocument::from_pdf(&self.input).map_err(|e| {
      error!(error = %e, "could not extract text from the PDF, stopping");
      e
    })?;

    let chunks = Chunkifier::chunkify_document(&document, &self.settings.chunking.strategy())?;
    info!(chunks = chunks.len(), pages = document.page_count(), "document split into chunks");

    let generator = QuestionGenerator::new(backend, &self.settings.generation);
    let context = if self.settings.generation.summarize { generator.summarize(&document.full_text()).await } else { None };
    let report = generator.generate(&chunks, context.as_deref()).await;

    self.write(&report.flashcards)?;
    let preview = format_preview(&report.flashcards, self.settings.output.preview_count);
    if !preview.is_empty() {
      println!("\nSample flashcards:{}", preview);
    }

    Ok(RunSummary {
      output_path: self.output.clone(),
      flashcards: report.flashcards.len(),
      chunks: chunks.len(),
      chunks_skipped: report.chunks_skipped,
      cap_reached: report.cap_reached,
    })
  }

  fn write(&self, flashcards: &[crate::types::Flashcard]) -> Result<(), FlashgenError> {
    write_flashcards(&self.output, flashcards, self.settings.output.shape).map_err(|e| {
      error!(error = %e, "failed to save the flashcards");
      FlashgenError::from(e)
    })
  }

  pub fn output_path(&self) -> &Path {
    &self.output
  }
}
