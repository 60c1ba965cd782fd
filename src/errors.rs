use async_openai::error::OpenAIError;
use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlashgenError {
  #[error(transparent)]
  Cli(#[from] CliError),
  #[error(transparent)]
  Config(#[from] ConfigError),
  #[error(transparent)]
  PdfExtractor(#[from] PdfExtractorError),
  #[error(transparent)]
  Chunkifier(#[from] ChunkifierError),
  #[error(transparent)]
  GPTConnector(#[from] GPTConnectorError),
  #[error(transparent)]
  Writer(#[from] WriterError),
}

/// Problems with the command line input, detected before any file is read.
#[derive(Debug, Error)]
pub enum CliError {
  #[error("the input file must be a PDF (*.pdf), got {}\nusage: flashgen <PDF>", .0.display())]
  NotPdf(PathBuf),
  #[error("the file {} does not exist\nusage: flashgen <PDF>", .0.display())]
  NotFound(PathBuf),
  #[error("{} is not a regular file\nusage: flashgen <PDF>", .0.display())]
  NotAFile(PathBuf),
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to load configuration: {0}")]
  Load(#[from] config::ConfigError),
  #[error("no API key configured: set OPENAI_API_KEY or openai.api_key in the config file")]
  MissingApiKey,
  #[error("invalid configuration: {0}")]
  Invalid(String),
}

#[derive(Debug, Error)]
pub enum PdfExtractorError {
  #[error("file not found: {}", .0.display())]
  NotFound(PathBuf),
  #[error("failed to load and process the PDF at {}: {source}", .path.display())]
  Load {
    path: PathBuf,
    #[source]
    source: lopdf::Error,
  },
  #[error("no text could be extracted from {} (image-only or empty document?)", .0.display())]
  NoText(PathBuf),
}

#[derive(Debug, Error)]
pub enum ChunkifierError {
  #[error("overlap of {overlap} words must be smaller than the chunk size of {words_per_chunk} words")]
  InvalidOverlap { overlap: usize, words_per_chunk: usize },
  #[error("invalid chunk size: {0}")]
  InvalidSize(String),
}

#[derive(Debug, Error)]
pub enum GPTConnectorError {
  #[error("OpenAI error: {0}")]
  OpenAI(#[from] OpenAIError),
  #[error("the model returned an empty response")]
  EmptyResponse,
  #[error("malformed response: {0}")]
  MalformedResponse(String),
  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum WriterError {
  #[error("failed to write {}: {source}", .path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("failed to read {}: {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("flashcard {index} in {} is incomplete or has the wrong number of wrong options", .path.display())]
  InvalidFlashcard { path: PathBuf, index: usize },
  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}
