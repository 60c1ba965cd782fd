use serde_json::Value;
use tracing::{error, info, warn};

use crate::{
  config::{GenerationMode, GenerationSettings},
  consts::{FLASHCARD_SYSTEM_PROMPT, SUMMARY_SYSTEM_PROMPT, SUMMARY_TEMPERATURE},
  errors::GPTConnectorError,
  gpt_connector::{CompletionRequest, FlashcardBackend},
  types::{Flashcard, FlashcardSet, TextChunk},
};

/// Flashcards read out of one model reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFlashcards {
  pub flashcards: Vec<Flashcard>,
  /// Records that were present but failed validation.
  pub discarded: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChunkOutcome {
  Generated(ParsedFlashcards),
  Skipped { attempts: u32, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationReport {
  pub flashcards: FlashcardSet,
  pub chunks_processed: usize,
  pub chunks_skipped: usize,
  pub discarded: usize,
  /// Processing stopped early because the flashcard cap was reached.
  pub cap_reached: bool,
}

impl GenerationReport {
  fn record(mut self, outcome: ChunkOutcome) -> Self {
    self.chunks_processed += 1;
    match outcome {
      ChunkOutcome::Generated(parsed) => {
        self.discarded += parsed.discarded;
        self.flashcards.extend(parsed.flashcards);
      },
      ChunkOutcome::Skipped { .. } => self.chunks_skipped += 1,
    }
    self
  }
}

/// Truncates `text` to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
  match text.char_indices().nth(max_chars) {
    Some((byte_index, _)) => (&text[..byte_index], true),
    None => (text, false),
  }
}

/// Removes a surrounding Markdown code fence, if any.
fn strip_code_fence(content: &str) -> &str {
  let trimmed = content.trim();
  let Some(rest) = trimmed.strip_prefix("```") else {
    return trimmed;
  };
  // a fence on a single line has no language tag line to skip
  let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
  body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// The outermost `[`..`]` span of `content`, if any.
fn bracket_span(content: &str) -> Option<&str> {
  let start = content.find('[')?;
  let end = content.rfind(']')?;
  (start < end).then(|| &content[start..=end])
}

fn parse_json_lenient(content: &str) -> Result<Value, GPTConnectorError> {
  let stripped = strip_code_fence(content);
  match serde_json::from_str::<Value>(stripped) {
    Ok(value) => Ok(value),
    // models sometimes wrap the array in prose
    Err(err) => match bracket_span(stripped).or_else(|| bracket_span(content)) {
      Some(span) => serde_json::from_str::<Value>(span).map_err(|_| err.into()),
      None => Err(err.into()),
    },
  }
}

/// Parses a model reply into validated flashcards. Accepts a bare array or a
/// `{"flashcards": [...]}` object; invalid records are dropped and counted.
pub fn parse_flashcards(content: &str) -> Result<ParsedFlashcards, GPTConnectorError> {
  let value = parse_json_lenient(content)?;
  let records = match &value {
    Value::Array(records) => records,
    Value::Object(object) => match object.get("flashcards") {
      Some(Value::Array(records)) => records,
      _ => return Err(GPTConnectorError::MalformedResponse("object without a flashcards array".to_string())),
    },
    _ => return Err(GPTConnectorError::MalformedResponse("the response is not a JSON list".to_string())),
  };
  let flashcards: Vec<Flashcard> = records.iter().filter_map(Flashcard::from_value).collect();
  Ok(ParsedFlashcards { discarded: records.len() - flashcards.len(), flashcards })
}

pub fn flashcard_request(text: &str, context: Option<&str>, settings: &GenerationSettings) -> CompletionRequest {
  let mut user = String::new();
  if let Some(summary) = context {
    user.push_str(&format!("Summary of the whole document, for context only:\n{}\n\n", summary));
  }
  user.push_str(&format!("Generate flashcards in valid JSON for this text:\n\n{}", text));
  CompletionRequest {
    system: FLASHCARD_SYSTEM_PROMPT.to_string(),
    user,
    structured: settings.mode == GenerationMode::Structured,
    temperature: settings.temperature,
    max_tokens: Some(settings.max_tokens),
    presence_penalty: Some(settings.presence_penalty),
    frequency_penalty: Some(settings.frequency_penalty),
  }
}

pub fn summary_request(text: &str) -> CompletionRequest {
  CompletionRequest {
    system: SUMMARY_SYSTEM_PROMPT.to_string(),
    user: text.to_string(),
    structured: false,
    temperature: SUMMARY_TEMPERATURE,
    max_tokens: None,
    presence_penalty: None,
    frequency_penalty: None,
  }
}

pub struct QuestionGenerator<'a, B: FlashcardBackend + ?Sized> {
  backend: &'a B,
  settings: &'a GenerationSettings,
}

impl<'a, B: FlashcardBackend + ?Sized> QuestionGenerator<'a, B> {
  pub fn new(backend: &'a B, settings: &'a GenerationSettings) -> Self {
    QuestionGenerator { backend, settings }
  }

  /// Asks for a summary of the whole document. Failures are logged and yield `None`.
  pub async fn summarize(&self, text: &str) -> Option<String> {
    info!("generating document summary");
    let (text, truncated) = truncate_chars(text, self.settings.summary_max_chars);
    if truncated {
      warn!(max_chars = self.settings.summary_max_chars, "document truncated for the summary request");
    }
    match self.backend.complete(&summary_request(text)).await {
      Ok(summary) => {
        info!("summary generated");
        Some(summary.trim().to_string())
      },
      Err(e) => {
        error!(error = %e, "failed to generate the summary, continuing without it");
        None
      },
    }
  }

  /// Processes chunks in order until they run out or the flashcard cap is reached.
  pub async fn generate(&self, chunks: &[TextChunk], context: Option<&str>) -> GenerationReport {
    let mut report = GenerationReport::default();
    if chunks.is_empty() {
      error!("there is no text to process");
      return report;
    }
    for chunk in chunks {
      info!("--- processing chunk {}/{} ---", chunk.index + 1, chunks.len());
      let outcome = self.process_chunk(chunk, context).await;
      report = report.record(outcome);
      if report.flashcards.len() >= self.settings.max_flashcards {
        info!(max_flashcards = self.settings.max_flashcards, "flashcard limit reached");
        report.cap_reached = report.chunks_processed < chunks.len();
        break;
      }
    }
    info!(
      total = report.flashcards.len(),
      skipped_chunks = report.chunks_skipped,
      discarded = report.discarded,
      "flashcard generation finished"
    );
    report
  }

  /// Requests flashcards for one chunk, retrying failed attempts up to `max_retries` times.
  pub async fn process_chunk(&self, chunk: &TextChunk, context: Option<&str>) -> ChunkOutcome {
    let (text, truncated) = truncate_chars(&chunk.text, self.settings.max_chunk_chars);
    if truncated {
      warn!(chunk = chunk.index + 1, max_chars = self.settings.max_chunk_chars, "chunk truncated for excessive length");
    }
    let request = flashcard_request(text, context, self.settings);

    let max_retries = self.settings.max_retries;
    let mut last_error = String::new();
    for attempt in 1..=max_retries {
      let result = self.backend.complete(&request).await.and_then(|content| parse_flashcards(&content));
      match result {
        Ok(parsed) => {
          info!(
            chunk = chunk.index + 1,
            valid = parsed.flashcards.len(),
            discarded = parsed.discarded,
            "valid flashcards in this chunk"
          );
          return ChunkOutcome::Generated(parsed);
        },
        Err(e) => {
          warn!(chunk = chunk.index + 1, attempt, max_retries, error = %e, "flashcard request failed");
          last_error = e.to_string();
        },
      }
    }
    warn!("skipping chunk {} after {} failed attempts", chunk.index + 1, max_retries);
    ChunkOutcome::Skipped { attempts: max_retries, reason: last_error }
  }
}
