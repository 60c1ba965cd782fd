use tracing::debug;

use crate::{
  consts::TOKENS_PER_WORD,
  errors::ChunkifierError,
  pdf_extractor::{ExtractedDocument, PageText},
  types::TextChunk,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkStrategy {
  /// Overlapping windows of words sized from a token budget.
  Words { chunk_tokens: usize, overlap_words: usize },
  /// Groups of whole consecutive pages.
  Pages { batch_size: usize },
}

/// Word budget for a token budget, estimating `TOKENS_PER_WORD` tokens per word.
pub fn words_for_token_budget(chunk_tokens: usize) -> usize {
  ((chunk_tokens as f64 / TOKENS_PER_WORD).floor() as usize).max(1)
}

pub struct Chunkifier;

impl Chunkifier {
  pub fn chunkify_document(
    document: &ExtractedDocument,
    strategy: &ChunkStrategy,
  ) -> Result<Vec<TextChunk>, ChunkifierError> {
    let chunks = match *strategy {
      ChunkStrategy::Words { chunk_tokens, overlap_words } => {
        Self::chunkify_text(&document.full_text(), words_for_token_budget(chunk_tokens), overlap_words)?
      },
      ChunkStrategy::Pages { batch_size } => Self::chunkify_pages(&document.pages, batch_size)?,
    };
    debug!(chunks = chunks.len(), ?strategy, "document chunked");
    Ok(chunks)
  }

  /// Splits text on whitespace and assembles windows of at most
  /// `words_per_chunk` words. Each window after the first starts
  /// `overlap_words` words before the end of the previous one.
  pub fn chunkify_text(
    text: &str,
    words_per_chunk: usize,
    overlap_words: usize,
  ) -> Result<Vec<TextChunk>, ChunkifierError> {
    if words_per_chunk == 0 {
      return Err(ChunkifierError::InvalidSize("a chunk must hold at least one word".to_string()));
    }
    if overlap_words >= words_per_chunk {
      return Err(ChunkifierError::InvalidOverlap { overlap: overlap_words, words_per_chunk });
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < words.len() {
      let end = (start + words_per_chunk).min(words.len());
      let overlap = if chunks.is_empty() { 0 } else { overlap_words };
      chunks.push(TextChunk {
        index: chunks.len(),
        text: words[start..end].join(" "),
        word_start: start,
        word_end: end,
        overlap_words: overlap,
      });
      if end == words.len() {
        break;
      }
      start = end - overlap_words;
    }
    Ok(chunks)
  }

  /// Groups `batch_size` consecutive pages into one chunk, joined by newlines.
  pub fn chunkify_pages(pages: &[PageText], batch_size: usize) -> Result<Vec<TextChunk>, ChunkifierError> {
    if batch_size == 0 {
      return Err(ChunkifierError::InvalidSize("a page batch must hold at least one page".to_string()));
    }
    let mut chunks = Vec::new();
    let mut word_start = 0;
    for batch in pages.chunks(batch_size) {
      let text = batch.iter().map(|page| page.text.as_str()).collect::<Vec<&str>>().join("\n");
      let word_count = text.split_whitespace().count();
      if word_count == 0 {
        continue;
      }
      chunks.push(TextChunk {
        index: chunks.len(),
        text,
        word_start,
        word_end: word_start + word_count,
        overlap_words: 0,
      });
      word_start += word_count;
    }
    Ok(chunks)
  }
}
