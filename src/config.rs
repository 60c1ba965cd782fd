use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{
  chunkifier::{words_for_token_budget, ChunkStrategy},
  consts::*,
  errors::ConfigError,
  utils::get_config_dir,
};

/// How flashcards are requested from the model.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
  /// JSON-schema constrained response format.
  #[default]
  Structured,
  /// Free text completion, parsed as JSON.
  Text,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputShape {
  /// A bare JSON array of flashcards.
  #[default]
  Array,
  /// `{"flashcards": [...]}`
  Wrapped,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChunkStrategyKind {
  #[default]
  Words,
  Pages,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
  pub openai: OpenAISettings,
  pub chunking: ChunkingSettings,
  pub generation: GenerationSettings,
  pub output: OutputSettings,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OpenAISettings {
  pub model: String,
  pub api_base: String,
  pub api_key: Option<String>,
  pub backoff_max_elapsed_secs: u64,
}

impl Default for OpenAISettings {
  fn default() -> Self {
    OpenAISettings {
      model: DEFAULT_MODEL.to_string(),
      api_base: DEFAULT_API_BASE.to_string(),
      api_key: None,
      backoff_max_elapsed_secs: BACKOFF_MAX_ELAPSED_SECS,
    }
  }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ChunkingSettings {
  pub strategy: ChunkStrategyKind,
  pub chunk_tokens: usize,
  pub overlap_words: usize,
  pub pages_per_batch: usize,
}

impl Default for ChunkingSettings {
  fn default() -> Self {
    ChunkingSettings {
      strategy: ChunkStrategyKind::Words,
      chunk_tokens: CHUNK_TOKEN_LIMIT,
      overlap_words: CHUNK_OVERLAP_WORDS,
      pages_per_batch: PAGES_PER_BATCH,
    }
  }
}

impl ChunkingSettings {
  pub fn strategy(&self) -> ChunkStrategy {
    match self.strategy {
      ChunkStrategyKind::Words => {
        ChunkStrategy::Words { chunk_tokens: self.chunk_tokens, overlap_words: self.overlap_words }
      },
      ChunkStrategyKind::Pages => ChunkStrategy::Pages { batch_size: self.pages_per_batch },
    }
  }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GenerationSettings {
  pub mode: GenerationMode,
  /// Attempts per chunk before it is skipped.
  pub max_retries: u32,
  /// Chunks longer than this many characters are truncated before submission.
  pub max_chunk_chars: usize,
  /// Soft cap on the total number of flashcards.
  pub max_flashcards: usize,
  pub temperature: f32,
  pub max_tokens: u32,
  pub presence_penalty: f32,
  pub frequency_penalty: f32,
  pub summarize: bool,
  pub summary_max_chars: usize,
}

impl Default for GenerationSettings {
  fn default() -> Self {
    GenerationSettings {
      mode: GenerationMode::Structured,
      max_retries: MAX_RETRIES,
      max_chunk_chars: MAX_CHUNK_CHARS,
      max_flashcards: MAX_FLASHCARDS,
      temperature: TEMPERATURE,
      max_tokens: RESPONSE_MAX_TOKENS,
      presence_penalty: PRESENCE_PENALTY,
      frequency_penalty: FREQUENCY_PENALTY,
      summarize: false,
      summary_max_chars: SUMMARY_MAX_CHARS,
    }
  }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OutputSettings {
  pub shape: OutputShape,
  pub suffix: String,
  pub preview_count: usize,
}

impl Default for OutputSettings {
  fn default() -> Self {
    OutputSettings { shape: OutputShape::Array, suffix: OUTPUT_SUFFIX.to_string(), preview_count: PREVIEW_COUNT }
  }
}

impl Settings {
  /// Builds settings from the compiled defaults, a config file and
  /// `FLASHGEN__SECTION__KEY` environment variables, in increasing priority.
  ///
  /// An explicit `config_file` must exist; otherwise `config.toml` in the
  /// config directory is read when present.
  pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
    let (path, required) = match config_file {
      Some(path) => (path.to_path_buf(), true),
      None => (get_config_dir().join(CONFIG_FILE.as_str()), false),
    };
    debug!(path = %path.display(), required, "loading configuration");
    Self::load_from(path, required)
  }

  fn load_from(path: PathBuf, required: bool) -> Result<Self, ConfigError> {
    let settings: Settings = config::Config::builder()
      .add_source(config::File::from(path).required(required))
      .add_source(config::Environment::with_prefix(PROJECT_NAME.as_str()).separator("__").try_parsing(true))
      .build()?
      .try_deserialize()?;
    settings.validate()?;
    Ok(settings)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    let generation = &self.generation;
    if generation.max_retries == 0 {
      return Err(ConfigError::Invalid("generation.max_retries must be at least 1".to_string()));
    }
    if generation.max_chunk_chars == 0 {
      return Err(ConfigError::Invalid("generation.max_chunk_chars must be at least 1".to_string()));
    }
    if generation.max_flashcards == 0 {
      return Err(ConfigError::Invalid("generation.max_flashcards must be at least 1".to_string()));
    }
    let chunking = &self.chunking;
    if chunking.chunk_tokens == 0 {
      return Err(ConfigError::Invalid("chunking.chunk_tokens must be at least 1".to_string()));
    }
    let words_per_chunk = words_for_token_budget(chunking.chunk_tokens);
    if chunking.overlap_words >= words_per_chunk {
      return Err(ConfigError::Invalid(format!(
        "chunking.overlap_words ({}) must be smaller than the {} words that fit in {} tokens",
        chunking.overlap_words, words_per_chunk, chunking.chunk_tokens
      )));
    }
    let estimated_chars = words_per_chunk * CHARS_PER_WORD;
    if estimated_chars > generation.max_chunk_chars {
      return Err(ConfigError::Invalid(format!(
        "a chunk of {} words (about {} characters) would be truncated to generation.max_chunk_chars ({}); \
         lower chunking.chunk_tokens or raise generation.max_chunk_chars",
        words_per_chunk, estimated_chars, generation.max_chunk_chars
      )));
    }
    if chunking.pages_per_batch == 0 {
      return Err(ConfigError::Invalid("chunking.pages_per_batch must be at least 1".to_string()));
    }
    if self.openai.model.trim().is_empty() {
      return Err(ConfigError::Invalid("openai.model must not be empty".to_string()));
    }
    Ok(())
  }

  /// The API credential: `openai.api_key` if set, otherwise `OPENAI_API_KEY`.
  pub fn api_key(&self) -> Result<String, ConfigError> {
    let present = |key: &String| !key.trim().is_empty();
    self
      .openai
      .api_key
      .clone()
      .filter(present)
      .or_else(|| std::env::var(OPENAI_API_KEY_ENV).ok().filter(present))
      .ok_or(ConfigError::MissingApiKey)
  }
}
