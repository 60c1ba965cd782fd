use lazy_static::lazy_static;
use std::path::PathBuf;

// model defaults
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const BACKOFF_MAX_ELAPSED_SECS: u64 = 60;

// chunking defaults
/// Estimated tokens per whitespace-separated word.
pub const TOKENS_PER_WORD: f64 = 1.3;
/// Upper estimate of characters per word of prose, separator included.
pub const CHARS_PER_WORD: usize = 8;
pub const CHUNK_TOKEN_LIMIT: usize = 3000;
pub const CHUNK_OVERLAP_WORDS: usize = 150;
pub const PAGES_PER_BATCH: usize = 3;

// generation defaults
pub const MAX_RETRIES: u32 = 3;
pub const MAX_CHUNK_CHARS: usize = 20_000;
pub const MAX_FLASHCARDS: usize = 100;
pub const TEMPERATURE: f32 = 0.7;
pub const RESPONSE_MAX_TOKENS: u32 = 4000;
pub const PRESENCE_PENALTY: f32 = 0.5;
pub const FREQUENCY_PENALTY: f32 = 0.3;
pub const SUMMARY_TEMPERATURE: f32 = 0.5;
pub const SUMMARY_MAX_CHARS: usize = 48_000;

// output defaults
pub const OUTPUT_SUFFIX: &str = "_test.json";
pub const PREVIEW_COUNT: usize = 2;

/// Name of the JSON schema sent with structured requests.
pub const FLASHCARD_SCHEMA_NAME: &str = "flashcard_set";

pub const FLASHCARD_SYSTEM_PROMPT: &str = r#"You are an expert teacher who writes multiple-choice test questions.
For the text fragment you receive, write questions that follow EXACTLY this JSON format:
{
  "flashcards": [
    {
      "front": "A clear and specific question",
      "back": "The correct answer",
      "wrongOptions": [
        "First plausible but incorrect option",
        "Second plausible but incorrect option"
      ]
    }
  ]
}

IMPORTANT RULES:
1. Cover every important concept, fact and definition in the fragment, exhaustively.
2. Each question must be clear and specific.
3. The correct answer must be unambiguous.
4. Wrong options must be plausible but clearly incorrect.
5. ALWAYS include exactly TWO wrong options.
6. Questions must test understanding, not just memorization.
7. Write the questions in the same language as the fragment.
8. Reply with the JSON only, without any commentary."#;

pub const SUMMARY_SYSTEM_PROMPT: &str = "You are an expert at summarizing texts. Write a concise but complete \
summary of the following text, capturing its most important points. Write it in the same language as the text.";

lazy_static! {
    // logging and directory constants
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        std::env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        std::env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref GIT_COMMIT_HASH: String =
        std::env::var(format!("{}_GIT_INFO", PROJECT_NAME.clone()))
            .unwrap_or_else(|_| String::from("Unknown"));
    pub static ref LOG_ENV: String = format!("{}_LOG_LEVEL", PROJECT_NAME.clone());
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME").to_lowercase());
    pub static ref CONFIG_FILE: String = String::from("config.toml");
}
