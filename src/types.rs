use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One multiple-choice question: a prompt, its correct answer and two distractors.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Flashcard {
  pub front: String,
  pub back: String,
  #[serde(rename = "wrongOptions")]
  pub wrong_options: Vec<String>,
}

/// Flashcards in the order their chunks were processed.
pub type FlashcardSet = Vec<Flashcard>;

impl Flashcard {
  pub const WRONG_OPTION_COUNT: usize = 2;

  pub fn new(front: impl Into<String>, back: impl Into<String>, wrong_options: [&str; 2]) -> Self {
    Flashcard {
      front: front.into(),
      back: back.into(),
      wrong_options: wrong_options.iter().map(|o| o.to_string()).collect(),
    }
  }

  /// Reads a flashcard out of an untrusted JSON value, field by field.
  /// Text is trimmed; `None` if any field is missing, not a string, or empty,
  /// or if there are not exactly two wrong options.
  pub fn from_value(value: &Value) -> Option<Flashcard> {
    let object = value.as_object()?;
    let text_field = |key: &str| non_empty(object.get(key)?);
    let front = text_field("front")?;
    let back = text_field("back")?;
    let wrong_options = object
      .get("wrongOptions")?
      .as_array()?
      .iter()
      .map(non_empty)
      .collect::<Option<Vec<String>>>()?;
    if wrong_options.len() != Self::WRONG_OPTION_COUNT {
      return None;
    }
    Some(Flashcard { front, back, wrong_options })
  }

  pub fn is_valid(&self) -> bool {
    !self.front.trim().is_empty()
      && !self.back.trim().is_empty()
      && self.wrong_options.len() == Self::WRONG_OPTION_COUNT
      && self.wrong_options.iter().all(|o| !o.trim().is_empty())
  }
}

fn non_empty(value: &Value) -> Option<String> {
  let text = value.as_str()?.trim();
  (!text.is_empty()).then(|| text.to_string())
}

/// A bounded run of source words submitted as a single generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
  pub index: usize,
  pub text: String,
  /// Index of the first word of this chunk in the source word sequence.
  pub word_start: usize,
  /// One past the last word of this chunk.
  pub word_end: usize,
  /// Leading words shared with the previous chunk.
  pub overlap_words: usize,
}

impl TextChunk {
  pub fn word_count(&self) -> usize {
    self.word_end - self.word_start
  }

  /// The words this chunk adds beyond its overlap with the previous chunk.
  pub fn fresh_words(&self) -> impl Iterator<Item = &str> {
    self.text.split_whitespace().skip(self.overlap_words)
  }
}
