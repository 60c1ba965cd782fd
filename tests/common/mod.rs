#![allow(dead_code)]

use async_trait::async_trait;
use lopdf::{
  content::{Content, Operation},
  dictionary, Document, Object, Stream,
};
use std::{collections::VecDeque, path::Path, sync::Mutex};

use flashgen::{
  errors::GPTConnectorError,
  gpt_connector::{CompletionRequest, FlashcardBackend},
};

/// Writes a PDF with one page per entry. `None` produces a page without any
/// text operators, like a scanned image page.
pub fn write_pdf(path: &Path, pages: &[Option<&str>]) {
  let mut doc = Document::with_version("1.5");
  let pages_id = doc.new_object_id();
  let font_id = doc.add_object(dictionary! {
    "Type" => "Font",
    "Subtype" => "Type1",
    "BaseFont" => "Courier",
    "Encoding" => "WinAnsiEncoding",
  });
  let resources_id = doc.add_object(dictionary! {
    "Font" => dictionary! { "F1" => font_id },
  });

  let mut kids: Vec<Object> = Vec::new();
  for page in pages {
    let operations = match page {
      Some(text) => vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 12.into()]),
        Operation::new("Td", vec![72.into(), 720.into()]),
        Operation::new("Tj", vec![Object::string_literal(*text)]),
        Operation::new("ET", vec![]),
      ],
      None => vec![],
    };
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
      "Type" => "Page",
      "Parent" => pages_id,
      "Contents" => content_id,
      "Resources" => resources_id,
    });
    kids.push(page_id.into());
  }

  let count = kids.len() as i64;
  doc.objects.insert(
    pages_id,
    Object::Dictionary(dictionary! {
      "Type" => "Pages",
      "Kids" => kids,
      "Count" => count,
      "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    }),
  );
  let catalog_id = doc.add_object(dictionary! {
    "Type" => "Catalog",
    "Pages" => pages_id,
  });
  doc.trailer.set("Root", catalog_id);
  doc.save(path).unwrap();
}

/// Replies with a fixed script and records every request it receives.
pub struct ScriptedBackend {
  replies: Mutex<VecDeque<Result<String, GPTConnectorError>>>,
  fallback: Option<String>,
  pub requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedBackend {
  pub fn new(replies: Vec<Result<String, GPTConnectorError>>) -> Self {
    ScriptedBackend { replies: Mutex::new(replies.into()), fallback: None, requests: Mutex::new(Vec::new()) }
  }

  /// Answers every request with the same content.
  pub fn always(content: &str) -> Self {
    ScriptedBackend { replies: Mutex::new(VecDeque::new()), fallback: Some(content.to_string()), requests: Mutex::new(Vec::new()) }
  }

  pub fn calls(&self) -> usize {
    self.requests.lock().unwrap().len()
  }
}

#[async_trait]
impl FlashcardBackend for ScriptedBackend {
  async fn complete(&self, request: &CompletionRequest) -> Result<String, GPTConnectorError> {
    self.requests.lock().unwrap().push(request.clone());
    match self.replies.lock().unwrap().pop_front() {
      Some(reply) => reply,
      None => self.fallback.clone().ok_or(GPTConnectorError::EmptyResponse),
    }
  }
}

pub fn card_json(front: &str, back: &str) -> String {
  format!(r#"{{"front": "{}", "back": "{}", "wrongOptions": ["wrong one", "wrong two"]}}"#, front, back)
}
