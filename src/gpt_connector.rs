use async_openai::{
  config::OpenAIConfig,
  types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs, ResponseFormat, ResponseFormatJsonSchema,
  },
  Client,
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::{
  config::OpenAISettings,
  consts::FLASHCARD_SCHEMA_NAME,
  errors::GPTConnectorError,
};

/// One chat completion: a system instruction, a user message and sampling parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
  pub system: String,
  pub user: String,
  /// Constrain the reply to the flashcard JSON schema.
  pub structured: bool,
  pub temperature: f32,
  pub max_tokens: Option<u32>,
  pub presence_penalty: Option<f32>,
  pub frequency_penalty: Option<f32>,
}

/// Something that answers completion requests with the model's text.
#[async_trait]
pub trait FlashcardBackend: Sync {
  async fn complete(&self, request: &CompletionRequest) -> Result<String, GPTConnectorError>;
}

/// Schema of a structured flashcard reply. The root must be an object, so the
/// list is wrapped in a `flashcards` field.
pub fn flashcard_schema() -> Value {
  json!({
    "type": "object",
    "properties": {
      "flashcards": {
        "type": "array",
        "items": {
          "type": "object",
          "properties": {
            "front": { "type": "string", "description": "A clear and specific question" },
            "back": { "type": "string", "description": "The correct answer" },
            "wrongOptions": {
              "type": "array",
              "description": "Exactly two plausible but incorrect answers",
              "items": { "type": "string" }
            }
          },
          "required": ["front", "back", "wrongOptions"],
          "additionalProperties": false
        }
      }
    },
    "required": ["flashcards"],
    "additionalProperties": false
  })
}

#[derive(Clone)]
pub struct GPTConnector {
  pub model: String,
  pub client: Client<OpenAIConfig>,
}

impl GPTConnector {
  pub fn new(settings: &OpenAISettings, api_key: String) -> GPTConnector {
    let openai_config = OpenAIConfig::new().with_api_key(api_key).with_api_base(settings.api_base.clone());
    let backoff = ExponentialBackoffBuilder::new()
      .with_max_elapsed_time(Some(Duration::from_secs(settings.backoff_max_elapsed_secs)))
      .build();
    let client = Client::with_config(openai_config).with_backoff(backoff);
    GPTConnector { model: settings.model.clone(), client }
  }

  pub fn construct_request(&self, request: &CompletionRequest) -> Result<CreateChatCompletionRequest, GPTConnectorError> {
    let messages: Vec<ChatCompletionRequestMessage> = vec![
      ChatCompletionRequestSystemMessageArgs::default().content(request.system.as_str()).build()?.into(),
      ChatCompletionRequestUserMessageArgs::default().content(request.user.as_str()).build()?.into(),
    ];

    let mut args = CreateChatCompletionRequestArgs::default();
    args.model(self.model.as_str()).messages(messages).temperature(request.temperature);
    if let Some(max_tokens) = request.max_tokens {
      args.max_tokens(max_tokens);
    }
    if let Some(presence_penalty) = request.presence_penalty {
      args.presence_penalty(presence_penalty);
    }
    if let Some(frequency_penalty) = request.frequency_penalty {
      args.frequency_penalty(frequency_penalty);
    }
    if request.structured {
      args.response_format(ResponseFormat::JsonSchema {
        json_schema: ResponseFormatJsonSchema {
          description: Some("Multiple-choice flashcards covering the given text".to_string()),
          name: FLASHCARD_SCHEMA_NAME.to_string(),
          schema: Some(flashcard_schema()),
          strict: Some(true),
        },
      });
    }
    Ok(args.build()?)
  }
}

#[async_trait]
impl FlashcardBackend for GPTConnector {
  async fn complete(&self, request: &CompletionRequest) -> Result<String, GPTConnectorError> {
    let request = self.construct_request(request)?;
    debug!(model = %request.model, "sending chat completion request");
    let response = self.client.chat().create(request).await?;
    if let Some(usage) = &response.usage {
      debug!(prompt_tokens = usage.prompt_tokens, completion_tokens = usage.completion_tokens, "token usage");
    }
    response
      .choices
      .into_iter()
      .next()
      .and_then(|choice| choice.message.content)
      .filter(|content| !content.trim().is_empty())
      .ok_or(GPTConnectorError::EmptyResponse)
  }
}
