//! Minimal OpenAI client for our use-cases.
//!
//! We only call chat.completions and request either plain text or a strict
//! JSON object. The raw response text is returned untouched together with
//! the provider's token accounting; all repair and validation of the content
//! happens downstream in the normalization pipeline.
//!
//! NOTE: We never log the API key and we keep payload truncations short to
//! avoid leaking source material into logs.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use crate::domain::TokenUsage;
use crate::util::trunc_for_log;

/// The one externally-caused failure surface of this crate. Everything else
/// (malformed JSON, garbled candidates) is absorbed by the pipeline.
#[derive(Debug, Error)]
pub enum GeneratorError {
  #[error("request to generator failed: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("generator returned HTTP {status}: {message}")]
  Api { status: u16, message: String },
}

/// Response text plus the provider's own token accounting, passed through
/// verbatim.
#[derive(Clone, Debug)]
pub struct ChatOutcome {
  pub text: String,
  pub usage: Option<TokenUsage>,
}

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub fast_model: String,
  pub strong_model: String,
}

impl OpenAI {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok()?;
    let base_url =
      std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let fast_model =
      std::env::var("OPENAI_FAST_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
    let strong_model =
      std::env::var("OPENAI_STRONG_MODEL").unwrap_or_else(|_| "gpt-4o".into());

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(120))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, fast_model, strong_model })
  }

  /// Plain-text chat completion. Used for summaries.
  #[instrument(level = "info", skip(self, system, user), fields(model = %model))]
  pub async fn chat_text(
    &self,
    model: &str,
    system: &str,
    user: &str,
    temperature: f32,
    max_tokens: Option<u32>,
  ) -> Result<ChatOutcome, GeneratorError> {
    self.chat(model, system, user, temperature, max_tokens, None).await
  }

  /// JSON-object chat completion. The returned text is still treated as
  /// untrusted; callers run it through the resilient decoder.
  #[instrument(level = "info", skip(self, system, user), fields(model = %model))]
  pub async fn chat_json(
    &self,
    model: &str,
    system: &str,
    user: &str,
    temperature: f32,
    max_tokens: Option<u32>,
  ) -> Result<ChatOutcome, GeneratorError> {
    let format = Some(ResponseFormat { r#type: "json_object".into() });
    self.chat(model, system, user, temperature, max_tokens, format).await
  }

  async fn chat(
    &self,
    model: &str,
    system: &str,
    user: &str,
    temperature: f32,
    max_tokens: Option<u32>,
    response_format: Option<ResponseFormat>,
  ) -> Result<ChatOutcome, GeneratorError> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: model.to_string(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature,
      response_format,
      max_tokens,
    };

    let res = self.client.post(&url)
      .header(USER_AGENT, "studygen-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req)
      .send()
      .await?;

    if !res.status().is_success() {
      let status = res.status().as_u16();
      let body = res.text().await.unwrap_or_default();
      let message = extract_api_error(&body).unwrap_or_else(|| trunc_for_log(&body, 300));
      return Err(GeneratorError::Api { status, message });
    }

    let body: ChatCompletionResponse = res.json().await?;
    if let Some(usage) = &body.usage {
      info!(
        target: "generator",
        prompt_tokens = ?usage.prompt_tokens,
        completion_tokens = ?usage.completion_tokens,
        total_tokens = usage.total_tokens,
        "generator usage"
      );
    }
    let text = body
      .choices
      .into_iter()
      .next()
      .and_then(|c| c.message.content)
      .unwrap_or_default();

    Ok(ChatOutcome { text, usage: body.usage })
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  response_format: Option<ResponseFormat>,
  #[serde(skip_serializing_if = "Option::is_none")]
  max_tokens: Option<u32>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }
#[derive(Serialize)]
struct ResponseFormat { #[serde(rename = "type")] r#type: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<TokenUsage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }

/// Try to extract a clean error message from an API error body.
fn extract_api_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn extracts_api_error_messages() {
    let body = r#"{"error": {"message": "model overloaded", "type": "server_error"}}"#;
    assert_eq!(extract_api_error(body), Some("model overloaded".into()));
    assert_eq!(extract_api_error("plain failure text"), None);
  }

  #[test]
  fn usage_deserializes_with_partial_fields() {
    let usage: TokenUsage = serde_json::from_str(r#"{"total_tokens": 120}"#).expect("usage");
    assert_eq!(usage.total_tokens, 120);
    assert_eq!(usage.prompt_tokens, None);
  }
}
