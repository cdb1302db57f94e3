//! Minimal OpenAI-compatible client used as the hint advisor.
//!
//! We only call chat.completions and request plain text. Calls are instrumented and
//! log model name, latency and token usage (not contents).
//!
//! NOTE: We never log the API key.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use crate::config::Prompts;
use crate::domain::{Quest, Question};
use crate::util::fill_template;

#[derive(Debug, Error)]
pub enum AdvisorError {
  #[error("hint advisor disabled")]
  Disabled,
  #[error("hint advisor timed out after {0:?}")]
  Timeout(Duration),
  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("OpenAI HTTP {status}: {message}")]
  Http { status: u16, message: String },
  #[error("reply had neither an English nor an Odia hint")]
  Unparseable,
}

/// Hint text as returned by the model; either side may be missing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BilingualHint {
  pub english: Option<String>,
  pub odia: Option<String>,
}

/// Anything that can turn a quest question into a bilingual hint.
#[async_trait]
pub trait HintAdvisor: Send + Sync {
  async fn bilingual_hint(&self, prompts: &Prompts, quest: &Quest, question: &Question) -> Result<BilingualHint, AdvisorError>;
}

/// Pick the `English:` and `Odia:` lines out of a model reply.
pub fn parse_bilingual_hint(reply: &str) -> Result<BilingualHint, AdvisorError> {
  let mut hint = BilingualHint::default();
  for line in reply.lines().map(str::trim) {
    let line = line.trim_start_matches(['*', '-', ' ']);
    if let Some(rest) = line.strip_prefix("English:") {
      let rest = rest.trim().trim_matches('*').trim();
      if !rest.is_empty() { hint.english = Some(rest.to_string()); }
    } else if let Some(rest) = line.strip_prefix("Odia:") {
      let rest = rest.trim().trim_matches('*').trim();
      if !rest.is_empty() { hint.odia = Some(rest.to_string()); }
    }
  }
  if hint.english.is_none() && hint.odia.is_none() {
    return Err(AdvisorError::Unparseable);
  }
  Ok(hint)
}

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
  pub temperature: f32,
}

impl OpenAI {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env(request_timeout: Duration, temperature: f32) -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty())?;
    let base_url =
      std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let model =
      std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".into());

    let client = reqwest::Client::builder()
      .timeout(request_timeout)
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, model, temperature })
  }

  /// Plain-text chat completion.
  #[instrument(level = "info", skip(self, system, user), fields(model = %self.model))]
  async fn chat_plain(&self, system: &str, user: &str) -> Result<String, AdvisorError> {
    let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
    let req = ChatCompletionRequest {
      model: self.model.clone(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature: self.temperature,
      max_tokens: Some(200),
    };

    let start = std::time::Instant::now();
    let res = self.client.post(&url)
      .header(USER_AGENT, "eduquest-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await?;

    if !res.status().is_success() {
      let status = res.status().as_u16();
      let body = res.text().await.unwrap_or_default();
      let message = extract_openai_error(&body).unwrap_or(body);
      return Err(AdvisorError::Http { status, message });
    }

    let body: ChatCompletionResponse = res.json().await?;
    if let Some(usage) = &body.usage {
      info!(elapsed = ?start.elapsed(), prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    let text = body.choices.first()
      .and_then(|c| c.message.content.clone())
      .unwrap_or_default().trim().to_string();

    Ok(text)
  }
}

#[async_trait]
impl HintAdvisor for OpenAI {
  #[instrument(level = "info", skip_all, fields(quest_id = %quest.id, question_id = %question.id))]
  async fn bilingual_hint(&self, prompts: &Prompts, quest: &Quest, question: &Question) -> Result<BilingualHint, AdvisorError> {
    let options = question.options.join(", ");
    let vars = [
      ("story_context", quest.story_context.as_str()),
      ("question", question.question.as_str()),
      ("options", options.as_str()),
    ];
    let system = fill_template(&prompts.hint_system, &vars);
    let user = fill_template(&prompts.hint_user_template, &vars);
    let reply = self.chat_plain(&system, &user).await?;
    parse_bilingual_hint(&reply)
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  max_tokens: Option<u32>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}
