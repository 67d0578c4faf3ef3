//! Provider capability — the single seam through which segment prompts reach
//! a model backend.
//!
//! ARCHITECTURAL RULE: no other module may call a model API directly. The
//! requester depends only on [`CritiqueProvider`]; any implementation of
//! that one operation (OpenAI, Groq, or a test double) satisfies it.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod groq;
pub mod openai;

pub use groq::GroqProvider;
pub use openai::OpenAiProvider;

const MAX_TOKENS: u32 = 2000;
const TEMPERATURE: f32 = 0.1;
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("provider returned an empty completion")]
    EmptyCompletion,
}

/// The injected model capability: one prompt in, one text response out.
///
/// Held in `AppState` as `Arc<dyn CritiqueProvider>`. Implementations must
/// be safe for concurrent use.
#[async_trait]
pub trait CritiqueProvider: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
    ) -> Result<String, ProviderError>;

    /// Short backend label for logs and responses.
    fn name(&self) -> &'static str;
}

/// Which backend to construct. Parsed from the `AI_PROVIDER` env var.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Groq,
}

impl ProviderKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Some(ProviderKind::OpenAi),
            "groq" => Some(ProviderKind::Groq),
            _ => None,
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "gpt-4o-mini",
            ProviderKind::Groq => "llama-3.3-70b-versatile",
        }
    }
}

/// Constructs the configured backend. A missing credential is a fatal
/// configuration error, surfaced here before any segment is processed.
pub fn build_provider(config: &Config) -> anyhow::Result<Arc<dyn CritiqueProvider>> {
    let model = config
        .model
        .clone()
        .unwrap_or_else(|| config.provider.default_model().to_string());

    match config.provider {
        ProviderKind::OpenAi => {
            let key = config
                .openai_api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY is required for the openai provider"))?;
            Ok(Arc::new(OpenAiProvider::new(key, model)))
        }
        ProviderKind::Groq => {
            let key = config
                .groq_api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("GROQ_API_KEY is required for the groq provider"))?;
            Ok(Arc::new(GroqProvider::new(key, model)))
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Shared chat-completions wire types (both backends are OpenAI-compatible)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

pub(crate) fn build_http_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .expect("failed to build HTTP client")
}

/// One chat-completions call with retry on 429/5xx, shared by both backends.
/// JSON response mode is always requested; the prompts still instruct the
/// model to emit pure JSON since the mode is not honored by every model.
async fn chat_completion(
    http: &Client,
    endpoint: &str,
    api_key: &str,
    model: &str,
    prompt: &str,
    system_instruction: Option<&str>,
) -> Result<String, ProviderError> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system_instruction {
        messages.push(ChatMessage {
            role: "system",
            content: system,
        });
    }
    messages.push(ChatMessage {
        role: "user",
        content: prompt,
    });

    let request_body = ChatRequest {
        model,
        messages,
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
        response_format: ResponseFormat {
            format_type: "json_object",
        },
    };

    let mut last_error: Option<ProviderError> = None;

    for attempt in 0..MAX_RETRIES {
        if attempt > 0 {
            // Exponential backoff: 1s, 2s, 4s
            let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
            warn!(
                "provider call attempt {} failed, retrying after {}ms",
                attempt,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }

        let response = http
            .post(endpoint)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                last_error = Some(ProviderError::Http(e));
                continue;
            }
        };

        let status = response.status();

        if status.as_u16() == 429 || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            warn!("provider API returned {}: {}", status, body);
            last_error = Some(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
            continue;
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatResponse = response.json().await?;
        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(ProviderError::EmptyCompletion)?;

        debug!("provider call succeeded ({} chars)", text.len());
        return Ok(text);
    }

    Err(last_error.unwrap_or(ProviderError::RateLimited {
        retries: MAX_RETRIES,
    }))
}
