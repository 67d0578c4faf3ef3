//! Groq chat-completions backend (OpenAI-compatible API).

use async_trait::async_trait;
use reqwest::Client;

use super::{build_http_client, chat_completion, CritiqueProvider, ProviderError};

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

pub struct GroqProvider {
    http: Client,
    api_key: String,
    model: String,
}

impl GroqProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: build_http_client(),
            api_key,
            model,
        }
    }
}

#[async_trait]
impl CritiqueProvider for GroqProvider {
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
    ) -> Result<String, ProviderError> {
        chat_completion(
            &self.http,
            GROQ_API_URL,
            &self.api_key,
            &self.model,
            prompt,
            system_instruction,
        )
        .await
    }

    fn name(&self) -> &'static str {
        "groq"
    }
}
