//! OpenAI chat-completions backend.

use async_trait::async_trait;
use reqwest::Client;

use super::{build_http_client, chat_completion, CritiqueProvider, ProviderError};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

pub struct OpenAiProvider {
    http: Client,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: build_http_client(),
            api_key,
            model,
        }
    }
}

#[async_trait]
impl CritiqueProvider for OpenAiProvider {
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
    ) -> Result<String, ProviderError> {
        chat_completion(
            &self.http,
            OPENAI_API_URL,
            &self.api_key,
            &self.model,
            prompt,
            system_instruction,
        )
        .await
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
