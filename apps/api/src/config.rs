use anyhow::{Context, Result};

use crate::provider::ProviderKind;

// ---------------------------
// Chunking
// ---------------------------
pub const DEFAULT_CHUNK_SIZE: usize = 4000; // characters
pub const DEFAULT_CHUNK_OVERLAP: usize = 300;
pub const MIN_CHUNK_SIZE: usize = 1000;
pub const MAX_CHUNK_SIZE: usize = 15000;
pub const MAX_CHUNK_OVERLAP: usize = 1000;

// ---------------------------
// Upload & text limits
// ---------------------------
pub const MAX_FILE_SIZE_BYTES: usize = 10 * 1024 * 1024;
pub const MAX_FILES_PER_BATCH: usize = 10;
pub const MIN_RESUME_TEXT_LENGTH: usize = 100;
pub const MAX_RESUME_TEXT_LENGTH: usize = 100_000;
pub const MAX_TARGET_ROLE_LENGTH: usize = 100;
pub const ALLOWED_FILE_TYPES: [&str; 2] = ["pdf", "txt"];

/// Application configuration loaded from environment variables.
/// Startup fails if the selected provider's API key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderKind,
    /// Overrides the provider's default model when set.
    pub model: Option<String>,
    pub openai_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let provider_name =
            std::env::var("AI_PROVIDER").unwrap_or_else(|_| "openai".to_string());
        let provider = ProviderKind::parse(&provider_name).with_context(|| {
            format!("AI_PROVIDER '{provider_name}' is not supported (expected 'openai' or 'groq')")
        })?;

        Ok(Config {
            provider,
            model: optional_env("MODEL"),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            groq_api_key: optional_env("GROQ_API_KEY"),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://data/analyses.db?mode=rwc".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
