//! LLM — multi-provider adapter for the suggestion service.
//!
//! DESIGN
//! ======
//! Configured from environment variables. The `LlmClient` dispatches to
//! Anthropic or an `OpenAI`-compatible endpoint based on `LLM_PROVIDER`.
//! Handlers only see the [`LlmChat`] trait, so tests swap in a mock.

pub mod anthropic;
pub mod config;
pub mod openai;
pub mod types;

use config::{LlmConfig, LlmProviderKind};
pub use types::LlmChat;
use types::{ChatRequest, ChatResponse, LlmError};

// =============================================================================
// CLIENT DISPATCH
// =============================================================================

/// Concrete LLM client that dispatches to either Anthropic or `OpenAI`.
pub struct LlmClient {
    inner: LlmProvider,
    model: String,
}

enum LlmProvider {
    Anthropic(anthropic::AnthropicClient),
    OpenAi(openai::OpenAiClient),
}

impl LlmClient {
    /// Build an LLM client from environment variables. See [`LlmConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client fails.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_config(LlmConfig::from_env()?)
    }

    /// Build an LLM client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let inner = match config.provider {
            LlmProviderKind::Anthropic => {
                LlmProvider::Anthropic(anthropic::AnthropicClient::new(config.api_key, config.timeouts)?)
            }
            LlmProviderKind::OpenAi => LlmProvider::OpenAi(openai::OpenAiClient::new(
                config.api_key,
                config.openai_base_url,
                config.timeouts,
            )?),
        };
        Ok(Self { inner, model: config.model })
    }

    /// Return the configured model name (e.g. `"claude-sonnet-4-5-20250929"`).
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl LlmChat for LlmClient {
    async fn chat(&self, request: ChatRequest<'_>) -> Result<ChatResponse, LlmError> {
        match &self.inner {
            LlmProvider::Anthropic(c) => c.chat(&self.model, request).await,
            LlmProvider::OpenAi(c) => c.chat(&self.model, request).await,
        }
    }
}
