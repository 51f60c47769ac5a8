//! LLM — text-generation client for the cleaning and insight calls.
//!
//! DESIGN
//! ======
//! `LlmClient` wraps an OpenAI-compatible chat-completions client behind
//! the [`TextGen`] trait so services can be tested against a mock. Both
//! outbound calls are stateless and independent: the cleaning call pins
//! temperature to 0 with a JSON output constraint; the insight call runs
//! at moderate temperature with plain text back.

pub mod config;
pub mod openai;
pub mod types;

use config::LlmConfig;
pub use types::TextGen;
use types::{Completion, GenerationRequest, LlmError};

/// Concrete text-generation client configured from the environment.
pub struct LlmClient {
    inner: openai::OpenAiClient,
    model: String,
}

impl LlmClient {
    /// Build a client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client
    /// fails to build.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_config(LlmConfig::from_env()?)
    }

    /// Build a client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let inner = openai::OpenAiClient::new(config.api_key, config.base_url, config.timeouts)?;
        Ok(Self { inner, model: config.model })
    }

    /// Return the configured model name (e.g. `"gpt-4o-mini"`).
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl TextGen for LlmClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<Completion, LlmError> {
        self.inner.generate(&self.model, request).await
    }
}
