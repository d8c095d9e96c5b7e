//! LLM-provider backend: answer prompts directly through `edgequake-llm`
//! instead of going through the relay.
//!
//! Each prompt becomes one user message. Provider errors are rendered with
//! the same `"Error:"` sentinel the relay uses, so the generator loop cannot
//! tell the two backends apart.

use crate::config::PipelineConfig;
use crate::error::S2vError;
use crate::pipeline::generate::TextGenerator;
use crate::prompts::ERROR_SENTINEL;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::sync::Arc;
use tracing::{debug, warn};

/// Default model when a provider is named without one.
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

/// [`TextGenerator`] backed by an [`LLMProvider`].
pub struct ProviderGenerator {
    provider: Arc<dyn LLMProvider>,
    options: CompletionOptions,
}

impl ProviderGenerator {
    pub fn new(provider: Arc<dyn LLMProvider>, config: &PipelineConfig) -> Self {
        Self {
            provider,
            options: build_options(config),
        }
    }

    /// Build the provider named in `config` (or auto-detect one from the
    /// environment when no name is set).
    pub fn from_config(config: &PipelineConfig) -> Result<Self, S2vError> {
        let provider = match config.provider_name {
            Some(ref name) => {
                let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
                ProviderFactory::create_llm_provider(name, model).map_err(|e| {
                    S2vError::ProviderNotConfigured {
                        provider: name.clone(),
                        hint: format!("{e}"),
                    }
                })?
            }
            None => {
                let (llm, _embedding) =
                    ProviderFactory::from_env().map_err(|e| S2vError::ProviderNotConfigured {
                        provider: "auto".to_string(),
                        hint: format!(
                            "No LLM provider could be auto-detected from environment.\n\
                            Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or pass --relay-url.\n\
                            Error: {e}"
                        ),
                    })?;
                llm
            }
        };
        Ok(Self::new(provider, config))
    }
}

#[async_trait]
impl TextGenerator for ProviderGenerator {
    async fn generate(&self, prompt: &str) -> String {
        let messages = vec![ChatMessage::user(prompt)];
        match self.provider.chat(&messages, Some(&self.options)).await {
            Ok(response) => {
                debug!(
                    "{} input tokens, {} output tokens",
                    response.prompt_tokens, response.completion_tokens
                );
                response.content
            }
            Err(e) => {
                warn!("Provider call failed: {}", e);
                format!("{ERROR_SENTINEL} LLM provider call failed. Reason: {e}")
            }
        }
    }
}

fn build_options(config: &PipelineConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_options_defaults() {
        let config = PipelineConfig::default();
        let opts = build_options(&config);
        assert_eq!(opts.temperature, Some(0.7));
        assert_eq!(opts.max_tokens, Some(4096));
    }

    #[test]
    fn build_options_follow_config() {
        let config = PipelineConfig::builder()
            .temperature(0.2)
            .max_tokens(1024)
            .build()
            .unwrap();
        let opts = build_options(&config);
        assert_eq!(opts.temperature, Some(0.2));
        assert_eq!(opts.max_tokens, Some(1024));
    }
}
