/*!
 * Chunk translation against the configured provider.
 *
 * This module contains the TranslationClient, which sends one chunk's
 * text to the configured completion endpoint with a fixed translation
 * instruction and returns the translated text or a typed failure. No
 * failure kind escapes this boundary as a panic; the orchestrator
 * decides skip-vs-abort.
 */

use async_trait::async_trait;
use log::debug;
use url::Url;

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::{AppError, ProviderError, TranslationError};
use crate::providers::ollama::{GenerationRequest, Ollama};
use crate::providers::openai::{OpenAI, OpenAIRequest};
use crate::providers::Provider;

/// Parse an endpoint string into host and port
fn parse_endpoint(endpoint: &str) -> Result<(String, u16), AppError> {
    if endpoint.is_empty() {
        return Err(AppError::Config("Endpoint cannot be empty".to_string()));
    }

    let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Url::parse(endpoint)
    } else {
        Url::parse(&format!("http://{}", endpoint))
    }
    .map_err(|e| AppError::Config(format!("Invalid endpoint '{}': {}", endpoint, e)))?;

    let host = url.host_str()
        .ok_or_else(|| AppError::Config(format!("Invalid host in endpoint: {}", endpoint)))?
        .to_string();

    let port = url.port().unwrap_or(if url.scheme() == "https" { 443 } else { 80 });

    Ok((host, port))
}

/// Translation provider implementation variants
enum TranslationProviderImpl {
    /// OpenAI-compatible API service
    OpenAI {
        /// Client instance
        client: OpenAI,
    },

    /// Ollama LLM service
    Ollama {
        /// Client instance
        client: Ollama,
    },
}

/// Anything that can translate one chunk of text.
///
/// The orchestrator's chunk loop runs against this trait so it can be
/// exercised in tests without network access.
#[async_trait]
pub trait TranslationEngine: Send + Sync {
    /// Translate one chunk's text, returning the translation or a typed
    /// failure
    async fn translate(&self, text: &str) -> Result<String, TranslationError>;
}

/// Translation client for sending chunks to the configured endpoint
pub struct TranslationClient {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation client
    pub config: TranslationConfig,
}

impl TranslationClient {
    /// Create a new translation client with the given configuration
    pub fn new(config: TranslationConfig) -> Result<Self, AppError> {
        let retry_count = config.common.retry_count;
        let retry_backoff_ms = config.common.retry_backoff_ms;
        let rate_limit = config.get_rate_limit();

        let provider = match config.provider {
            ConfigTranslationProvider::OpenAI => {
                TranslationProviderImpl::OpenAI {
                    client: OpenAI::new_with_config(
                        config.get_api_key(),
                        config.get_endpoint(),
                        retry_count,
                        retry_backoff_ms,
                        rate_limit,
                    ),
                }
            },
            ConfigTranslationProvider::Ollama => {
                let (host, port) = parse_endpoint(&config.get_endpoint())?;

                TranslationProviderImpl::Ollama {
                    client: Ollama::new_with_config(host, port, retry_count, retry_backoff_ms, rate_limit),
                }
            },
        };

        Ok(Self { provider, config })
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        match &self.provider {
            TranslationProviderImpl::OpenAI { client } => {
                client.test_connection(&self.config.get_model()).await
            },
            TranslationProviderImpl::Ollama { client } => {
                client.version().await.map(|_version| ())
            },
        }
    }
}

#[async_trait]
impl TranslationEngine for TranslationClient {
    /// Translate one chunk with the fixed translation instruction at the
    /// configured temperature.
    async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        let system_prompt = &self.config.common.system_prompt;
        let user_prompt = format!("Translate this text from Arabic to English:\n\n{}", text);

        let translated = match &self.provider {
            TranslationProviderImpl::OpenAI { client } => {
                let request = OpenAIRequest::new(self.config.get_model())
                    .add_message("system", system_prompt)
                    .add_message("user", &user_prompt)
                    .temperature(self.config.common.temperature);

                let response = client.complete(request).await?;

                if let Some(usage) = &response.usage {
                    debug!("OpenAI token usage: {} prompt + {} completion = {} total",
                           usage.prompt_tokens, usage.completion_tokens, usage.total_tokens);
                }

                OpenAI::extract_text(&response)
            },
            TranslationProviderImpl::Ollama { client } => {
                let request = GenerationRequest::new(self.config.get_model(), &user_prompt)
                    .system(system_prompt)
                    .temperature(self.config.common.temperature);

                let response = client.complete(request).await?;
                Ollama::extract_text(&response)
            },
        };

        let translated = translated.trim();
        if translated.is_empty() {
            return Err(TranslationError::EmptyResponse);
        }

        Ok(translated.to_string())
    }
}
