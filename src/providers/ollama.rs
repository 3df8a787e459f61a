use std::time::Duration;
use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Ollama client for interacting with Ollama API
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
    /// Optional rate limit in requests per minute
    rate_limit: Option<u32>,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Generation options for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation (default: 0.8)
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    pub model: String,
    /// Creation timestamp
    pub created_at: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    pub done: bool,
    /// Number of prompt tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
    /// Number of generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
}

/// Builder methods for GenerationRequest
impl GenerationRequest {
    /// Create a new generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            stream: Some(false),
        }
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        if let Some(options) = &mut self.options {
            options.temperature = Some(temperature);
        } else {
            self.options = Some(GenerationOptions {
                temperature: Some(temperature),
                num_predict: None,
            });
        }
        self
    }
}

impl Ollama {
    /// Create a new Ollama client with retry and rate limit configuration
    pub fn new_with_config(
        host: impl Into<String>,
        port: u16,
        max_retries: u32,
        backoff_base_ms: u64,
        rate_limit: Option<u32>,
    ) -> Self {
        let host = host.into();

        // Construct a proper URL with scheme and port
        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            if host.rsplit(':').next().is_some_and(|p| p.parse::<u16>().is_ok()) {
                host
            } else {
                format!("{}:{}", host, port)
            }
        } else {
            format!("http://{}:{}", host, port)
        };

        Self {
            base_url,
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                // Ollama serves HTTP/1.1
                .http1_only()
                .build()
                .unwrap_or_default(),
            max_retries,
            backoff_base_ms,
            rate_limit,
        }
    }

    /// Get the Ollama API version
    pub async fn version(&self) -> Result<String, ProviderError> {
        let url = format!("{}/api/version", self.base_url);

        let response: serde_json::Value = self.client.get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to connect to Ollama: {}", e)))?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Ollama version response: {}", e)))?;

        let version = response["version"].as_str()
            .ok_or_else(|| ProviderError::ParseError("Invalid version format in response".to_string()))?
            .to_string();

        Ok(version)
    }
}

#[async_trait]
impl Provider for Ollama {
    type Request = GenerationRequest;
    type Response = GenerationResponse;

    /// Generate text from the Ollama API with retry logic.
    ///
    /// Server errors and transport failures retry with exponential
    /// backoff; client errors fail immediately. Requests always set
    /// `stream: false`, so the response is a single JSON object.
    async fn complete(&self, request: GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);

        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            // Add rate limiting if configured
            if let Some(rate_limit) = self.rate_limit {
                let delay_ms = 60_000 / rate_limit as u64;
                if attempt > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }

            let response_result = self.client.post(&url)
                .json(&request)
                .send()
                .await;

            match response_result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.json::<GenerationResponse>().await
                            .map_err(|e| ProviderError::ParseError(e.to_string()));
                    }

                    let error_text = response.text().await
                        .unwrap_or_else(|_| "Failed to get error response text".to_string());

                    if status.is_server_error() {
                        // Server error - can retry
                        error!("Ollama API error ({}): {} - attempt {}/{}", status, error_text, attempt + 1, self.max_retries + 1);
                        last_error = Some(ProviderError::ApiError {
                            status_code: status.as_u16(),
                            message: error_text,
                        });
                    } else {
                        // Client error - don't retry
                        error!("Ollama API error ({}): {}", status, error_text);
                        return Err(ProviderError::ApiError {
                            status_code: status.as_u16(),
                            message: error_text,
                        });
                    }
                },
                Err(e) => {
                    // Network error - can retry
                    error!("Ollama API network error: {} - attempt {}/{}", e, attempt + 1, self.max_retries + 1);
                    last_error = Some(ProviderError::ConnectionError(e.to_string()));
                }
            }

            attempt += 1;

            // If we have more retries left, wait with exponential backoff
            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        // If we get here, all retries failed
        Err(last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed(format!("Ollama API request failed after {} attempts", self.max_retries + 1))
        }))
    }

    /// Extract text from an Ollama response
    fn extract_text(response: &GenerationResponse) -> String {
        response.response.clone()
    }
}
