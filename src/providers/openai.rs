use std::time::Duration;
use async_trait::async_trait;
use log::error;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::Provider;

/// OpenAI client for interacting with OpenAI-compatible chat APIs
#[derive(Debug)]
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (optional, defaults to public API)
    endpoint: String,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
    /// Optional rate limit in requests per minute
    rate_limit: Option<u32>,
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
pub struct OpenAIRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<OpenAIMessage>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// OpenAI message format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// One completion choice in an OpenAI response
#[derive(Debug, Deserialize)]
pub struct OpenAIChoice {
    /// The generated message
    pub message: OpenAIMessage,
}

/// Token usage information
#[derive(Debug, Deserialize)]
pub struct TokenUsage {
    /// Number of prompt tokens
    pub prompt_tokens: u32,
    /// Number of completion tokens
    pub completion_tokens: u32,
    /// Total number of tokens
    pub total_tokens: u32,
}

/// OpenAI chat completion response
#[derive(Debug, Deserialize)]
pub struct OpenAIResponse {
    /// The completion choices
    pub choices: Vec<OpenAIChoice>,
    /// Token usage information, when the API reports it
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

impl OpenAIRequest {
    /// Create a new chat completion request
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(OpenAIMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum number of tokens to generate
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

impl OpenAI {
    /// Create a new OpenAI client with retry and rate limit configuration
    pub fn new_with_config(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        max_retries: u32,
        backoff_base_ms: u64,
        rate_limit: Option<u32>,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            max_retries,
            backoff_base_ms,
            rate_limit,
        }
    }

    /// The chat completions URL for the configured endpoint
    fn completions_url(&self) -> String {
        if self.endpoint.is_empty() {
            "https://api.openai.com/v1/chat/completions".to_string()
        } else {
            format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
        }
    }

    /// Test the connection to the OpenAI API
    pub async fn test_connection(&self, model: &str) -> Result<(), ProviderError> {
        let request = OpenAIRequest::new(model)
            .add_message("user", "Hello")
            .max_tokens(10);

        Provider::complete(self, request).await?;
        Ok(())
    }
}

#[async_trait]
impl Provider for OpenAI {
    type Request = OpenAIRequest;
    type Response = OpenAIResponse;

    /// Complete a chat request with retry logic.
    ///
    /// Server errors, rate-limit responses and transport failures retry
    /// with exponential backoff; authentication and other client errors
    /// fail immediately.
    async fn complete(&self, request: OpenAIRequest) -> Result<OpenAIResponse, ProviderError> {
        let api_url = self.completions_url();

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

            let response_result = self.client.post(&api_url)
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
                .json(&request)
                .send()
                .await;

            match response_result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.json::<OpenAIResponse>().await
                            .map_err(|e| ProviderError::ParseError(e.to_string()));
                    }

                    let error_text = response.text().await
                        .unwrap_or_else(|_| "Failed to get error response text".to_string());

                    match status.as_u16() {
                        401 | 403 => {
                            error!("OpenAI API authentication error ({}): {}", status, error_text);
                            return Err(ProviderError::AuthenticationError(error_text));
                        },
                        429 => {
                            // Rate limited - can retry after backoff
                            error!("OpenAI API rate limited ({}): {} - attempt {}/{}", status, error_text, attempt + 1, self.max_retries + 1);
                            last_error = Some(ProviderError::RateLimitExceeded(error_text));
                        },
                        code if status.is_server_error() => {
                            // Server error - can retry
                            error!("OpenAI API error ({}): {} - attempt {}/{}", status, error_text, attempt + 1, self.max_retries + 1);
                            last_error = Some(ProviderError::ApiError { status_code: code, message: error_text });
                        },
                        code => {
                            // Client error - don't retry
                            error!("OpenAI API error ({}): {}", status, error_text);
                            return Err(ProviderError::ApiError { status_code: code, message: error_text });
                        }
                    }
                },
                Err(e) => {
                    // Network error - can retry
                    error!("OpenAI API network error: {} - attempt {}/{}", e, attempt + 1, self.max_retries + 1);
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
            ProviderError::RequestFailed(format!("OpenAI API request failed after {} attempts", self.max_retries + 1))
        }))
    }

    /// Extract text from an OpenAI response
    fn extract_text(response: &OpenAIResponse) -> String {
        response.choices.first()
            .map(|choice| choice.message.content.clone())
            .unwrap_or_default()
    }
}
