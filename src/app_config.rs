use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    pub source_language: String,

    /// Target language code (ISO)
    pub target_language: String,

    /// Translation config
    pub translation: TranslationConfig,

    /// Chunking config
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: OpenAI-compatible API
    #[default]
    OpenAI,
    // @provider: Ollama
    Ollama,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Ollama => "Ollama",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::OpenAI => "openai".to_string(),
            Self::Ollama => "ollama".to_string(),
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Rate limit (requests per minute)
    #[serde(default)]
    pub rate_limit: Option<u32>,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::OpenAI => Self {
                provider_type: "openai".to_string(),
                model: default_openai_model(),
                api_key: String::new(),
                endpoint: default_openai_endpoint(),
                timeout_secs: default_timeout_secs(),
                rate_limit: default_openai_rate_limit(),
            },
            TranslationProvider::Ollama => Self {
                provider_type: "ollama".to_string(),
                model: default_ollama_model(),
                api_key: String::new(),
                endpoint: default_ollama_endpoint(),
                timeout_secs: default_timeout_secs(),
                rate_limit: default_ollama_rate_limit(),
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// System prompt sent with every translation request
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Fixed delay in seconds after every translation attempt,
    /// successful or not, to stay under provider rate limits
    #[serde(default = "default_request_delay_secs")]
    pub request_delay_secs: u64,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    /// Lower values bias the model toward literal, deterministic output
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            request_delay_secs: default_request_delay_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
        }
    }
}

/// Configuration for document segmentation
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChunkingConfig {
    /// Maximum token count for a single chunk's serialized text
    #[serde(default = "default_token_budget")]
    pub token_budget: usize,

    /// Tokenizer encoding override (e.g. "cl100k_base") for models the
    /// tokenizer does not recognize by name
    #[serde(default)]
    pub encoding: Option<String>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            token_budget: default_token_budget(),
            encoding: None,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_request_delay_secs() -> u64 {
    2 // Matches the delay the upstream endpoint tolerates without 429s
}

fn default_retry_count() -> u32 {
    3 // Default to 3 retries
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_temperature() -> f32 {
    0.3
}

fn default_token_budget() -> usize {
    2000 // Conservative limit for input tokens
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_ollama_model() -> String {
    "llama2".to_string()
}

fn default_system_prompt() -> String {
    "You are a professional translator specializing in Arabic to English translation. \
     Translate the following Arabic text to English, maintaining the original meaning and style. \
     If the text contains a page number, preserve it in the translation. \
     Focus on accuracy and clarity in the translation.".to_string()
}

fn default_openai_rate_limit() -> Option<u32> {
    Some(60) // 60 requests per minute by default
}

fn default_ollama_rate_limit() -> Option<u32> {
    None // No rate limit by default for local provider
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate API key for all providers except Ollama
        if self.translation.provider == TranslationProvider::OpenAI {
            let api_key = self.translation.get_api_key();
            if api_key.is_empty() {
                return Err(anyhow!("Translation API key is required for OpenAI provider"));
            }
        }

        if self.translation.get_model().is_empty() {
            return Err(anyhow!("A model name is required"));
        }

        if self.chunking.token_budget == 0 {
            return Err(anyhow!("Chunking token budget must be greater than zero"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "ar".to_string(),
            target_language: "en".to_string(),
            translation: TranslationConfig::default(),
            chunking: ChunkingConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        let provider_str = self.provider.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        // Default fallback based on provider type
        match self.provider {
            TranslationProvider::OpenAI => default_openai_model(),
            TranslationProvider::Ollama => default_ollama_model(),
        }
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.api_key.is_empty() {
                return provider_config.api_key.clone();
            }
        }

        // Default fallback - Ollama doesn't use API keys
        String::new()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        // Default fallback based on provider type
        match self.provider {
            TranslationProvider::OpenAI => default_openai_endpoint(),
            TranslationProvider::Ollama => default_ollama_endpoint(),
        }
    }

    /// Get the rate limit for the active provider
    pub fn get_rate_limit(&self) -> Option<u32> {
        if let Some(provider_config) = self.get_active_provider_config() {
            return provider_config.rate_limit;
        }

        // Default fallback based on provider type
        match self.provider {
            TranslationProvider::OpenAI => default_openai_rate_limit(),
            TranslationProvider::Ollama => default_ollama_rate_limit(),
        }
    }

    /// Set the API key on the active provider's entry, creating it if absent
    pub fn set_api_key(&mut self, api_key: &str) {
        let provider_str = self.provider.to_lowercase_string();
        if let Some(provider_config) = self.available_providers.iter_mut()
            .find(|p| p.provider_type == provider_str) {
            provider_config.api_key = api_key.to_string();
        } else {
            let mut provider_config = ProviderConfig::new(self.provider.clone());
            provider_config.api_key = api_key.to_string();
            self.available_providers.push(provider_config);
        }
    }

    /// Set the model on the active provider's entry, creating it if absent
    pub fn set_model(&mut self, model: &str) {
        let provider_str = self.provider.to_lowercase_string();
        if let Some(provider_config) = self.available_providers.iter_mut()
            .find(|p| p.provider_type == provider_str) {
            provider_config.model = model.to_string();
        } else {
            let mut provider_config = ProviderConfig::new(self.provider.clone());
            provider_config.model = model.to_string();
            self.available_providers.push(provider_config);
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        let mut config = Self {
            provider: TranslationProvider::default(),
            available_providers: Vec::new(),
            common: TranslationCommonConfig::default(),
        };

        // Add default providers
        config.available_providers.push(ProviderConfig::new(TranslationProvider::OpenAI));
        config.available_providers.push(ProviderConfig::new(TranslationProvider::Ollama));

        config
    }
}
