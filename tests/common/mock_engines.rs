/*!
 * Mock translation engines for testing
 *
 * This module provides mock implementations of the TranslationEngine
 * trait to exercise the orchestrator's chunk loop without external API
 * calls, including injected failures on selected chunks.
 */

use async_trait::async_trait;
use std::sync::Mutex;

use kitabai::errors::{ProviderError, TranslationError};
use kitabai::translation_client::TranslationEngine;

/// Mock engine that records requests and fails on configured call indices
pub struct MockTranslationEngine {
    /// 0-based call indices that should fail
    fail_on: Vec<usize>,
    /// Number of translate calls made so far
    calls: Mutex<usize>,
    /// Texts received, in call order
    requests: Mutex<Vec<String>>,
}

impl MockTranslationEngine {
    /// Create a mock engine that succeeds on every call
    pub fn new() -> Self {
        Self::failing_on(Vec::new())
    }

    /// Create a mock engine that fails on the given call indices
    pub fn failing_on(fail_on: Vec<usize>) -> Self {
        MockTranslationEngine {
            fail_on,
            calls: Mutex::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of translate calls made
    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    /// Texts received, in call order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// The deterministic translation the mock produces for a text
    pub fn translation_of(text: &str) -> String {
        format!("EN[{}]", text)
    }
}

#[async_trait]
impl TranslationEngine for MockTranslationEngine {
    async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            let index = *calls;
            *calls += 1;
            index
        };

        self.requests.lock().unwrap().push(text.to_string());

        if self.fail_on.contains(&index) {
            return Err(TranslationError::Provider(ProviderError::ApiError {
                status_code: 500,
                message: "mock failure".to_string(),
            }));
        }

        Ok(Self::translation_of(text))
    }
}
