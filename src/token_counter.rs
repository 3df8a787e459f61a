/*!
 * Token counting for chunk budget accounting.
 *
 * Wraps a tiktoken BPE so chunk sizes are measured in the same units the
 * model endpoint bills and limits by. Resolution happens once at
 * construction; counting itself cannot fail.
 */

use std::fmt;

use tiktoken_rs::{cl100k_base, get_bpe_from_model, o200k_base, p50k_base, r50k_base, CoreBPE};

use crate::errors::AppError;

/// Token counter bound to one model encoding
pub struct TokenCounter {
    /// The byte-pair encoder for the resolved encoding
    bpe: CoreBPE,
    /// Model or encoding name the counter was built from
    name: String,
}

impl TokenCounter {
    /// Create a counter for a model identifier.
    ///
    /// An unrecognized model is a configuration error here, at
    /// construction time, not later at call time.
    pub fn for_model(model: &str) -> Result<Self, AppError> {
        let bpe = get_bpe_from_model(model)
            .map_err(|e| AppError::Config(format!("Unrecognized model '{}': {}", model, e)))?;

        Ok(Self {
            bpe,
            name: model.to_string(),
        })
    }

    /// Create a counter from an explicit encoding name.
    ///
    /// Used for models the tokenizer does not know by name, e.g. models
    /// served through Ollama.
    pub fn with_encoding(encoding: &str) -> Result<Self, AppError> {
        let bpe = match encoding {
            "cl100k_base" => cl100k_base(),
            "o200k_base" => o200k_base(),
            "p50k_base" => p50k_base(),
            "r50k_base" => r50k_base(),
            other => {
                return Err(AppError::Config(format!(
                    "Unknown tokenizer encoding '{}'",
                    other
                )));
            }
        }
        .map_err(|e| AppError::Config(format!("Failed to load encoding '{}': {}", encoding, e)))?;

        Ok(Self {
            bpe,
            name: encoding.to_string(),
        })
    }

    /// Count the tokens in a text.
    ///
    /// Deterministic for a fixed encoding and text; ordinary-text
    /// encoding, special tokens are not interpreted.
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    /// The model or encoding name this counter was resolved from
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCounter")
            .field("name", &self.name)
            .finish()
    }
}
