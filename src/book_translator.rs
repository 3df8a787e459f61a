/*!
 * Book translation orchestrator.
 *
 * Reads a page-annotated document, segments it into token-bounded
 * chunks, translates the chunks strictly in order and writes the
 * assembled translation once at the end of the run. Per-chunk failures
 * are logged and skipped; file and configuration failures abort.
 */

use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::segmenter::{Chunk, Segmenter};
use crate::token_counter::TokenCounter;
use crate::translation_client::{TranslationClient, TranslationEngine};

// @const: Leading title/subtitle header block wrapped in 80-'=' lines
static DOCUMENT_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A(={80}\n.*?\n.*?\n={80})").unwrap()
});

/// Main orchestrator for translating a whole book
pub struct BookTranslator {
    /// App configuration
    config: Config,

    /// Client for the configured translation endpoint
    client: TranslationClient,

    /// Token-bounded document segmenter
    segmenter: Segmenter,
}

impl BookTranslator {
    /// Create a new book translator with the given configuration.
    ///
    /// The token counter is resolved here, so an unrecognized model or
    /// encoding fails before any file or network work starts.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let counter = match &config.chunking.encoding {
            Some(encoding) => TokenCounter::with_encoding(encoding)?,
            None => TokenCounter::for_model(&config.translation.get_model())?,
        };
        let segmenter = Segmenter::new(counter, config.chunking.token_budget);
        let client = TranslationClient::new(config.translation.clone())?;

        Ok(Self {
            config,
            client,
            segmenter,
        })
    }

    /// Test the connection to the configured translation provider
    pub async fn test_connection(&self) -> Result<(), crate::errors::ProviderError> {
        self.client.test_connection().await
    }

    /// Translate an entire book from a text file while preserving
    /// pagination.
    ///
    /// The output file is written exactly once, after all chunks have
    /// been processed; an interrupted run leaves no partial output.
    pub async fn translate_book(&self, input_file: &Path, output_file: &Path) -> Result<(), AppError> {
        let book_text = FileManager::read_to_string(input_file)
            .map_err(|e| AppError::File(e.to_string()))?;

        let chunks = self.segmenter.segment(&book_text);
        info!("Split {} into {} chunks (budget {} tokens)",
              input_file.display(), chunks.len(), self.segmenter.token_budget());

        let mut translated_sections = Vec::with_capacity(chunks.len() + 1);

        // Translate the header block separately if present
        if let Some(header) = document_header(&book_text) {
            debug!("Translating document header block");
            match self.client.translate(header).await {
                Ok(translated_header) => translated_sections.push(translated_header),
                Err(e) => warn!("Failed to translate document header: {}", e),
            }
        }

        let delay = Duration::from_secs(self.config.translation.common.request_delay_secs);
        translated_sections.extend(translate_chunks(&self.client, &chunks, delay).await);

        // Combine all translations and write once
        let translated_text = translated_sections.join("\n\n");
        FileManager::write_to_file(output_file, &translated_text)
            .map_err(|e| AppError::File(e.to_string()))?;

        info!("Book translation completed. Output saved to {}", output_file.display());
        Ok(())
    }
}

/// Find the leading title/subtitle header block, if the document has one
pub fn document_header(book_text: &str) -> Option<&str> {
    DOCUMENT_HEADER.find(book_text).map(|m| m.as_str())
}

/// Translate chunks strictly in input order.
///
/// Successful translations are accumulated in order; a failed chunk is
/// logged and skipped without aborting the run. The fixed delay is
/// applied after every attempt, on success and failure alike, to stay
/// under the endpoint's rate limits.
pub async fn translate_chunks<T: TranslationEngine>(
    engine: &T,
    chunks: &[Chunk],
    delay: Duration,
) -> Vec<String> {
    let progress_bar = ProgressBar::new(chunks.len() as u64);
    let template_result = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(template_result);

    let mut translated_sections = Vec::with_capacity(chunks.len());

    for (index, chunk) in chunks.iter().enumerate() {
        debug!("Processing chunk {} with {} tokens", index + 1, chunk.token_count);

        match engine.translate(&chunk.text).await {
            Ok(translated_chunk) => translated_sections.push(translated_chunk),
            Err(e) => warn!("Failed to translate chunk {}: {}", index + 1, e),
        }

        progress_bar.inc(1);

        // Fixed delay after every attempt, regardless of outcome
        tokio::time::sleep(delay).await;
    }

    progress_bar.finish_and_clear();
    translated_sections
}
