/*!
 * Tests for the orchestrator chunk loop
 */

use std::time::Duration;

use kitabai::app_config::Config;
use kitabai::book_translator::{document_header, translate_chunks, BookTranslator};
use kitabai::errors::AppError;
use kitabai::segmenter::Chunk;

use crate::common;
use crate::common::mock_engines::MockTranslationEngine;

fn chunk(text: &str) -> Chunk {
    Chunk {
        text: text.to_string(),
        page_label: None,
        token_count: 1,
    }
}

/// Test that all chunks translate in input order
#[tokio::test]
async fn test_translate_chunks_withAllSuccesses_shouldPreserveOrder() {
    let engine = MockTranslationEngine::new();
    let chunks = vec![chunk("one"), chunk("two"), chunk("three")];

    let sections = translate_chunks(&engine, &chunks, Duration::ZERO).await;

    assert_eq!(sections, vec![
        MockTranslationEngine::translation_of("one"),
        MockTranslationEngine::translation_of("two"),
        MockTranslationEngine::translation_of("three"),
    ]);
    assert_eq!(engine.call_count(), 3);
}

/// Test that one failure among five chunks is skipped, not fatal
#[tokio::test]
async fn test_translate_chunks_withOneFailureAmongFive_shouldSkipAndContinue() {
    let engine = MockTranslationEngine::failing_on(vec![2]);
    let chunks = vec![
        chunk("one"), chunk("two"), chunk("three"), chunk("four"), chunk("five"),
    ];

    let sections = translate_chunks(&engine, &chunks, Duration::ZERO).await;

    // Four successes in original order, the failed chunk dropped
    assert_eq!(sections, vec![
        MockTranslationEngine::translation_of("one"),
        MockTranslationEngine::translation_of("two"),
        MockTranslationEngine::translation_of("four"),
        MockTranslationEngine::translation_of("five"),
    ]);

    // Every chunk was attempted exactly once
    assert_eq!(engine.call_count(), 5);
    assert_eq!(engine.requests(), vec!["one", "two", "three", "four", "five"]);
}

/// Test the empty chunk sequence
#[tokio::test]
async fn test_translate_chunks_withNoChunks_shouldMakeNoCalls() {
    let engine = MockTranslationEngine::new();

    let sections = translate_chunks(&engine, &[], Duration::ZERO).await;

    assert!(sections.is_empty());
    assert_eq!(engine.call_count(), 0);
}

/// Test document header detection on a well-formed book
#[test]
fn test_document_header_withHeaderBlock_shouldFindIt() {
    let book = common::sample_book();

    let header = document_header(&book).expect("header block should be detected");

    assert!(header.starts_with(&"=".repeat(80)));
    assert!(header.ends_with(&"=".repeat(80)));
    assert!(header.contains("كفية المتحفظ ونهاية المتلفظ"));
    assert!(header.contains("Source: sample.xlsx"));
}

/// Test that a document without a header block yields none
#[test]
fn test_document_header_withPlainDocument_shouldFindNothing() {
    assert!(document_header("Page 1\n----\nJust text.").is_none());
}

/// Test that an unknown model fails translator construction
#[test]
fn test_book_translator_new_withUnknownModel_shouldFailWithConfigError() {
    let mut config = Config::default();
    config.translation.set_api_key("sk-test");
    config.translation.set_model("mystery-model-9000");

    let result = BookTranslator::new(config);

    assert!(matches!(result, Err(AppError::Config(_))));
}

/// Test that an encoding override rescues an unknown model name
#[test]
fn test_book_translator_new_withEncodingOverride_shouldConstruct() {
    let mut config = Config::default();
    config.translation.set_api_key("sk-test");
    config.translation.set_model("mystery-model-9000");
    config.chunking.encoding = Some("cl100k_base".to_string());

    assert!(BookTranslator::new(config).is_ok());
}
