/*!
 * Common test utilities for the kitabai test suite
 */

use std::fs;
use std::path::PathBuf;
use anyhow::Result;
use tempfile::TempDir;

// Re-export the mock engines module
pub mod mock_engines;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a small page-annotated book for testing
pub fn sample_book() -> String {
    let mut book = String::new();

    book.push_str(&"=".repeat(80));
    book.push('\n');
    book.push_str("كفية المتحفظ ونهاية المتلفظ\n");
    book.push_str("Source: sample.xlsx\n");
    book.push_str(&"=".repeat(80));
    book.push_str("\n\n");

    book.push_str("\nPage 1\n");
    book.push_str(&"-".repeat(40));
    book.push_str("\n\n");
    book.push_str("First paragraph on page one.\n\n");
    book.push_str("Second paragraph on page one.\n\n");

    book.push('\n');
    book.push_str(&"=".repeat(40));
    book.push('\n');

    book.push_str("\nPage 2\n");
    book.push_str(&"-".repeat(40));
    book.push_str("\n\n");
    book.push_str("Only paragraph on page two.\n\n");

    book
}
