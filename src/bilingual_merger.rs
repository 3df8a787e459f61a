/*!
 * Bilingual document merging.
 *
 * Interleaves the Arabic source and its English translation line by
 * line, synchronizing the two streams at `Page <n>` markers. The merge
 * assumes both files carry the same number of non-empty content lines
 * between corresponding page markers; when a translation chunk was
 * dropped the English stream runs short for that page and the remaining
 * lines pair up incorrectly without any warning. No realignment is
 * attempted.
 */

use std::path::Path;

use log::info;

use crate::errors::AppError;
use crate::file_utils::FileManager;

/// Merges a source document with its translation
pub struct BilingualMerger;

impl BilingualMerger {
    /// Merge two page-annotated files into one bilingual file.
    ///
    /// The output is written exactly once, after the whole merge is
    /// assembled.
    pub fn merge_files(arabic_file: &Path, english_file: &Path, output_file: &Path) -> Result<(), AppError> {
        let arabic_text = FileManager::read_to_string(arabic_file)
            .map_err(|e| AppError::File(e.to_string()))?;
        let english_text = FileManager::read_to_string(english_file)
            .map_err(|e| AppError::File(e.to_string()))?;

        let merged = Self::merge_lines(&arabic_text, &english_text);

        FileManager::write_to_file(output_file, &merged)
            .map_err(|e| AppError::File(e.to_string()))?;

        info!("Successfully merged translations into: {}", output_file.display());
        Ok(())
    }

    /// Interleave two documents line by line.
    ///
    /// Blank lines are skipped on both streams. A `Page <n>` line in the
    /// Arabic stream emits a page marker block and fast-forwards the
    /// English stream past its next page marker; any other line pair is
    /// emitted as an `[Arabic]` / `[English]` block with a dashed
    /// divider.
    pub fn merge_lines(arabic: &str, english: &str) -> String {
        let arabic_lines: Vec<&str> = arabic.lines().collect();
        let english_lines: Vec<&str> = english.lines().collect();

        let mut merged = String::new();

        // Header
        merged.push_str(&"=".repeat(80));
        merged.push('\n');
        merged.push_str("Arabic-English Translation\n");
        merged.push_str(&"=".repeat(80));
        merged.push_str("\n\n");

        let mut ar_idx = 0;
        let mut en_idx = 0;

        while ar_idx < arabic_lines.len() && en_idx < english_lines.len() {
            let ar_line = arabic_lines[ar_idx].trim();
            let en_line = english_lines[en_idx].trim();

            // Skip empty lines
            if ar_line.is_empty() {
                ar_idx += 1;
                continue;
            }
            if en_line.is_empty() {
                en_idx += 1;
                continue;
            }

            // Handle page markers
            if ar_line.starts_with("Page ") {
                merged.push('\n');
                merged.push_str(&"=".repeat(40));
                merged.push('\n');
                merged.push_str(ar_line);
                merged.push('\n');
                merged.push_str(&"-".repeat(40));
                merged.push_str("\n\n");
                ar_idx += 1;

                // Find and skip the corresponding English page marker
                while en_idx < english_lines.len() && !english_lines[en_idx].trim().starts_with("Page ") {
                    en_idx += 1;
                }
                en_idx += 1;
                continue;
            }

            // Write the Arabic line with its English counterpart
            merged.push_str("[Arabic]\n");
            merged.push_str(ar_line);
            merged.push_str("\n\n");

            merged.push_str("[English]\n");
            merged.push_str(en_line);
            merged.push('\n');
            merged.push_str(&"-".repeat(40));
            merged.push_str("\n\n");

            ar_idx += 1;
            en_idx += 1;
        }

        merged
    }
}
