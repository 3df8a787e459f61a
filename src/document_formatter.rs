/*!
 * Spreadsheet to page-annotated text conversion.
 *
 * Reads a workbook whose rows carry free text (column 4) and a page
 * number (column 5) and renders the page-annotated plain-text document
 * the segmenter and merger expect: an 80-'=' title header, 40-'='
 * page separators, `Page <n>` labels over 40-'-' dividers, and an
 * End of Document footer.
 */

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use log::info;

use crate::errors::AppError;
use crate::file_utils::FileManager;

// Column layout of the source workbook (0-indexed)
const TEXT_COLUMN: usize = 4;
const PAGE_COLUMN: usize = 5;

/// One decoded spreadsheet row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRow {
    /// Free text content, empty when the cell is blank
    pub text: String,

    /// Page number, if the row carries one
    pub page: Option<u32>,
}

impl SheetRow {
    /// Create a row with text and an optional page number
    pub fn new(text: impl Into<String>, page: Option<u32>) -> Self {
        Self {
            text: text.into(),
            page,
        }
    }
}

/// Converts tabular exports into page-annotated documents
#[derive(Debug, Clone)]
pub struct DocumentFormatter {
    /// Document title written into the leading header block
    title: String,

    /// Worksheet to process (0 = first sheet)
    sheet_index: usize,
}

impl DocumentFormatter {
    /// Create a formatter for the given document title, reading the
    /// first sheet
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sheet_index: 0,
        }
    }

    /// Select a worksheet by index
    pub fn with_sheet(mut self, sheet_index: usize) -> Self {
        self.sheet_index = sheet_index;
        self
    }

    /// Convert a workbook to a formatted text file.
    ///
    /// Malformed or unreadable tabular input aborts the conversion with
    /// a format error.
    pub fn convert(&self, input_file: &Path, output_file: &Path) -> Result<(), AppError> {
        let rows = self.read_rows(input_file)?;

        let source_name = input_file.file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| input_file.display().to_string());

        let document = self.render(&source_name, &rows);
        FileManager::write_to_file(output_file, &document)
            .map_err(|e| AppError::File(e.to_string()))?;

        info!("Successfully created formatted text file: {}", output_file.display());
        Ok(())
    }

    /// Decode the relevant columns of the configured worksheet
    fn read_rows(&self, input_file: &Path) -> Result<Vec<SheetRow>, AppError> {
        let mut workbook = open_workbook_auto(input_file)
            .map_err(|e| AppError::Format(format!("Failed to open workbook {}: {}", input_file.display(), e)))?;

        let range = workbook.worksheet_range_at(self.sheet_index)
            .ok_or_else(|| AppError::Format(format!("Workbook has no sheet at index {}", self.sheet_index)))?
            .map_err(|e| AppError::Format(format!("Failed to read sheet {}: {}", self.sheet_index, e)))?;

        let mut rows = Vec::new();
        for row in range.rows() {
            let text = match row.get(TEXT_COLUMN) {
                Some(Data::Empty) | None => String::new(),
                Some(cell) => cell.to_string(),
            };

            let page = match row.get(PAGE_COLUMN) {
                Some(Data::Int(n)) if *n >= 0 => Some(*n as u32),
                Some(Data::Float(f)) if *f >= 0.0 => Some(*f as u32),
                Some(Data::String(s)) => s.trim().parse().ok(),
                _ => None,
            };

            rows.push(SheetRow { text, page });
        }

        Ok(rows)
    }

    /// Render decoded rows as a page-annotated document.
    ///
    /// Pure over its inputs so the layout is testable without a
    /// workbook on disk.
    pub fn render(&self, source_name: &str, rows: &[SheetRow]) -> String {
        let mut document = String::new();

        // Header
        document.push_str(&"=".repeat(80));
        document.push('\n');
        document.push_str(&self.title);
        document.push('\n');
        document.push_str(&format!("Source: {}\n", source_name));
        document.push_str(&"=".repeat(80));
        document.push_str("\n\n");

        let mut current_page: Option<u32> = None;

        for row in rows {
            // A new page number opens a page marker block
            if let Some(page) = row.page {
                if current_page != Some(page) {
                    if current_page.is_some() {
                        document.push('\n');
                        document.push_str(&"=".repeat(40));
                        document.push('\n');
                    }
                    document.push_str(&format!("\nPage {}\n", page));
                    document.push_str(&"-".repeat(40));
                    document.push_str("\n\n");
                    current_page = Some(page);
                }
            }

            if !row.text.is_empty() {
                document.push_str(&row.text);
                document.push_str("\n\n");
            }
        }

        // End of document marker
        document.push('\n');
        document.push_str(&"=".repeat(80));
        document.push('\n');
        document.push_str("End of Document\n");
        document.push_str(&"=".repeat(80));

        document
    }
}
