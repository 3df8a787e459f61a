/*!
 * End-to-end tests across the formatting, segmentation and merge stages
 */

use anyhow::Result;

use kitabai::bilingual_merger::BilingualMerger;
use kitabai::document_formatter::{DocumentFormatter, SheetRow};
use kitabai::file_utils::FileManager;
use kitabai::segmenter::Segmenter;
use kitabai::token_counter::TokenCounter;

use crate::common;

/// Test the convert -> segment path over a real file
#[test]
fn test_pipeline_renderedFileFedToSegmenter_shouldChunkPerParagraph() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let book_path = temp_dir.path().join("kafiah.txt");

    let rows = vec![
        SheetRow::new("البيت الأول من القصيدة", Some(1)),
        SheetRow::new("البيت الثاني من القصيدة", Some(1)),
        SheetRow::new("البيت الثالث من القصيدة", Some(2)),
    ];
    let formatter = DocumentFormatter::new("كفية المتحفظ ونهاية المتلفظ");
    let document = formatter.render("kafiah.xlsx", &rows);
    FileManager::write_to_file(&book_path, &document)?;

    let book_text = FileManager::read_to_string(&book_path)?;
    let counter = TokenCounter::with_encoding("cl100k_base").unwrap();
    let segmenter = Segmenter::new(counter, 2000);
    let chunks = segmenter.segment(&book_text);

    let labeled: Vec<_> = chunks.iter().filter(|c| c.page_label.is_some()).collect();
    assert_eq!(labeled.len(), 3);
    assert_eq!(labeled[0].text, "Page 1\nالبيت الأول من القصيدة");
    assert_eq!(labeled[1].text, "Page 1\nالبيت الثاني من القصيدة");
    assert_eq!(labeled[2].text, "Page 2\nالبيت الثالث من القصيدة");

    Ok(())
}

/// Test the merge of two structurally parallel rendered documents
#[test]
fn test_pipeline_mergeOfParallelDocuments_shouldPairContentUnderPages() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    let formatter_ar = DocumentFormatter::new("كفية المتحفظ ونهاية المتلفظ");
    let arabic = formatter_ar.render("kafiah.xlsx", &[
        SheetRow::new("مرحبا", Some(1)),
        SheetRow::new("شكرا", Some(2)),
    ]);

    let formatter_en = DocumentFormatter::new("The Sufficiency of the Memorizer");
    let english = formatter_en.render("kafiah.xlsx", &[
        SheetRow::new("Hello", Some(1)),
        SheetRow::new("Thanks", Some(2)),
    ]);

    let arabic_path = common::create_test_file(&dir, "kafiah.txt", &arabic)?;
    let english_path = common::create_test_file(&dir, "kafiah_english.txt", &english)?;
    let output_path = dir.join("kafiah_merged.txt");

    BilingualMerger::merge_files(&arabic_path, &english_path, &output_path)?;
    let merged = FileManager::read_to_string(&output_path)?;

    // Content pairs land under the right page markers, in order
    let page_one = merged.find("Page 1").unwrap();
    let pair_one = merged.find("[Arabic]\nمرحبا\n\n[English]\nHello\n").unwrap();
    let page_two = merged.find("Page 2").unwrap();
    let pair_two = merged.find("[Arabic]\nشكرا\n\n[English]\nThanks\n").unwrap();

    assert!(page_one < pair_one);
    assert!(pair_one < page_two);
    assert!(page_two < pair_two);

    Ok(())
}
