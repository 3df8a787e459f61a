/*!
 * Tests for bilingual merging
 */

use kitabai::bilingual_merger::BilingualMerger;

/// Test the basic two-page merge scenario
#[test]
fn test_merge_lines_withMatchingPages_shouldPairLinesUnderPages() {
    let arabic = "Page 1\n----\nمرحبا\nPage 2\n----\nشكرا";
    let english = "Page 1\n----\nHello\nPage 2\n----\nThanks";

    let merged = BilingualMerger::merge_lines(arabic, english);

    // Output header
    assert!(merged.starts_with(&"=".repeat(80)));
    assert!(merged.contains("Arabic-English Translation\n"));

    // Pairs appear under the right page markers, in order
    let page_one = merged.find("Page 1").unwrap();
    let pair_one = merged.find("[Arabic]\nمرحبا").unwrap();
    let page_two = merged.find("Page 2").unwrap();
    let pair_two = merged.find("[Arabic]\nشكرا").unwrap();

    assert!(page_one < pair_one);
    assert!(pair_one < page_two);
    assert!(page_two < pair_two);

    assert!(merged.contains("[Arabic]\nمرحبا\n\n[English]\nHello\n"));
    assert!(merged.contains("[Arabic]\nشكرا\n\n[English]\nThanks\n"));

    // Dashed divider closes each pair
    assert!(merged.contains(&format!("[English]\nHello\n{}\n\n", "-".repeat(40))));
}

/// Test that a page marker fast-forwards the English stream
#[test]
fn test_merge_lines_withEnglishPreamble_shouldSkipToPageMarker() {
    let arabic = "Page 1\n----\nمرحبا";
    let english = "Some translated front matter\nPage 1\n----\nHello";

    let merged = BilingualMerger::merge_lines(arabic, english);

    // The preamble line is skipped, not paired
    assert!(!merged.contains("front matter"));
    assert!(merged.contains("[Arabic]\nمرحبا\n\n[English]\nHello\n"));
}

/// Test that blank lines are skipped on both streams
#[test]
fn test_merge_lines_withBlankLines_shouldSkipThem() {
    let arabic = "\n\nمرحبا\n\n";
    let english = "Hello\n\n\n";

    let merged = BilingualMerger::merge_lines(arabic, english);

    assert!(merged.contains("[Arabic]\nمرحبا\n\n[English]\nHello\n"));
}

/// Test that merging stops at the end of the shorter stream
#[test]
fn test_merge_lines_withShorterEnglishStream_shouldStopPairing() {
    let arabic = "مرحبا\nشكرا";
    let english = "Hello";

    let merged = BilingualMerger::merge_lines(arabic, english);

    assert!(merged.contains("[Arabic]\nمرحبا"));
    assert!(merged.contains("[English]\nHello"));
    // The unmatched Arabic line has no pair and is not emitted
    assert!(!merged.contains("شكرا"));
}

/// Test the file-level merge round trip
#[test]
fn test_merge_files_withTempFiles_shouldWriteMergedOutput() -> anyhow::Result<()> {
    let temp_dir = crate::common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    let arabic = crate::common::create_test_file(&dir, "ar.txt", "Page 1\n----\nمرحبا")?;
    let english = crate::common::create_test_file(&dir, "en.txt", "Page 1\n----\nHello")?;
    let output = dir.join("merged.txt");

    BilingualMerger::merge_files(&arabic, &english, &output)?;

    let merged = std::fs::read_to_string(&output)?;
    assert!(merged.contains("[Arabic]\nمرحبا\n\n[English]\nHello\n"));

    Ok(())
}
