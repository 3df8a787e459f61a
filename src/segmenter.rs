/*!
 * Document segmentation.
 *
 * Splits a page-annotated document into translation-ready chunks that
 * stay within the configured token budget while preserving page markers
 * and, where possible, paragraph and sentence boundaries. Splitting
 * never goes below sentence granularity: a single sentence over budget
 * is emitted as-is rather than cut mid-sentence.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::token_counter::TokenCounter;

// @const: A line of 40 or more '=' characters separates pages
static PAGE_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n={40,}\n").unwrap()
});

// @const: Verbatim page label, e.g. "Page 12"
static PAGE_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Page \d+").unwrap()
});

// @const: Page header block, the label line followed by a dashed divider
static PAGE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Page \d+\n-+\n").unwrap()
});

// @const: Sentence boundary, terminal punctuation followed by whitespace
static SENTENCE_BOUNDARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[.!?]\s+").unwrap()
});

/// A bounded unit of text submitted as one translation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Serialized chunk text: fragments joined by newlines, each
    /// optionally prefixed with its page label
    pub text: String,

    /// Page label carried by every fragment in this chunk, if the
    /// source page had one
    pub page_label: Option<String>,

    /// Token count used for budget admission. For sentence-built chunks
    /// this is the sum of the per-fragment counts.
    pub token_count: usize,
}

/// Splits raw documents into token-bounded chunks
#[derive(Debug)]
pub struct Segmenter {
    /// Counter for the configured model encoding
    counter: TokenCounter,

    /// Maximum tokens per serialized chunk
    token_budget: usize,
}

impl Segmenter {
    /// Create a segmenter with the given counter and budget
    pub fn new(counter: TokenCounter, token_budget: usize) -> Self {
        Self {
            counter,
            token_budget,
        }
    }

    /// The configured token budget
    pub fn token_budget(&self) -> usize {
        self.token_budget
    }

    /// Split a document into an ordered sequence of chunks.
    ///
    /// Pages are delimited by separator lines, each page contributes its
    /// `Page <n>` label to every chunk derived from it, and paragraphs
    /// map to chunks one-to-one unless a paragraph overflows the budget
    /// and falls back to sentence accumulation. Page and paragraph order
    /// is preserved; an empty or whitespace-only document yields an
    /// empty sequence.
    pub fn segment(&self, document: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        for page in PAGE_SEPARATOR.split(document) {
            if page.trim().is_empty() {
                continue;
            }

            // Capture the label verbatim, then strip the header block so
            // it is not re-translated as body text
            let page_label = PAGE_LABEL.find(page).map(|m| m.as_str().to_string());
            let body = PAGE_HEADER.replace_all(page, "");
            let body = body.trim();
            if body.is_empty() {
                continue;
            }

            for paragraph in body.split("\n\n") {
                let paragraph = paragraph.trim();
                if paragraph.is_empty() {
                    continue;
                }

                let candidate = match &page_label {
                    Some(label) => format!("{}\n{}", label, paragraph),
                    None => paragraph.to_string(),
                };
                let token_count = self.counter.count(&candidate);

                if token_count > self.token_budget {
                    chunks.extend(self.split_paragraph(paragraph, page_label.as_deref()));
                } else {
                    chunks.push(Chunk {
                        text: candidate,
                        page_label: page_label.clone(),
                        token_count,
                    });
                }
            }
        }

        chunks
    }

    /// Sentence-level fallback for a paragraph over budget.
    ///
    /// Each sentence is individually prefixed with the page label and
    /// sentences are accumulated greedily until the next one would
    /// overflow. A single sentence over budget still becomes its own
    /// chunk; there is no splitting below sentence granularity.
    fn split_paragraph(&self, paragraph: &str, page_label: Option<&str>) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut current_tokens = 0usize;

        for sentence in split_sentences(paragraph) {
            let labeled = match page_label {
                Some(label) => format!("{}\n{}", label, sentence),
                None => sentence.to_string(),
            };
            let sentence_tokens = self.counter.count(&labeled);

            if current_tokens + sentence_tokens > self.token_budget {
                if !current.is_empty() {
                    chunks.push(Chunk {
                        text: current.join("\n"),
                        page_label: page_label.map(str::to_string),
                        token_count: current_tokens,
                    });
                }
                current = vec![labeled];
                current_tokens = sentence_tokens;
            } else {
                current.push(labeled);
                current_tokens += sentence_tokens;
            }
        }

        if !current.is_empty() {
            chunks.push(Chunk {
                text: current.join("\n"),
                page_label: page_label.map(str::to_string),
                token_count: current_tokens,
            });
        }

        chunks
    }
}

/// Split a paragraph on sentence-ending punctuation followed by
/// whitespace, keeping the punctuation attached to the preceding
/// sentence and discarding the whitespace.
fn split_sentences(paragraph: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut last = 0;

    for boundary in SENTENCE_BOUNDARY.find_iter(paragraph) {
        // The match starts at the single-byte punctuation character
        let end = boundary.start() + 1;
        sentences.push(&paragraph[last..end]);
        last = boundary.end();
    }

    if last < paragraph.len() {
        sentences.push(&paragraph[last..]);
    }

    sentences
}
