use serde::Serialize;

/// Where the extracted text of a document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionSource {
    /// Every page came from direct PDF text extraction.
    Direct,
    /// Every page came from optical recognition.
    Ocr,
    /// Pages came from both sources.
    Mixed,
}

/// Outcome of processing a single page, accumulated in page order and
/// reduced into an [`ExtractionResult`] at the end of extraction.
#[derive(Debug, Clone)]
pub struct PageOutcome {
    pub page_index: usize,
    /// `None` means the page failed on every available path.
    pub text: Option<String>,
    /// Whether the surviving text (or the last attempt, for failed pages)
    /// came from OCR.
    pub used_ocr: bool,
    pub warning: Option<String>,
}

impl PageOutcome {
    pub fn direct(page_index: usize, text: String) -> Self {
        Self {
            page_index,
            text: Some(text),
            used_ocr: false,
            warning: None,
        }
    }

    pub fn ocr(page_index: usize, text: String) -> Self {
        Self {
            page_index,
            text: Some(text),
            used_ocr: true,
            warning: None,
        }
    }

    pub fn failed(page_index: usize, warning: String) -> Self {
        Self {
            page_index,
            text: None,
            used_ocr: true,
            warning: Some(warning),
        }
    }

    fn succeeded(&self) -> bool {
        self.text.is_some()
    }
}

/// Aggregate result of text extraction over a whole document.
///
/// `text` is empty only when every page failed; `pages_failed` never exceeds
/// `pages_processed`; page order is preserved in the concatenated text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub text: String,
    pub source: ExtractionSource,
    pub pages_processed: usize,
    pub pages_failed: usize,
    pub warnings: Vec<String>,
}

impl ExtractionResult {
    /// Reduce ordered per-page outcomes into the aggregate result.
    pub fn from_pages(outcomes: Vec<PageOutcome>) -> Self {
        let pages_processed = outcomes.len();
        let pages_failed = outcomes.iter().filter(|o| !o.succeeded()).count();

        let warnings: Vec<String> = outcomes.iter().filter_map(|o| o.warning.clone()).collect();

        let page_texts: Vec<&str> = outcomes
            .iter()
            .filter_map(|o| o.text.as_deref())
            .filter(|t| !t.is_empty())
            .collect();
        let text = page_texts.join("\n\n");

        let succeeded: Vec<&PageOutcome> = outcomes.iter().filter(|o| o.succeeded()).collect();
        let source = if succeeded.is_empty() {
            if outcomes.iter().any(|o| o.used_ocr) {
                ExtractionSource::Ocr
            } else {
                ExtractionSource::Direct
            }
        } else if succeeded.iter().all(|o| !o.used_ocr) {
            ExtractionSource::Direct
        } else if succeeded.iter().all(|o| o.used_ocr) {
            ExtractionSource::Ocr
        } else {
            ExtractionSource::Mixed
        };

        Self {
            text,
            source,
            pages_processed,
            pages_failed,
            warnings,
        }
    }

    /// True when no page yielded any text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
