use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{OcrEngine, TextExtractor, ValidationError};
use crate::config::{ExtractionSettings, LimitSettings};
use crate::domain::{Document, ExtractionResult, PageOutcome};

use super::pdf_rasterizer::rasterize_pages;
use super::pdf_text::extract_page_texts;
use super::text_sanitizer::sanitize_extracted_text;
use super::PdfError;

const DIRECT_EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);
const RASTERIZATION_TIMEOUT: Duration = Duration::from_secs(300);

/// Text extraction over uploaded files: images go straight to OCR, PDFs try
/// direct text extraction first and fall back to rendering pages through OCR
/// when the direct text is structurally broken or too sparse to trust.
///
/// All intermediate buffers are scoped to the call; per-page failures become
/// warnings, never aborts.
pub struct DocumentTextExtractor {
    ocr: Arc<dyn OcrEngine>,
    max_file_size_bytes: u64,
    min_direct_chars: usize,
    render_dpi: f32,
    max_pages: usize,
}

impl DocumentTextExtractor {
    pub fn new(
        ocr: Arc<dyn OcrEngine>,
        limits: &LimitSettings,
        extraction: &ExtractionSettings,
    ) -> Self {
        Self {
            ocr,
            max_file_size_bytes: limits.max_file_size_bytes(),
            min_direct_chars: limits.min_direct_chars.max(1),
            render_dpi: extraction.render_dpi,
            max_pages: extraction.max_pages,
        }
    }

    async fn extract_image(&self, data: &[u8]) -> ExtractionResult {
        let outcome = self.ocr_page(data, 0, None).await;
        ExtractionResult::from_pages(vec![outcome])
    }

    async fn extract_pdf(&self, data: &[u8]) -> ExtractionResult {
        let direct = self.direct_pages(data).await;

        match &direct {
            Ok(pages) => {
                let chars: usize = pages.iter().map(|p| p.trim().chars().count()).sum();
                if chars >= self.min_direct_chars {
                    let outcomes = pages
                        .iter()
                        .enumerate()
                        .map(|(i, raw)| PageOutcome::direct(i, sanitize_extracted_text(raw)))
                        .collect();
                    return ExtractionResult::from_pages(outcomes);
                }
                tracing::info!(
                    chars,
                    threshold = self.min_direct_chars,
                    "direct pdf text below usability threshold, routing pages through ocr"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "direct pdf extraction failed, routing pages through ocr");
            }
        }

        let direct_pages = direct.unwrap_or_default();

        let png_buffers = match self.rasterize(data).await {
            Ok(buffers) => buffers,
            Err(e) => {
                // OCR is unreachable without rendered pages; keep whatever
                // sparse direct text exists rather than aborting.
                tracing::warn!(error = %e, "pdf rasterization failed");
                let outcomes = direct_pages
                    .iter()
                    .enumerate()
                    .map(|(i, raw)| {
                        let text = sanitize_extracted_text(raw);
                        if text.is_empty() {
                            PageOutcome::failed(i, format!("page {i}: no text on any path"))
                        } else {
                            PageOutcome::direct(i, text)
                        }
                    })
                    .collect();
                let mut result = ExtractionResult::from_pages(outcomes);
                result.warnings.insert(0, format!("pdf rasterization failed: {e}"));
                return result;
            }
        };

        let mut outcomes = Vec::with_capacity(png_buffers.len().max(direct_pages.len()));
        for (index, png) in png_buffers.iter().enumerate() {
            let direct_text = direct_pages.get(index).map(String::as_str);
            outcomes.push(self.ocr_page(png, index, direct_text).await);
        }

        // Pages beyond the render cap keep their direct text when present.
        for index in png_buffers.len()..direct_pages.len() {
            let text = sanitize_extracted_text(&direct_pages[index]);
            if text.is_empty() {
                outcomes.push(PageOutcome::failed(
                    index,
                    format!("page {index}: beyond render page cap, no direct text"),
                ));
            } else {
                let mut outcome = PageOutcome::direct(index, text);
                outcome.warning =
                    Some(format!("page {index}: beyond render page cap, kept direct text"));
                outcomes.push(outcome);
            }
        }

        ExtractionResult::from_pages(outcomes)
    }

    /// OCR one page with a single retry on transient failure. A permanent
    /// failure falls back to the page's direct text when there is any,
    /// otherwise the page is recorded as failed with a warning.
    async fn ocr_page(
        &self,
        image: &[u8],
        page_index: usize,
        direct_text: Option<&str>,
    ) -> PageOutcome {
        let attempt = match self.ocr.recognize(image).await {
            Err(ref e) if e.is_transient() => {
                tracing::debug!(page_index, error = %e, "transient ocr failure, retrying");
                self.ocr.recognize(image).await
            }
            other => other,
        };

        match attempt {
            Ok(raw) => {
                let text = sanitize_extracted_text(&raw);
                if text.is_empty() {
                    self.recover_page(page_index, direct_text, "ocr returned no text")
                } else {
                    PageOutcome::ocr(page_index, text)
                }
            }
            Err(e) => self.recover_page(page_index, direct_text, &e.to_string()),
        }
    }

    fn recover_page(
        &self,
        page_index: usize,
        direct_text: Option<&str>,
        cause: &str,
    ) -> PageOutcome {
        match direct_text
            .map(sanitize_extracted_text)
            .filter(|t| !t.is_empty())
        {
            Some(text) => {
                let mut outcome = PageOutcome::direct(page_index, text);
                outcome.warning = Some(format!("page {page_index}: {cause}; kept direct text"));
                outcome
            }
            None => PageOutcome::failed(page_index, format!("page {page_index}: {cause}")),
        }
    }

    async fn direct_pages(&self, data: &[u8]) -> Result<Vec<String>, PdfError> {
        let owned = data.to_vec();
        tokio::time::timeout(
            DIRECT_EXTRACTION_TIMEOUT,
            tokio::task::spawn_blocking(move || extract_page_texts(&owned)),
        )
        .await
        .map_err(|_| PdfError::Parse("direct text extraction timed out".to_string()))?
        .map_err(|e| PdfError::Parse(format!("task join error: {e}")))?
    }

    async fn rasterize(&self, data: &[u8]) -> Result<Vec<Vec<u8>>, PdfError> {
        let owned = data.to_vec();
        let dpi = self.render_dpi;
        let cap = self.max_pages;
        tokio::time::timeout(
            RASTERIZATION_TIMEOUT,
            tokio::task::spawn_blocking(move || {
                std::panic::catch_unwind(|| rasterize_pages(&owned, dpi, cap)).unwrap_or_else(
                    |_| {
                        Err(PdfError::Render(
                            "panic during pdf rasterization".to_string(),
                        ))
                    },
                )
            }),
        )
        .await
        .map_err(|_| PdfError::Render("pdf rasterization timed out".to_string()))?
        .map_err(|e| PdfError::Render(format!("task join error: {e}")))?
    }
}

#[async_trait]
impl TextExtractor for DocumentTextExtractor {
    #[tracing::instrument(
        skip(self, data),
        fields(filename = %document.filename, format = %document.format)
    )]
    async fn extract(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<ExtractionResult, ValidationError> {
        if data.is_empty() {
            return Err(ValidationError::EmptyFile);
        }
        if data.len() as u64 > self.max_file_size_bytes {
            return Err(ValidationError::FileTooLarge {
                size_bytes: data.len() as u64,
                limit_bytes: self.max_file_size_bytes,
            });
        }

        let result = if document.format.is_image() {
            self.extract_image(data).await
        } else {
            self.extract_pdf(data).await
        };

        tracing::info!(
            source = ?result.source,
            pages_processed = result.pages_processed,
            pages_failed = result.pages_failed,
            chars = result.text.chars().count(),
            "extraction complete"
        );

        Ok(result)
    }
}
