use lopdf::Document;

use super::PdfError;

/// Direct per-page text extraction. Returns one entry per page in page
/// order; pages without extractable text yield empty strings rather than
/// failing the document.
pub(super) fn extract_page_texts(data: &[u8]) -> Result<Vec<String>, PdfError> {
    let doc = Document::load_mem(data)
        .map_err(|e| PdfError::Parse(format!("failed to parse pdf: {e}")))?;

    let pages = doc.get_pages();
    let mut texts = Vec::with_capacity(pages.len());

    for (&page_number, _) in pages.iter() {
        let text = doc.extract_text(&[page_number]).unwrap_or_default();
        texts.push(text);
    }

    Ok(texts)
}
