//! Text extraction from uploaded documents.
//!
//! PDFs go through `pdf-extract`; everything else is decoded as UTF-8 with
//! lossy fallback. Extraction failures degrade to empty text, which intake
//! validation then rejects with a useful message.

use tracing::warn;

/// Extracts plain text from `bytes` based on the file extension
/// (already sanitized and lowercased by the caller).
pub fn extract_text(bytes: &[u8], extension: &str) -> String {
    if extension == "pdf" {
        extract_text_from_pdf(bytes)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

fn extract_text_from_pdf(bytes: &[u8]) -> String {
    match pdf_extract::extract_text_from_mem(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!("PDF text extraction failed: {e}");
            String::new()
        }
    }
}
