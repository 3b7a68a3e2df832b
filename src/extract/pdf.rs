//! PDF text extraction via lopdf.

use lopdf::Document;
use tracing::{debug, warn};

use super::{ChunkMetadata, DocumentChunk, ExtractionError};

/// One chunk per page that has text.
///
/// Pages with no text (blank or scanned) are dropped without a separator.
/// A page whose text cannot be decoded is treated the same way.
pub(super) fn extract_pdf(source: &str, bytes: &[u8]) -> Result<Vec<DocumentChunk>, ExtractionError> {
    let doc = Document::load_mem(bytes)?;
    let pages = doc.get_pages();

    let mut chunks = Vec::with_capacity(pages.len());
    for &page_num in pages.keys() {
        let raw = match doc.extract_text(&[page_num]) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("No text on page {} of {}: {}", page_num, source, e);
                continue;
            }
        };

        if let Some(text) = page_text(&raw) {
            chunks.push(DocumentChunk::new(text, ChunkMetadata::page(source, page_num)));
        }
    }

    if chunks.is_empty() {
        warn!(
            "No extractable text in {} ({} page(s)); it may be scanned",
            source,
            pages.len()
        );
    }

    Ok(chunks)
}

/// lopdf ends every page with a line break; the flattened text adds its own.
fn page_text(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }
    Some(raw.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_text_drops_trailing_break() {
        assert_eq!(page_text("One\n").as_deref(), Some("One"));
        assert_eq!(page_text("Line 1\nLine 2\r\n").as_deref(), Some("Line 1\nLine 2"));
        assert_eq!(page_text("  indented").as_deref(), Some("  indented"));
    }

    #[test]
    fn test_page_text_blank_is_none() {
        assert_eq!(page_text(""), None);
        assert_eq!(page_text(" \n\n"), None);
    }

    #[test]
    fn test_garbage_is_an_error() {
        let err = extract_pdf("x.pdf", b"%PDF-1.4 truncated").unwrap_err();
        assert!(matches!(err, ExtractionError::Pdf(_)));
    }
}
