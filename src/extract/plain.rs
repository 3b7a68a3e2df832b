//! Plain text files.

use super::{ChunkMetadata, DocumentChunk, ExtractionError};

/// Decode the whole file as UTF-8 into a single chunk.
pub(super) fn extract_text(source: &str, bytes: &[u8]) -> Result<Vec<DocumentChunk>, ExtractionError> {
    let text = std::str::from_utf8(bytes)?;
    Ok(vec![DocumentChunk::new(text, ChunkMetadata::file(source))])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbatim() {
        let chunks = extract_text("a.txt", "line one\n\n  line two  ".as_bytes()).unwrap();
        assert_eq!(chunks[0].content, "line one\n\n  line two  ");
    }

    #[test]
    fn test_invalid_utf8() {
        let err = extract_text("a.txt", &[b'o', b'k', 0xc3, 0x28]).unwrap_err();
        assert!(matches!(err, ExtractionError::Encoding(_)));
    }
}
