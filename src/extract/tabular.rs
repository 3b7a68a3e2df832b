//! CSV files with a header row.

use csv::ReaderBuilder;

use super::{ChunkMetadata, DocumentChunk, ExtractionError};

/// One chunk per data row; field values joined by single spaces.
///
/// Rows shorter than the header are kept as if padded with empty fields.
/// Rows longer than the header fail the whole file.
pub(super) fn extract_csv(source: &str, bytes: &[u8]) -> Result<Vec<DocumentChunk>, ExtractionError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);
    let width = reader.headers()?.len();

    let mut chunks = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let row = index as u64 + 1;
        if record.len() > width {
            return Err(ExtractionError::CsvRowTooLong {
                row,
                found: record.len(),
                expected: width,
            });
        }

        // Missing trailing fields read as empty and add no separators
        let line = record.iter().collect::<Vec<_>>().join(" ");
        chunks.push(DocumentChunk::new(line, ChunkMetadata::row(source, row)));
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_become_chunks() {
        let data = "name,city,age\nAda,London,36\n\"Hopper, Grace\",Arlington,85\n";
        let chunks = extract_csv("people.csv", data.as_bytes()).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "Ada London 36");
        assert_eq!(chunks[1].content, "Hopper, Grace Arlington 85");
        assert_eq!(chunks[1].metadata, ChunkMetadata::row("people.csv", 2));
    }

    #[test]
    fn test_header_only() {
        let chunks = extract_csv("empty.csv", b"col1,col2\n").unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_short_rows_are_padded() {
        let data = "name,city,age\nAda,London,36\nGrace,Arlington\n";
        let chunks = extract_csv("people.csv", data.as_bytes()).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "Ada London 36");
        assert_eq!(chunks[1].content, "Grace Arlington");
        assert_eq!(chunks[1].metadata, ChunkMetadata::row("people.csv", 2));
    }

    #[test]
    fn test_empty_cells_stay_empty() {
        let chunks = extract_csv("gaps.csv", b"a,b,c
x,,z
").unwrap();
        assert_eq!(chunks[0].content, "x  z");
    }

    #[test]
    fn test_long_rows_fail() {
        let err = extract_csv("bad.csv", b"a,b\n1,2\n1,2,3\n").unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::CsvRowTooLong {
                row: 2,
                found: 3,
                expected: 2
            }
        ));
    }
}
