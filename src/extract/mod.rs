//! Text extraction from uploaded documents.
//!
//! Turns a batch of `(filename, bytes)` uploads into metadata-tagged text
//! chunks. Dispatch is on the lowercased filename suffix:
//! - `.pdf`: one chunk per page that yields text (lopdf)
//! - `.csv`: one chunk per data row, fields joined by spaces (csv)
//! - `.txt`: one chunk holding the whole file, decoded as UTF-8
//!
//! Anything else is skipped with a warning. A file that fails to parse is
//! logged and skipped; the rest of the batch still goes through.
//!
//! Batch results are memoised in a bounded LRU cache keyed by a SHA-256
//! digest of the uploaded names and contents.

mod cache;
mod pdf;
mod plain;
mod tabular;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use cache::{BatchCache, BatchKey};

/// Default number of batches kept in the extraction cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 32;

/// Errors that can occur while extracting a single file.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("PDF parse error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("CSV row {row} has {found} fields, expected at most {expected}")]
    CsvRowTooLong {
        row: u64,
        found: usize,
        expected: usize,
    },

    #[error("Invalid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
}

/// File type inferred from the filename extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Pdf,
    Csv,
    Text,
    Unsupported,
}

impl FileKind {
    /// Infer the kind from a filename (case-insensitive).
    pub fn from_filename(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.ends_with(".pdf") {
            FileKind::Pdf
        } else if lower.ends_with(".csv") {
            FileKind::Csv
        } else if lower.ends_with(".txt") {
            FileKind::Text
        } else {
            FileKind::Unsupported
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Csv => "csv",
            FileKind::Text => "txt",
            FileKind::Unsupported => "unsupported",
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A file handed to the extractor. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    name: String,
    content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Read a file from disk, using its file name as the upload name.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, content))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn kind(&self) -> FileKind {
        FileKind::from_filename(&self.name)
    }

    /// Lowercased name, used for cache keys and chunk sources.
    pub fn normalized_name(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Where a chunk came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Lowercased source filename.
    pub source: String,
    /// 1-based page number (PDF only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// 1-based data row number, header excluded (CSV only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<u64>,
}

impl ChunkMetadata {
    pub fn file(source: &str) -> Self {
        Self {
            source: source.to_string(),
            page: None,
            row: None,
        }
    }

    pub fn page(source: &str, page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::file(source)
        }
    }

    pub fn row(source: &str, row: u64) -> Self {
        Self {
            row: Some(row),
            ..Self::file(source)
        }
    }
}

/// A unit of extracted text with its origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub content: String,
    pub metadata: ChunkMetadata,
}

impl DocumentChunk {
    pub fn new(content: impl Into<String>, metadata: ChunkMetadata) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }
}

/// Why a file contributed nothing to a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// Extension is not pdf, csv or txt.
    Unsupported,
    /// Parsing or decoding failed.
    Failed(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Unsupported => write!(f, "unsupported file type"),
            SkipReason::Failed(msg) => write!(f, "{}", msg),
        }
    }
}

/// A skipped file and the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub source: String,
    pub reason: SkipReason,
}

/// Result of extracting a batch of uploads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Chunks in input-file order, then page/row order.
    pub chunks: Vec<DocumentChunk>,
    /// Files that were skipped, in input order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedFile>,
}

impl ExtractedDocument {
    /// Flatten to a single text blob: every chunk followed by a newline.
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity(self.chunks.iter().map(|c| c.content.len() + 1).sum());
        for chunk in &self.chunks {
            text.push_str(&chunk.content);
            text.push('\n');
        }
        text
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Extracts text from upload batches, memoising results.
pub struct DocumentExtractor {
    cache: Mutex<BatchCache>,
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl DocumentExtractor {
    /// Create an extractor whose cache holds up to `cache_capacity` batches.
    /// A capacity of 0 disables caching.
    pub fn new(cache_capacity: usize) -> Self {
        Self {
            cache: Mutex::new(BatchCache::new(cache_capacity)),
        }
    }

    /// Extract a batch, returning the cached result for an identical batch.
    pub fn extract(&self, files: &[UploadedFile]) -> ExtractedDocument {
        let key = BatchKey::from_files(files);

        if let Some(cached) = self.lock_cache().get(&key) {
            debug!("Using cached extraction for {} file(s)", files.len());
            return cached;
        }

        info!("Processing {} document(s)", files.len());
        let extracted = extract_batch(files);
        self.lock_cache().insert(key, extracted.clone());
        extracted
    }

    /// Number of batches currently cached.
    pub fn cache_len(&self) -> usize {
        self.lock_cache().len()
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    fn lock_cache(&self) -> MutexGuard<'_, BatchCache> {
        // A panic while holding the lock cannot leave the cache half-written
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Extract every file in order without touching the cache.
fn extract_batch(files: &[UploadedFile]) -> ExtractedDocument {
    let mut extracted = ExtractedDocument::default();

    for file in files {
        let source = file.normalized_name();
        match extract_file(&source, file) {
            Ok(chunks) => {
                info!("Processed {}: {}", file.kind().as_str().to_uppercase(), source);
                extracted.chunks.extend(chunks);
            }
            Err(ExtractionError::UnsupportedFileType(_)) => {
                warn!("Unsupported file type: {}", source);
                extracted.skipped.push(SkippedFile {
                    source,
                    reason: SkipReason::Unsupported,
                });
            }
            Err(e) => {
                error!(
                    "Error processing {} {}: {}",
                    file.kind().as_str().to_uppercase(),
                    source,
                    e
                );
                extracted.skipped.push(SkippedFile {
                    source,
                    reason: SkipReason::Failed(e.to_string()),
                });
            }
        }
    }

    extracted
}

/// Extract one file. All-or-nothing: a failure yields no chunks.
fn extract_file(source: &str, file: &UploadedFile) -> Result<Vec<DocumentChunk>, ExtractionError> {
    match file.kind() {
        FileKind::Pdf => pdf::extract_pdf(source, file.content()),
        FileKind::Csv => tabular::extract_csv(source, file.content()),
        FileKind::Text => plain::extract_text(source, file.content()),
        FileKind::Unsupported => Err(ExtractionError::UnsupportedFileType(source.to_string())),
    }
}
