//! Shared helper functions for CLI commands.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use super::icons;
use crate::extract::{
    DocumentExtractor, ExtractedDocument, SkipReason, SkippedFile, UploadedFile,
};
use crate::session::Session;

/// Files read from disk, plus the paths that could not be read.
#[derive(Debug, Default)]
pub struct Uploads {
    pub files: Vec<UploadedFile>,
    pub unreadable: Vec<SkippedFile>,
}

/// Read each path into an upload, expanding `~`.
///
/// Unreadable paths are logged and recorded; the batch only fails when
/// none of the paths could be read.
pub fn load_uploads(paths: &[PathBuf]) -> anyhow::Result<Uploads> {
    let mut uploads = Uploads::default();
    for path in paths {
        let expanded = expand_path(path);
        match UploadedFile::from_path(&expanded) {
            Ok(file) => uploads.files.push(file),
            Err(e) => {
                warn!("Error reading file {}: {}", expanded.display(), e);
                uploads.unreadable.push(SkippedFile {
                    source: expanded.display().to_string(),
                    reason: SkipReason::Failed(format!("Failed to read file: {}", e)),
                });
            }
        }
    }

    if uploads.files.is_empty() && !uploads.unreadable.is_empty() {
        anyhow::bail!(
            "None of the {} file(s) could be read",
            uploads.unreadable.len()
        );
    }
    Ok(uploads)
}

fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
}

/// Use the positional text when given, otherwise read all of stdin.
pub fn read_input(text: Option<String>) -> anyhow::Result<String> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read input from stdin")?;
            buf
        }
    };

    if text.trim().is_empty() {
        anyhow::bail!("No input text provided");
    }
    Ok(text)
}

/// Process uploads into the session's document context behind a spinner,
/// then report what was skipped, unreadable files included.
pub fn process_uploads(
    session: &mut Session,
    extractor: &DocumentExtractor,
    uploads: Uploads,
) -> anyhow::Result<ExtractedDocument> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Processing documents...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = session.process_documents(extractor, &uploads.files);
    pb.finish_and_clear();
    let mut extracted = result?;
    extracted.skipped.extend(uploads.unreadable);

    report_extraction(&extracted);
    Ok(extracted)
}

/// Print a one-line summary plus a line per skipped file.
pub fn report_extraction(extracted: &ExtractedDocument) {
    if extracted.is_empty() {
        println!("{} No text could be extracted", icons::warn());
    } else {
        println!(
            "{} Documents processed ({} chunks)",
            icons::success(),
            extracted.chunks.len()
        );
    }
    for skipped in &extracted.skipped {
        println!(
            "  {} Skipped {}: {}",
            icons::warn(),
            skipped.source,
            skipped.reason
        );
    }
}
