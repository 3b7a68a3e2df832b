//! Document extraction preview.

use std::path::PathBuf;

use console::style;

use crate::cli::helpers;
use crate::extract::{ChunkMetadata, DocumentExtractor, ExtractedDocument};

fn location(metadata: &ChunkMetadata) -> String {
    match (metadata.page, metadata.row) {
        (Some(page), _) => format!("{} p.{}", metadata.source, page),
        (_, Some(row)) => format!("{} row {}", metadata.source, row),
        _ => metadata.source.clone(),
    }
}

fn print_text(extracted: &ExtractedDocument) {
    for chunk in &extracted.chunks {
        println!("{}", style(format!("[{}]", location(&chunk.metadata))).dim());
        println!("{}", chunk.content);
    }
    helpers::report_extraction(extracted);
}

pub fn cmd_extract(
    extractor: &DocumentExtractor,
    files: &[PathBuf],
    json: bool,
) -> anyhow::Result<()> {
    let uploads = helpers::load_uploads(files)?;
    let mut extracted = extractor.extract(&uploads.files);
    extracted.skipped.extend(uploads.unreadable);

    if json {
        println!("{}", serde_json::to_string_pretty(&extracted)?);
    } else {
        print_text(&extracted);
    }
    Ok(())
}
