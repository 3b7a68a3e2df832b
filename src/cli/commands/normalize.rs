//! Text cleanup from the command line.

use crate::cli::helpers::read_input;
use crate::text::{normalize_text, remove_special_characters, remove_stopwords, tokenize_text};

/// Strip special characters, normalise case and spacing, then drop stopwords.
fn clean(text: &str, keep_stopwords: bool) -> String {
    let cleaned = normalize_text(&remove_special_characters(text));
    if keep_stopwords {
        cleaned
    } else {
        remove_stopwords(&cleaned)
    }
}

pub fn cmd_normalize(text: Option<String>, keep_stopwords: bool, tokens: bool) -> anyhow::Result<()> {
    let cleaned = clean(&read_input(text)?, keep_stopwords);
    if tokens {
        for token in tokenize_text(&cleaned) {
            println!("{}", token);
        }
    } else {
        println!("{}", cleaned);
    }
    Ok(())
}
