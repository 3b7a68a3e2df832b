//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod chat;
mod extract;
mod models;
mod normalize;
mod tasks;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::helpers;
use crate::config::{ApiKeys, Config};
use crate::extract::DocumentExtractor;
use crate::llm::{build_client, LlmProvider, ModelClient};
use crate::prompt::Persona;
use crate::session::{SessionId, SessionStore};

#[derive(Parser)]
#[command(name = "docprompt")]
#[command(about = "Document-aware prompts for hosted language models")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Model provider to use
    #[arg(short, long, global = true, value_enum)]
    model: Option<LlmProvider>,

    /// Response persona: Formal, Professional, Casual or None
    #[arg(short, long, global = true)]
    persona: Option<String>,

    /// Document to use as context (pdf, csv or txt; repeatable)
    #[arg(short = 'f', long = "file", global = true)]
    files: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise text (reads stdin when TEXT is omitted)
    Summarize { text: Option<String> },

    /// Classify the sentiment of text
    Sentiment { text: Option<String> },

    /// List names, locations and dates found in text
    Ner { text: Option<String> },

    /// Answer a question about a given context
    Qa {
        /// Context the answer should come from
        #[arg(long)]
        context: String,
        /// Question to answer
        #[arg(long)]
        question: String,
    },

    /// Generate code for a problem description
    Code {
        /// Target language (Python, JavaScript, Java, C++ or any other)
        #[arg(short, long, default_value = "Python")]
        language: String,
        description: Option<String>,
    },

    /// Answer a question strictly from the uploaded documents
    #[command(name = "doc-qa")]
    DocQa { question: String },

    /// Interactive multi-turn conversation
    Chat,

    /// Show the text extracted from documents
    Extract {
        /// Files to extract
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Clean text: strip punctuation, lowercase, drop stopwords
    Normalize {
        text: Option<String>,
        /// Keep stopwords
        #[arg(long)]
        keep_stopwords: bool,
        /// Print one token per line
        #[arg(long)]
        tokens: bool,
    },

    /// Show model configuration and list available models
    Models,
}

/// Everything a command needs for one run.
pub(super) struct AppContext {
    pub config: Config,
    pub keys: ApiKeys,
    pub extractor: DocumentExtractor,
    pub sessions: SessionStore,
    pub session_id: SessionId,
    pub client: Box<dyn ModelClient>,
}

pub async fn run() -> anyhow::Result<()> {
    let Cli {
        config: config_path,
        model,
        persona,
        files,
        command,
        ..
    } = Cli::parse();

    let config = Config::load(config_path.as_deref()).await?;

    match command {
        // Local commands never reach a model
        Commands::Extract { files, json } => {
            let extractor = DocumentExtractor::new(config.extraction.cache_capacity);
            extract::cmd_extract(&extractor, &files, json)
        }
        Commands::Normalize {
            text,
            keep_stopwords,
            tokens,
        } => normalize::cmd_normalize(text, keep_stopwords, tokens),

        Commands::Summarize { text } => {
            let ctx = connect(config, model, persona.as_deref(), &files)?;
            tasks::cmd_summarize(&ctx, text).await
        }
        Commands::Sentiment { text } => {
            let ctx = connect(config, model, persona.as_deref(), &files)?;
            tasks::cmd_sentiment(&ctx, text).await
        }
        Commands::Ner { text } => {
            let ctx = connect(config, model, persona.as_deref(), &files)?;
            tasks::cmd_ner(&ctx, text).await
        }
        Commands::Qa { context, question } => {
            let ctx = connect(config, model, persona.as_deref(), &files)?;
            tasks::cmd_qa(&ctx, context, question).await
        }
        Commands::Code {
            language,
            description,
        } => {
            let ctx = connect(config, model, persona.as_deref(), &files)?;
            tasks::cmd_code(&ctx, language, description).await
        }
        Commands::DocQa { question } => {
            let ctx = connect(config, model, persona.as_deref(), &files)?;
            tasks::cmd_doc_qa(&ctx, &question).await
        }
        Commands::Chat => {
            let mut ctx = connect(config, model, persona.as_deref(), &files)?;
            chat::cmd_chat(&mut ctx).await
        }
        Commands::Models => {
            let ctx = connect(config, model, persona.as_deref(), &files)?;
            models::cmd_models(&ctx).await
        }
    }
}

/// Build the client and session a model command runs against, loading any
/// `--file` documents into the session.
fn connect(
    config: Config,
    model: Option<LlmProvider>,
    persona: Option<&str>,
    files: &[PathBuf],
) -> anyhow::Result<AppContext> {
    // Both providers must be usable before any model command runs
    let keys = ApiKeys::from_env();
    keys.require_all()?;

    let provider = model.unwrap_or(config.llm.default_provider);
    let persona = persona
        .map(Persona::from_label)
        .unwrap_or(config.default_persona);

    let client = build_client(provider, &config.llm, &keys)?;
    let extractor = DocumentExtractor::new(config.extraction.cache_capacity);
    let mut sessions = SessionStore::new();
    let session_id = sessions.create(persona, provider);

    if !files.is_empty() {
        let uploads = helpers::load_uploads(files)?;
        let session = sessions.get_mut(&session_id)?;
        helpers::process_uploads(session, &extractor, uploads)?;
    }

    Ok(AppContext {
        config,
        keys,
        extractor,
        sessions,
        session_id,
        client,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "docprompt", "--model", "groq", "--persona", "Casual", "-f", "a.pdf", "-f", "b.csv",
            "summarize", "Some text",
        ])
        .unwrap();
        assert_eq!(cli.model, Some(LlmProvider::Groq));
        assert_eq!(cli.persona.as_deref(), Some("Casual"));
        assert_eq!(cli.files.len(), 2);
        assert!(matches!(cli.command, Commands::Summarize { text: Some(_) }));
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["docprompt", "doc-qa", "When is the launch?"]).unwrap();
        assert!(matches!(cli.command, Commands::DocQa { .. }));

        let cli = Cli::try_parse_from(["docprompt", "code", "-l", "Rust", "fizzbuzz"]).unwrap();
        match cli.command {
            Commands::Code {
                language,
                description,
            } => {
                assert_eq!(language, "Rust");
                assert_eq!(description.as_deref(), Some("fizzbuzz"));
            }
            _ => panic!("expected code command"),
        }

        assert!(Cli::try_parse_from(["docprompt", "extract"]).is_err());
        assert!(Cli::try_parse_from(["docprompt", "--model", "ollama", "chat"]).is_err());
    }
}
