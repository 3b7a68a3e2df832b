//! docprompt - document-aware prompts for hosted language models.
//!
//! Extracts text from uploaded PDF, CSV and plain-text files, layers it with
//! an ethics policy and a persona into task prompts, and sends those prompts
//! to Gemini or Groq.

pub mod cli;
pub mod config;
pub mod extract;
pub mod history;
pub mod llm;
pub mod prompt;
pub mod session;
pub mod text;
