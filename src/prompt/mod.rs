//! Prompt assembly.
//!
//! Persona-aware tasks are layered in a fixed order:
//! 1. the task's base template
//! 2. the ethical guidelines, prepended so they are read first
//! 3. the persona's tone instruction, prepended
//! 4. the document context, appended when it is not blank
//!
//! Dialogue only gets the persona layer. Document QA uses its own
//! retrieval template and skips persona and context layering.

mod persona;
pub mod templates;

pub use persona::{apply_persona, Persona};
pub use templates::{ETHICAL_GUIDELINES, NOT_IN_DOCUMENTS};

/// A task and the fields its template needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Summarization {
        text: String,
    },
    SentimentAnalysis {
        text: String,
    },
    NamedEntityRecognition {
        text: String,
    },
    QuestionAnswering {
        context: String,
        question: String,
    },
    CodeGeneration {
        description: String,
        language: String,
    },
    /// `history` is the rendered conversation so far.
    MultiTurnDialogue {
        history: String,
    },
    DocumentQa {
        document_context: String,
        question: String,
    },
}

impl Task {
    /// Human-readable name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Task::Summarization { .. } => "Summarization",
            Task::SentimentAnalysis { .. } => "Sentiment analysis",
            Task::NamedEntityRecognition { .. } => "NER",
            Task::QuestionAnswering { .. } => "Question Answering",
            Task::CodeGeneration { .. } => "Code Generation",
            Task::MultiTurnDialogue { .. } => "Multi-turn dialogue",
            Task::DocumentQa { .. } => "Document QA",
        }
    }

    /// Base template before any layering.
    fn base_prompt(&self) -> String {
        match self {
            Task::Summarization { text } => templates::summarization(text),
            Task::SentimentAnalysis { text } => templates::sentiment_analysis(text),
            Task::NamedEntityRecognition { text } => templates::named_entity_recognition(text),
            Task::QuestionAnswering { context, question } => {
                templates::question_answering(context, question)
            }
            Task::CodeGeneration {
                description,
                language,
            } => templates::code_generation(description, language) + templates::CODING_ETHICS,
            Task::MultiTurnDialogue { history } => templates::dialogue(history),
            Task::DocumentQa {
                document_context,
                question,
            } => templates::document_qa(document_context, question),
        }
    }
}

/// Prepend the fixed ethical policy.
pub fn apply_ethical_guidelines(prompt: &str) -> String {
    format!("{}\n\n{}", ETHICAL_GUIDELINES, prompt)
}

/// Append document context as a labelled trailing section, unless it is blank.
pub fn add_document_context(prompt: &str, document_context: &str) -> String {
    if document_context.trim().is_empty() {
        return prompt.to_string();
    }
    format!("{}\n\nDocument Context:\n{}", prompt, document_context)
}

/// Build the exact string sent to the model for `task`.
pub fn compose(task: &Task, persona: Persona, document_context: &str) -> String {
    let base = task.base_prompt();
    match task {
        Task::DocumentQa { .. } => base,
        Task::MultiTurnDialogue { .. } => apply_persona(&base, persona),
        _ => add_document_context(
            &apply_persona(&apply_ethical_guidelines(&base), persona),
            document_context,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summarize(text: &str) -> Task {
        Task::Summarization {
            text: text.to_string(),
        }
    }

    #[test]
    fn test_layer_order() {
        let prompt = compose(&summarize("The text."), Persona::Casual, "Doc body");

        assert!(prompt.starts_with("Answer casually: "));
        let ethics = prompt.find("You MUST adhere").unwrap();
        let body = prompt.find("The text.").unwrap();
        let context = prompt.find("\n\nDocument Context:\nDoc body").unwrap();
        assert!(ethics < body && body < context);
        assert!(prompt.ends_with("Doc body"));
    }

    #[test]
    fn test_exact_composition() {
        let task = summarize("x");
        let expected = format!(
            "Please respond in a formal tone. {}\n\n{}\n\nDocument Context:\nctx",
            ETHICAL_GUIDELINES,
            templates::summarization("x")
        );
        assert_eq!(compose(&task, Persona::Formal, "ctx"), expected);
    }

    #[test]
    fn test_blank_context_is_not_appended() {
        let task = summarize("x");
        let bare = compose(&task, Persona::None, "");
        assert_eq!(compose(&task, Persona::None, "  \n\t "), bare);
        assert!(!bare.contains("Document Context:"));
    }

    #[test]
    fn test_add_document_context() {
        assert_eq!(add_document_context("p", "   "), "p");
        assert_eq!(add_document_context("p", "c"), "p\n\nDocument Context:\nc");
        // Context is appended verbatim, not trimmed
        assert_eq!(add_document_context("p", " c\n"), "p\n\nDocument Context:\n c\n");
    }

    #[test]
    fn test_code_generation_includes_coding_ethics() {
        let task = Task::CodeGeneration {
            description: "reverse a list".to_string(),
            language: "Python".to_string(),
        };
        let prompt = compose(&task, Persona::None, "");
        assert!(prompt.contains("Generate Python code"));
        assert!(prompt.contains("Reject requests for malware/vulnerabilities"));
        assert!(prompt.starts_with(ETHICAL_GUIDELINES));
    }

    #[test]
    fn test_question_answering_template() {
        let task = Task::QuestionAnswering {
            context: "Paris is in France.".to_string(),
            question: "Where is Paris?".to_string(),
        };
        let prompt = compose(&task, Persona::None, "");
        assert!(prompt.contains("Here is the context: Paris is in France."));
        assert!(prompt.contains("Question: Where is Paris?\n\nAnswer:"));
    }

    #[test]
    fn test_dialogue_gets_persona_only() {
        let task = Task::MultiTurnDialogue {
            history: "User: Hello".to_string(),
        };
        let prompt = compose(&task, Persona::Casual, "ignored context");
        assert_eq!(
            prompt,
            "Answer casually: User: Hello\n\nRespond to the conversation above."
        );
    }

    #[test]
    fn test_document_qa_bypasses_persona_and_context_layers() {
        let task = Task::DocumentQa {
            document_context: "The launch is on Friday.".to_string(),
            question: "When is the launch?".to_string(),
        };
        let prompt = compose(&task, Persona::Formal, "other context");

        assert!(!prompt.starts_with("Please respond in a formal tone."));
        assert!(!prompt.contains("Document Context:"));
        assert!(prompt.contains("You MUST adhere"));
        assert!(prompt.contains("Context:\nThe launch is on Friday.\nQuestion:\nWhen is the launch?"));
        assert!(prompt.contains(NOT_IN_DOCUMENTS));
    }
}
