//! Prompt text for each task kind.

/// Fixed policy prepended to every persona-aware task.
pub const ETHICAL_GUIDELINES: &str = r#"
You MUST adhere to these guidelines:
1. Avoid harmful, unethical, or dangerous content
2. Reject requests for illegal activities or misinformation
3. Protect privacy - never reveal real personal data
4. Acknowledge limitations and uncertainties
5. Prevent bias in analysis and responses
6. Decline inappropriate medical/legal advice
7. Filter violent or graphic content descriptions
"#;

/// Extra policy appended to code-generation prompts.
pub const CODING_ETHICS: &str = "\nAdditional coding ethics:\n\
- Reject requests for malware/vulnerabilities\n\
- Avoid dangerous code patterns\n\
- Include safety comments";

/// Reply the model must give when documents do not contain the answer.
pub const NOT_IN_DOCUMENTS: &str = "Answer is not available in the documents.";

/// Suffix asking the model to continue a dialogue.
pub const DIALOGUE_SUFFIX: &str = "\n\nRespond to the conversation above.";

pub fn summarization(text: &str) -> String {
    format!(
        r#"
You are a summarising model. You will receive text and you will proceed to summarise the entire
text to the best of your ability. If it does not make sense, make that explicitly clear and ask
for more input rather than guessing. Summarise the following text:
{text}
"#
    )
}

pub fn sentiment_analysis(text: &str) -> String {
    format!(
        r#"
You are a sentiment analysis model. Analyze the sentiment of the following text as positive, negative,
or neutral to the best of your ability. If you are not able to classify a certain sentiment, propose another
sentiment that should make sense for this text:
{text}
"#
    )
}

pub fn named_entity_recognition(text: &str) -> String {
    format!(
        r#"
You are a Named Entity Recognition model. Extract and list the names, locations, and dates mentioned in the text
to the best of your ability. If you are unable to find named entities, explicitly mention this
in your output. Here is the text:
{text}
"#
    )
}

pub fn question_answering(context: &str, question: &str) -> String {
    format!(
        "\nYou are a simple question and answering model. Here is the context: {context}\n\nQuestion: {question}\n\nAnswer:\n"
    )
}

pub fn code_generation(description: &str, language: &str) -> String {
    format!(
        r#"
You are an excellent code generation model. You know how to solve the problems in code with high accuracy. If you think
there is some problem with the code and you can't seem to understand the context, ask for more information.
Generate {language} code for the following problem:
{description}
"#
    )
}

pub fn dialogue(history: &str) -> String {
    format!("{history}{DIALOGUE_SUFFIX}")
}

/// Retrieval-style prompt that keeps answers grounded in the documents.
pub fn document_qa(document_context: &str, question: &str) -> String {
    format!(
        r#"
{ETHICAL_GUIDELINES}

Answer the question in as much detail as possible from the provided context.
If the answer is not found in the provided context, reply: "{NOT_IN_DOCUMENTS}"
Context:
{document_context}
Question:
{question}
Answer:
"#
    )
}
