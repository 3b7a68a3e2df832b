//! Per-user session state.
//!
//! A [`Session`] owns everything one conversation needs: the selected
//! persona and provider, the dialogue history and the text of the most
//! recently processed documents. Sessions live in a [`SessionStore`] keyed
//! by a random id.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::extract::{DocumentExtractor, ExtractedDocument, UploadedFile};
use crate::history::{ConversationHistory, Role};
use crate::llm::{LlmError, LlmProvider, ModelClient};
use crate::prompt::{compose, Persona, Task};

/// Reply given to document questions before any documents are processed.
pub const NO_DOCUMENT_CONTEXT: &str = "No document context available.";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No files were uploaded")]
    NoFiles,

    #[error("Session not found: {0}")]
    NotFound(SessionId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub persona: Persona,
    pub provider: LlmProvider,
    pub history: ConversationHistory,
    /// Flattened text of the last processed batch; empty until one is processed
    pub document_context: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: SessionId, persona: Persona, provider: LlmProvider) -> Self {
        Self {
            id,
            persona,
            provider,
            history: ConversationHistory::new(),
            document_context: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn has_documents(&self) -> bool {
        !self.document_context.trim().is_empty()
    }

    /// Extract `files` and make their text this session's document context.
    ///
    /// The previous context is replaced, not merged. An empty upload leaves
    /// it untouched.
    pub fn process_documents(
        &mut self,
        extractor: &DocumentExtractor,
        files: &[UploadedFile],
    ) -> Result<ExtractedDocument, SessionError> {
        if files.is_empty() {
            return Err(SessionError::NoFiles);
        }

        let extracted = extractor.extract(files);
        self.document_context = extracted.to_text();
        info!(
            "Documents processed: {} chunk(s), {} skipped",
            extracted.chunks.len(),
            extracted.skipped.len()
        );
        Ok(extracted)
    }

    /// Run a single task with this session's persona and documents.
    pub async fn run_task(&self, client: &dyn ModelClient, task: &Task) -> Result<String, LlmError> {
        let prompt = compose(task, self.persona, &self.document_context);
        debug!("{} prompt: {} chars", task.name(), prompt.len());
        let response = client.generate_response(&prompt).await?;
        info!("{} performed.", task.name());
        Ok(response)
    }

    /// Add a user turn, ask the model to continue, and record its reply.
    ///
    /// On failure the user turn stays in the history and no assistant turn
    /// is added.
    pub async fn send_message(
        &mut self,
        client: &dyn ModelClient,
        message: &str,
    ) -> Result<String, LlmError> {
        self.history.append(Role::User, message);

        let task = Task::MultiTurnDialogue {
            history: self.history.render_text(),
        };
        let response = self.run_task(client, &task).await?;

        self.history.append(Role::Assistant, response.clone());
        Ok(response)
    }

    /// Answer a question strictly from the processed documents.
    pub async fn ask_documents(
        &self,
        client: &dyn ModelClient,
        question: &str,
    ) -> Result<String, LlmError> {
        if !self.has_documents() {
            return Ok(NO_DOCUMENT_CONTEXT.to_string());
        }

        let task = Task::DocumentQa {
            document_context: self.document_context.clone(),
            question: question.to_string(),
        };
        self.run_task(client, &task).await
    }
}

/// In-memory registry of live sessions.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<SessionId, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh session and return its id.
    pub fn create(&mut self, persona: Persona, provider: LlmProvider) -> SessionId {
        let id = SessionId::new();
        self.sessions.insert(id, Session::new(id, persona, provider));
        debug!("Created session {}", id);
        id
    }

    pub fn get(&self, id: &SessionId) -> Result<&Session, SessionError> {
        self.sessions.get(id).ok_or(SessionError::NotFound(*id))
    }

    pub fn get_mut(&mut self, id: &SessionId) -> Result<&mut Session, SessionError> {
        self.sessions.get_mut(id).ok_or(SessionError::NotFound(*id))
    }

    /// Return the session for `id`, creating it if needed.
    /// An existing session keeps its history and documents.
    pub fn get_or_create(
        &mut self,
        id: SessionId,
        persona: Persona,
        provider: LlmProvider,
    ) -> &mut Session {
        self.sessions
            .entry(id)
            .or_insert_with(|| Session::new(id, persona, provider))
    }

    /// Destroy a session, returning it if it existed.
    pub fn remove(&mut self, id: &SessionId) -> Option<Session> {
        let removed = self.sessions.remove(id);
        if removed.is_some() {
            debug!("Removed session {}", id);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records prompts and answers from a script.
    struct ScriptedClient {
        prompts: Mutex<Vec<String>>,
        reply: Result<String, u16>,
    }

    impl ScriptedClient {
        fn replying(text: &str) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                reply: Ok(text.to_string()),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                reply: Err(status),
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedClient {
        fn provider(&self) -> LlmProvider {
            LlmProvider::Groq
        }

        fn model(&self) -> &str {
            "scripted"
        }

        async fn generate_response(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    body: "failure".to_string(),
                }),
            }
        }

        async fn list_models(&self) -> Result<Vec<String>, LlmError> {
            Ok(vec!["scripted".to_string()])
        }
    }

    fn session() -> Session {
        Session::new(SessionId::new(), Persona::None, LlmProvider::Groq)
    }

    #[tokio::test]
    async fn test_send_message_records_both_turns() {
        let client = ScriptedClient::replying("Hi there!");
        let mut session = session();

        let reply = session.send_message(&client, "Hello").await.unwrap();
        assert_eq!(reply, "Hi there!");
        assert_eq!(session.history.render_text(), "User: Hello\nAssistant: Hi there!");
        assert_eq!(
            client.prompts(),
            vec!["User: Hello\n\nRespond to the conversation above.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_send_message_failure_keeps_user_turn() {
        let client = ScriptedClient::failing(500);
        let mut session = session();

        let err = session.send_message(&client, "Hello").await.unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 500, .. }));
        assert_eq!(session.history.len(), 1);
        assert_eq!(session.history.messages()[0].role, Role::User);
    }

    #[tokio::test]
    async fn test_ask_documents_without_context() {
        let client = ScriptedClient::replying("unused");
        let session = session();

        let answer = session.ask_documents(&client, "What?").await.unwrap();
        assert_eq!(answer, NO_DOCUMENT_CONTEXT);
        assert!(client.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_run_task_uses_document_context() {
        let client = ScriptedClient::replying("summary");
        let extractor = DocumentExtractor::new(0);
        let mut session = session();
        session
            .process_documents(&extractor, &[UploadedFile::new("notes.txt", "Quarterly numbers")])
            .unwrap();

        let task = Task::Summarization {
            text: "Summarise please".to_string(),
        };
        session.run_task(&client, &task).await.unwrap();

        let prompts = client.prompts();
        assert!(prompts[0].ends_with("Document Context:\nQuarterly numbers\n"));
    }

    #[test]
    fn test_process_documents_requires_files() {
        let extractor = DocumentExtractor::default();
        let mut session = session();
        session.document_context = "previous".to_string();

        let result = session.process_documents(&extractor, &[]);
        assert!(matches!(result, Err(SessionError::NoFiles)));
        assert_eq!(session.document_context, "previous");
    }

    #[test]
    fn test_process_documents_replaces_context() {
        let extractor = DocumentExtractor::default();
        let mut session = session();

        session
            .process_documents(&extractor, &[UploadedFile::new("a.txt", "first")])
            .unwrap();
        session
            .process_documents(&extractor, &[UploadedFile::new("b.txt", "second")])
            .unwrap();
        assert_eq!(session.document_context, "second\n");
    }

    #[test]
    fn test_store_lifecycle() {
        let mut store = SessionStore::new();
        let id = store.create(Persona::Casual, LlmProvider::Gemini);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id).unwrap().persona, Persona::Casual);

        store.get_mut(&id).unwrap().history.append(Role::User, "kept");
        let session = store.get_or_create(id, Persona::Formal, LlmProvider::Groq);
        assert_eq!(session.history.len(), 1);
        assert_eq!(session.persona, Persona::Casual);

        assert!(store.remove(&id).is_some());
        assert!(store.remove(&id).is_none());
        assert!(matches!(store.get(&id), Err(SessionError::NotFound(_))));
        assert!(store.is_empty());
    }
}
