//! # Conversation State Store
//!
//! ```text
//! ChatState
//! ├── messages: Vec<Message>               // working sequence on screen
//! ├── current_conversation_id: Option<_>   // None = fresh, unsaved thread
//! └── repository: Box<dyn ConversationRepository>
//!         └── conversations, newest first
//! ```
//!
//! The active sequence is written through to the stored conversation it
//! belongs to. Nothing else touches stored messages.

use std::fmt;
use std::io;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::core::message::Message;

/// Titles keep this many characters of the first question.
pub const TITLE_MAX_CHARS: usize = 30;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// A new conversation seeded with its first message.
    pub fn start(first_message: &Message) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: derive_title(&first_message.content),
            messages: vec![first_message.clone()],
            created_at: now,
            updated_at: now,
        }
    }

    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            message_count: self.messages.len(),
            updated_at: self.updated_at,
        }
    }
}

/// Lightweight listing entry for the sidebar.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ConversationSummary {
    pub id: String,
    pub title: String,
    pub message_count: usize,
    pub updated_at: DateTime<Utc>,
}

/// First `TITLE_MAX_CHARS` characters, with `...` only when something was cut.
pub fn derive_title(question: &str) -> String {
    let mut chars = question.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

// ============================================================================
// Repository
// ============================================================================

#[derive(Debug)]
pub enum RepositoryError {
    Io(io::Error),
    Serde(serde_json::Error),
    NotFound(String),
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryError::Io(e) => write!(f, "storage I/O error: {e}"),
            RepositoryError::Serde(e) => write!(f, "storage format error: {e}"),
            RepositoryError::NotFound(id) => write!(f, "no conversation with id {id}"),
        }
    }
}

impl std::error::Error for RepositoryError {}

impl From<io::Error> for RepositoryError {
    fn from(e: io::Error) -> Self {
        RepositoryError::Io(e)
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(e: serde_json::Error) -> Self {
        RepositoryError::Serde(e)
    }
}

/// Where conversations live. Ordering is newest-first by creation.
pub trait ConversationRepository {
    fn list(&self) -> Vec<ConversationSummary>;

    fn get(&self, id: &str) -> Option<Conversation>;

    /// Add a conversation at the head of the index.
    fn insert_front(&mut self, conversation: Conversation) -> Result<(), RepositoryError>;

    /// Append one message to a stored conversation and bump `updated_at`.
    fn append(&mut self, id: &str, message: Message) -> Result<(), RepositoryError>;
}

/// Process-lifetime storage. Also the cache behind the file repository.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    conversations: Vec<Conversation>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from already-ordered conversations (newest first).
    pub fn from_conversations(conversations: Vec<Conversation>) -> Self {
        Self { conversations }
    }

    pub(crate) fn get_ref(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }
}

impl ConversationRepository for InMemoryRepository {
    fn list(&self) -> Vec<ConversationSummary> {
        self.conversations.iter().map(Conversation::summary).collect()
    }

    fn get(&self, id: &str) -> Option<Conversation> {
        self.get_ref(id).cloned()
    }

    fn insert_front(&mut self, conversation: Conversation) -> Result<(), RepositoryError> {
        self.conversations.insert(0, conversation);
        Ok(())
    }

    fn append(&mut self, id: &str, message: Message) -> Result<(), RepositoryError> {
        let conversation = self
            .conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        conversation.updated_at = message.timestamp;
        conversation.messages.push(message);
        Ok(())
    }
}

// ============================================================================
// Active state
// ============================================================================

pub struct ChatState {
    pub messages: Vec<Message>,
    pub current_conversation_id: Option<String>,
    repository: Box<dyn ConversationRepository>,
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new(Box::new(InMemoryRepository::new()))
    }
}

impl ChatState {
    pub fn new(repository: Box<dyn ConversationRepository>) -> Self {
        Self {
            messages: Vec::new(),
            current_conversation_id: None,
            repository,
        }
    }

    /// Conversation index, newest first.
    pub fn conversations(&self) -> Vec<ConversationSummary> {
        self.repository.list()
    }

    /// Push to the active sequence, writing through to the active conversation.
    pub fn append_message(&mut self, message: Message) {
        if let Some(id) = &self.current_conversation_id
            && let Err(e) = self.repository.append(id, message.clone())
        {
            warn!("Failed to store message in conversation {id}: {e}");
        }
        self.messages.push(message);
    }

    /// Materialize a conversation for the current thread and make it active.
    /// Returns the new conversation's id.
    pub fn start_conversation(&mut self, first_message: &Message) -> String {
        let conversation = Conversation::start(first_message);
        let id = conversation.id.clone();
        debug!("Starting conversation {id}: {:?}", conversation.title);
        if let Err(e) = self.repository.insert_front(conversation) {
            warn!("Failed to store new conversation {id}: {e}");
        }
        self.current_conversation_id = Some(id.clone());
        id
    }

    /// Load a stored conversation into the active sequence.
    /// Unknown ids are ignored; returns whether anything changed.
    pub fn select_conversation(&mut self, id: &str) -> bool {
        let Some(conversation) = self.repository.get(id) else {
            debug!("Ignoring selection of unknown conversation {id}");
            return false;
        };
        self.messages = conversation.messages;
        self.current_conversation_id = Some(conversation.id);
        true
    }

    /// Detach from the current conversation without deleting anything.
    pub fn new_chat(&mut self) {
        self.messages.clear();
        self.current_conversation_id = None;
    }
}
