//! Chat messages. Immutable once created.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::SourceRef;

/// Text shown in place of an answer when the request fails.
pub const ERROR_FALLBACK_TEXT: &str = "Error fetching answer.";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceRef>,
}

impl Message {
    fn new(role: Role, content: String, sources: Vec<SourceRef>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content,
            timestamp: Utc::now(),
            sources,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content.into(), Vec::new())
    }

    pub fn assistant(content: impl Into<String>, sources: Vec<SourceRef>) -> Self {
        Self::new(Role::Assistant, content.into(), sources)
    }

    /// The static assistant reply used when a request fails.
    pub fn error_fallback() -> Self {
        Self::assistant(ERROR_FALLBACK_TEXT, Vec::new())
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}
