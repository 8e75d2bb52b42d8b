use std::fmt;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::types::AskResponse;

/// Errors that can occur while asking the endpoint a question.
///
/// The conversation layer treats `Transport` and `Decode` the same way
/// (a static fallback message); the split exists for logs and tests.
#[derive(Debug, Clone, PartialEq)]
pub enum AskError {
    /// The request could not complete, or the server answered with a
    /// non-success status (`status` is set in that case).
    Transport { status: Option<u16>, message: String },
    /// The body was not the expected JSON shape.
    Decode(String),
    /// The caller abandoned the request before it resolved.
    Cancelled,
}

impl fmt::Display for AskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AskError::Transport {
                status: Some(status),
                message,
            } => write!(f, "endpoint returned HTTP {status}: {message}"),
            AskError::Transport {
                status: None,
                message,
            } => write!(f, "transport error: {message}"),
            AskError::Decode(msg) => write!(f, "decode error: {msg}"),
            AskError::Cancelled => write!(f, "request cancelled"),
        }
    }
}

impl std::error::Error for AskError {}

/// The question-answering service, seen from the client side.
#[async_trait]
pub trait AnswerEndpoint: Send + Sync {
    /// Short label for logs and the title bar.
    fn name(&self) -> &str;

    /// Ask one question. A single attempt: no retry, no caching.
    ///
    /// Resolves to `AskError::Cancelled` as soon as `cancel` fires.
    async fn ask(
        &self,
        question: &str,
        top_k: u32,
        cancel: CancellationToken,
    ) -> Result<AskResponse, AskError>;

    /// Reachability probe. Endpoints without a health route report healthy.
    async fn health(&self) -> Result<(), AskError> {
        Ok(())
    }
}
