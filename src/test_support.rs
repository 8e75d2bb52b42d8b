//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::api::{AnswerEndpoint, AskError, AskResponse};
use crate::core::state::App;
use crate::core::store::ChatState;

/// An endpoint that answers every question with a fixed reply.
pub struct StubEndpoint {
    pub answer: String,
}

#[async_trait]
impl AnswerEndpoint for StubEndpoint {
    fn name(&self) -> &str {
        "stub"
    }

    async fn ask(
        &self,
        question: &str,
        _top_k: u32,
        _cancel: CancellationToken,
    ) -> Result<AskResponse, AskError> {
        Ok(AskResponse {
            answer: self.answer.clone(),
            sources: Vec::new(),
            latency_seconds: 0.0,
            question: Some(question.to_string()),
        })
    }
}

/// An endpoint that is always down.
pub struct FailingEndpoint;

#[async_trait]
impl AnswerEndpoint for FailingEndpoint {
    fn name(&self) -> &str {
        "failing"
    }

    async fn ask(
        &self,
        _question: &str,
        _top_k: u32,
        _cancel: CancellationToken,
    ) -> Result<AskResponse, AskError> {
        Err(AskError::Transport {
            status: None,
            message: "connection refused".to_string(),
        })
    }

    async fn health(&self) -> Result<(), AskError> {
        Err(AskError::Transport {
            status: None,
            message: "connection refused".to_string(),
        })
    }
}

/// Creates a test App with an in-memory store and a stub endpoint.
pub fn test_app() -> App {
    App::new(
        Arc::new(StubEndpoint {
            answer: "stub answer".to_string(),
        }),
        ChatState::default(),
        crate::api::DEFAULT_TOP_K,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_endpoint_echoes_question() {
        let endpoint = StubEndpoint {
            answer: "42".to_string(),
        };
        let response =
            tokio_test::block_on(endpoint.ask("meaning?", 3, CancellationToken::new())).unwrap();
        assert_eq!(response.answer, "42");
        assert_eq!(response.question.as_deref(), Some("meaning?"));
    }

    #[test]
    fn failing_endpoint_reports_unhealthy() {
        assert!(tokio_test::block_on(FailingEndpoint.health()).is_err());
    }
}
