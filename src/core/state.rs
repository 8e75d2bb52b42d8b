//! # Application State
//!
//! Core business state. No TUI types here; presentation state lives in
//! the `tui` module.
//!
//! ```text
//! App
//! ├── endpoint: Arc<dyn AnswerEndpoint>   // the RAG service
//! ├── chat: ChatState                     // active messages + conversation index
//! ├── is_loading: bool                    // a request is in flight
//! ├── pending: Option<PendingRequest>     // id + cancel token of that request
//! ├── status_message: String              // title bar text
//! ├── endpoint_healthy: Option<bool>      // None until the probe reports
//! └── top_k: u32                          // passages requested per question
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::api::AnswerEndpoint;
use crate::core::config::ResolvedConfig;
use crate::core::store::ChatState;

/// The one request allowed in flight.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub id: u64,
    pub cancel: CancellationToken,
}

/// Everything the I/O layer needs to run a request.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    pub id: u64,
    pub question: String,
    pub top_k: u32,
    pub cancel: CancellationToken,
}

pub struct App {
    pub endpoint: Arc<dyn AnswerEndpoint>,
    pub chat: ChatState,
    pub is_loading: bool,
    pub pending: Option<PendingRequest>,
    pub status_message: String,
    pub endpoint_healthy: Option<bool>,
    pub top_k: u32,
    next_request_id: u64,
}

impl App {
    pub fn new(endpoint: Arc<dyn AnswerEndpoint>, chat: ChatState, top_k: u32) -> Self {
        Self {
            endpoint,
            chat,
            is_loading: false,
            pending: None,
            status_message: String::from("Ready"),
            endpoint_healthy: None,
            top_k,
            next_request_id: 1,
        }
    }

    pub fn from_config(
        endpoint: Arc<dyn AnswerEndpoint>,
        chat: ChatState,
        config: &ResolvedConfig,
    ) -> Self {
        Self::new(endpoint, chat, config.top_k)
    }

    /// Register a new in-flight request and hand back its ticket.
    pub(crate) fn begin_request(&mut self, question: String) -> RequestTicket {
        let id = self.next_request_id;
        self.next_request_id += 1;
        let cancel = CancellationToken::new();
        self.pending = Some(PendingRequest {
            id,
            cancel: cancel.clone(),
        });
        self.is_loading = true;
        RequestTicket {
            id,
            question,
            top_k: self.top_k,
            cancel,
        }
    }

    /// Forget the in-flight request, returning its token so the caller can fire it.
    pub(crate) fn abandon_request(&mut self) -> Option<CancellationToken> {
        self.is_loading = false;
        self.pending.take().map(|p| p.cancel)
    }
}
