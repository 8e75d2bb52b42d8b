//! # Actions
//!
//! Everything that can happen in the conversation becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! The endpoint answers? That's `Action::AnswerReady { .. }`.
//!
//! `update()` applies an action to the state and returns the `Effect` the
//! I/O layer must carry out. No network or terminal access happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! ## Lifecycle
//!
//! ```text
//!        Submit (non-empty, idle)
//!  Idle ─────────────────────────▶ AwaitingResponse
//!   ▲                                  │
//!   │  AnswerReady(Ok)  → answer       │
//!   │  AnswerReady(Err) → fallback     │
//!   └──────────────────────────────────┘
//! ```
//!
//! `NewChat` and switching conversations while awaiting cancel the request;
//! its late answer, if any, is dropped by request id.

use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use crate::api::{AskError, AskResponse};
use crate::core::message::Message;
use crate::core::state::{App, RequestTicket};

#[derive(Debug)]
pub enum Action {
    Submit(String),
    AnswerReady {
        request_id: u64,
        result: Result<AskResponse, AskError>,
    },
    NewChat,
    SelectConversation(String),
    EndpointHealth(bool),
    Quit,
}

#[derive(Debug)]
pub enum Effect {
    None,
    SpawnRequest(RequestTicket),
    CancelRequest(CancellationToken),
    Quit,
}

impl Effect {
    fn cancel(token: Option<CancellationToken>) -> Self {
        token.map_or(Effect::None, Effect::CancelRequest)
    }
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => submit(app, &text),
        Action::AnswerReady { request_id, result } => answer_ready(app, request_id, result),
        Action::NewChat => {
            let token = app.abandon_request();
            app.chat.new_chat();
            app.status_message = String::from("New chat");
            Effect::cancel(token)
        }
        Action::SelectConversation(id) => {
            if app.chat.current_conversation_id.as_deref() == Some(id.as_str()) {
                return Effect::None;
            }
            if !app.chat.select_conversation(&id) {
                return Effect::None;
            }
            app.status_message = String::from("Conversation loaded");
            Effect::cancel(app.abandon_request())
        }
        Action::EndpointHealth(healthy) => {
            app.endpoint_healthy = Some(healthy);
            Effect::None
        }
        Action::Quit => {
            let token = app.abandon_request();
            if let Some(token) = token {
                token.cancel();
            }
            Effect::Quit
        }
    }
}

fn submit(app: &mut App, text: &str) -> Effect {
    let question = text.trim();
    if question.is_empty() {
        debug!("Ignoring empty submission");
        return Effect::None;
    }
    if app.is_loading {
        debug!("Ignoring submission while a request is in flight");
        return Effect::None;
    }

    let message = Message::user(question);
    app.chat.append_message(message.clone());
    if app.chat.current_conversation_id.is_none() {
        app.chat.start_conversation(&message);
    }

    app.status_message = String::from("Thinking...");
    let ticket = app.begin_request(question.to_string());
    info!("Submitting question (request_id={})", ticket.id);
    Effect::SpawnRequest(ticket)
}

fn answer_ready(app: &mut App, request_id: u64, result: Result<AskResponse, AskError>) -> Effect {
    let expected = app.pending.as_ref().map(|p| p.id);
    if expected != Some(request_id) {
        debug!("Discarding stale response (request_id={request_id}, expected={expected:?})");
        return Effect::None;
    }
    app.pending = None;
    app.is_loading = false;

    match result {
        Ok(response) => {
            let malformed = response.malformed_count();
            if malformed > 0 {
                debug!("Dropped {malformed} malformed source entries");
            }
            let sources = response.valid_sources();
            info!(
                "Answer received (request_id={request_id}, sources={}, latency={:.2}s)",
                sources.len(),
                response.latency_seconds
            );
            app.chat
                .append_message(Message::assistant(response.answer, sources));
            app.status_message = format!("Answered in {:.2}s", response.latency_seconds);
        }
        Err(AskError::Cancelled) => {
            debug!("Request {request_id} resolved as cancelled");
            app.status_message = String::from("Cancelled");
        }
        Err(e) => {
            warn!("Error getting response: {e}");
            app.chat.append_message(Message::error_fallback());
            app.status_message = String::from("Request failed");
        }
    }
    Effect::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{SourceEntry, SourceRef};
    use crate::core::message::{ERROR_FALLBACK_TEXT, Role};
    use crate::test_support::test_app;

    fn ok_response(answer: &str) -> AskResponse {
        AskResponse {
            answer: answer.to_string(),
            sources: vec![],
            latency_seconds: 0.5,
            question: None,
        }
    }

    fn submit_ticket(app: &mut App, text: &str) -> RequestTicket {
        match update(app, Action::Submit(text.to_string())) {
            Effect::SpawnRequest(ticket) => ticket,
            other => panic!("expected SpawnRequest, got {other:?}"),
        }
    }

    #[test]
    fn submit_appends_user_message_before_request() {
        let mut app = test_app();
        let ticket = submit_ticket(&mut app, "  What is RAG?  ");

        assert_eq!(ticket.question, "What is RAG?");
        assert_eq!(ticket.top_k, 3);
        assert!(app.is_loading);
        assert_eq!(app.chat.messages.len(), 1);
        assert_eq!(app.chat.messages[0].role, Role::User);
        assert_eq!(app.chat.messages[0].content, "What is RAG?");
    }

    #[test]
    fn round_trip_grows_conversation_by_two() {
        let mut app = test_app();
        for i in 0..3 {
            let ticket = submit_ticket(&mut app, &format!("question {i}"));
            update(
                &mut app,
                Action::AnswerReady {
                    request_id: ticket.id,
                    result: Ok(ok_response("answer")),
                },
            );
            assert_eq!(app.chat.messages.len(), 2 * (i + 1));
            assert!(!app.is_loading);
        }
    }

    #[test]
    fn empty_and_whitespace_submissions_are_ignored() {
        let mut app = test_app();
        for text in ["", "   ", "\n\t "] {
            let effect = update(&mut app, Action::Submit(text.to_string()));
            assert!(matches!(effect, Effect::None));
        }
        assert!(app.chat.messages.is_empty());
        assert!(app.chat.conversations().is_empty());
        assert!(!app.is_loading);
    }

    #[test]
    fn submit_while_awaiting_is_rejected() {
        let mut app = test_app();
        submit_ticket(&mut app, "first");
        let effect = update(&mut app, Action::Submit("second".to_string()));

        assert!(matches!(effect, Effect::None));
        assert_eq!(app.chat.messages.len(), 1);
        assert!(app.is_loading);
    }

    #[test]
    fn failure_appends_fallback_and_clears_loading() {
        let mut app = test_app();
        let ticket = submit_ticket(&mut app, "boom?");
        update(
            &mut app,
            Action::AnswerReady {
                request_id: ticket.id,
                result: Err(AskError::Transport {
                    status: Some(500),
                    message: "Internal Server Error".into(),
                }),
            },
        );

        assert!(!app.is_loading);
        let last = app.chat.messages.last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, ERROR_FALLBACK_TEXT);
        assert_eq!(app.status_message, "Request failed");
    }

    #[test]
    fn decode_failure_is_treated_like_transport_failure() {
        let mut app = test_app();
        let ticket = submit_ticket(&mut app, "q");
        update(
            &mut app,
            Action::AnswerReady {
                request_id: ticket.id,
                result: Err(AskError::Decode("expected value".into())),
            },
        );
        assert_eq!(app.chat.messages.last().unwrap().content, ERROR_FALLBACK_TEXT);
    }

    #[test]
    fn answer_keeps_valid_sources_in_order() {
        let mut app = test_app();
        let ticket = submit_ticket(&mut app, "cite please");
        let response = AskResponse {
            answer: "See sources.".into(),
            sources: vec![
                SourceEntry::Valid(SourceRef {
                    doc_id: "a.pdf".into(),
                    page: "1".into(),
                    text: "alpha".into(),
                }),
                SourceEntry::Malformed(serde_json::json!({"doc_id": "b.pdf"})),
                SourceEntry::Valid(SourceRef {
                    doc_id: "c.pdf".into(),
                    page: "9".into(),
                    text: "gamma".into(),
                }),
            ],
            latency_seconds: 1.234,
            question: None,
        };
        update(
            &mut app,
            Action::AnswerReady {
                request_id: ticket.id,
                result: Ok(response),
            },
        );

        let answer = app.chat.messages.last().unwrap();
        let docs: Vec<&str> = answer.sources.iter().map(|s| s.doc_id.as_str()).collect();
        assert_eq!(docs, vec!["a.pdf", "c.pdf"]);
        assert_eq!(app.status_message, "Answered in 1.23s");
    }

    #[test]
    fn first_submit_starts_conversation_titled_from_question() {
        let mut app = test_app();
        submit_ticket(&mut app, "What is the capital of France and why");

        let index = app.chat.conversations();
        assert_eq!(index.len(), 1);
        assert_eq!(index[0].title, "What is the capital of France ...");
        assert_eq!(
            app.chat.current_conversation_id.as_deref(),
            Some(index[0].id.as_str())
        );
    }

    #[test]
    fn follow_up_stays_in_same_conversation() {
        let mut app = test_app();
        let t = submit_ticket(&mut app, "one");
        update(
            &mut app,
            Action::AnswerReady {
                request_id: t.id,
                result: Ok(ok_response("1")),
            },
        );
        submit_ticket(&mut app, "two");

        let index = app.chat.conversations();
        assert_eq!(index.len(), 1);
        assert_eq!(index[0].message_count, 3);
    }

    #[test]
    fn new_chat_while_loading_cancels_and_drops_late_answer() {
        let mut app = test_app();
        let ticket = submit_ticket(&mut app, "slow question");

        let effect = update(&mut app, Action::NewChat);
        match effect {
            Effect::CancelRequest(token) => {
                token.cancel();
                assert!(ticket.cancel.is_cancelled());
            }
            other => panic!("expected CancelRequest, got {other:?}"),
        }
        assert!(!app.is_loading);
        assert!(app.chat.messages.is_empty());

        update(
            &mut app,
            Action::AnswerReady {
                request_id: ticket.id,
                result: Ok(ok_response("too late")),
            },
        );
        assert!(app.chat.messages.is_empty());
        // The abandoned conversation is not touched either
        assert_eq!(app.chat.conversations()[0].message_count, 1);
    }

    #[test]
    fn new_chat_when_idle_has_no_effect_to_run() {
        let mut app = test_app();
        assert!(matches!(update(&mut app, Action::NewChat), Effect::None));
    }

    #[test]
    fn select_unknown_conversation_changes_nothing() {
        let mut app = test_app();
        let ticket = submit_ticket(&mut app, "keep going");
        let messages_before = app.chat.messages.clone();
        let current_before = app.chat.current_conversation_id.clone();

        let effect = update(&mut app, Action::SelectConversation("missing".into()));

        assert!(matches!(effect, Effect::None));
        assert_eq!(app.chat.messages, messages_before);
        assert_eq!(app.chat.current_conversation_id, current_before);
        assert!(app.is_loading);
        assert_eq!(app.pending.as_ref().map(|p| p.id), Some(ticket.id));
    }

    #[test]
    fn select_other_conversation_restores_its_messages() {
        let mut app = test_app();
        let t = submit_ticket(&mut app, "first thread");
        update(
            &mut app,
            Action::AnswerReady {
                request_id: t.id,
                result: Ok(ok_response("first answer")),
            },
        );
        let first_id = app.chat.current_conversation_id.clone().unwrap();

        update(&mut app, Action::NewChat);
        submit_ticket(&mut app, "second thread");

        let effect = update(&mut app, Action::SelectConversation(first_id.clone()));
        assert!(matches!(effect, Effect::CancelRequest(_)));
        assert_eq!(app.chat.messages.len(), 2);
        assert_eq!(app.chat.messages[1].content, "first answer");
        assert!(!app.is_loading);
    }

    #[test]
    fn selecting_active_conversation_keeps_request_alive() {
        let mut app = test_app();
        submit_ticket(&mut app, "in flight");
        let id = app.chat.current_conversation_id.clone().unwrap();

        let effect = update(&mut app, Action::SelectConversation(id));
        assert!(matches!(effect, Effect::None));
        assert!(app.is_loading);
    }

    #[test]
    fn health_report_is_recorded() {
        let mut app = test_app();
        update(&mut app, Action::EndpointHealth(false));
        assert_eq!(app.endpoint_healthy, Some(false));
    }

    #[test]
    fn quit_cancels_in_flight_request() {
        let mut app = test_app();
        let ticket = submit_ticket(&mut app, "bye");
        assert!(matches!(update(&mut app, Action::Quit), Effect::Quit));
        assert!(ticket.cancel.is_cancelled());
    }
}
