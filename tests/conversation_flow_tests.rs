//! End-to-end conversation flow: reducer + HTTP client against a mock server.

use std::sync::Arc;

use ragchat::api::{AnswerEndpoint, HttpAnswerClient};
use ragchat::core::action::{Action, Effect, update};
use ragchat::core::message::{ERROR_FALLBACK_TEXT, Role};
use ragchat::core::state::App;
use ragchat::core::store::ChatState;
use ragchat::tui::components::message::message_text;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn app_for(server: &MockServer) -> App {
    let endpoint: Arc<dyn AnswerEndpoint> =
        Arc::new(HttpAnswerClient::new(format!("{}/ask", server.uri()), None));
    App::new(endpoint, ChatState::default(), 3)
}

/// Submit `question` and drive the resulting request to completion.
async fn round_trip(app: &mut App, question: &str) {
    let ticket = match update(app, Action::Submit(question.to_string())) {
        Effect::SpawnRequest(ticket) => ticket,
        other => panic!("Expected SpawnRequest, got {other:?}"),
    };
    let result = app
        .endpoint
        .ask(&ticket.question, ticket.top_k, ticket.cancel)
        .await;
    update(
        app,
        Action::AnswerReady {
            request_id: ticket.id,
            result,
        },
    );
}

fn plain_text(app: &App, index: usize) -> Vec<String> {
    message_text(&app.chat.messages[index])
        .lines
        .iter()
        .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
        .collect()
}

// ============================================================================
// Flows
// ============================================================================

#[tokio::test]
async fn test_answer_without_sources_has_no_sources_section() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "Hi there",
            "sources": [],
            "latency_seconds": 0.5
        })))
        .mount(&mock_server)
        .await;

    let mut app = app_for(&mock_server);
    round_trip(&mut app, "Hello").await;

    assert_eq!(app.chat.messages.len(), 2);
    assert_eq!(app.chat.messages[0].role, Role::User);
    assert_eq!(app.chat.messages[1].role, Role::Assistant);
    assert_eq!(app.chat.messages[1].content, "Hi there");
    assert!(!plain_text(&app, 1).iter().any(|l| l == "Sources:"));
    assert_eq!(app.status_message, "Answered in 0.50s");
}

#[tokio::test]
async fn test_server_error_appends_fallback() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let mut app = app_for(&mock_server);
    round_trip(&mut app, "Anything?").await;

    assert_eq!(app.chat.messages.len(), 2);
    assert_eq!(app.chat.messages[1].content, ERROR_FALLBACK_TEXT);
    assert!(app.chat.messages[1].sources.is_empty());
    assert!(!app.is_loading);
    assert_eq!(app.status_message, "Request failed");
}

#[tokio::test]
async fn test_long_source_text_is_truncated_in_citation() {
    let long_text = "a".repeat(80);
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "Cited answer",
            "sources": [
                {"doc_id": "manual.pdf", "page": 4, "text": long_text},
                {"doc_id": "faq.md", "page": "1", "text": "short"}
            ],
            "latency_seconds": 1.25
        })))
        .mount(&mock_server)
        .await;

    let mut app = app_for(&mock_server);
    round_trip(&mut app, "Cite something").await;

    let lines = plain_text(&app, 1);
    let start = lines.iter().position(|l| l == "Sources:").unwrap();
    assert_eq!(
        lines[start + 1],
        format!("1. Doc: manual.pdf, Page: 4, Text: {}...", "a".repeat(60))
    );
    assert_eq!(lines[start + 2], "2. Doc: faq.md, Page: 1, Text: short");
}

#[tokio::test]
async fn test_each_round_trip_adds_two_messages_in_one_conversation() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "ok",
            "sources": []
        })))
        .mount(&mock_server)
        .await;

    let mut app = app_for(&mock_server);
    round_trip(&mut app, "first").await;
    round_trip(&mut app, "second").await;

    assert_eq!(app.chat.messages.len(), 4);
    let conversations = app.chat.conversations();
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0].title, "first");
    assert_eq!(conversations[0].message_count, 4);
}

#[tokio::test]
async fn test_submit_while_waiting_is_rejected() {
    let mock_server = MockServer::start().await;
    let mut app = app_for(&mock_server);

    assert!(matches!(
        update(&mut app, Action::Submit("one".into())),
        Effect::SpawnRequest(_)
    ));
    assert!(matches!(
        update(&mut app, Action::Submit("two".into())),
        Effect::None
    ));
    assert_eq!(app.chat.messages.len(), 1);
}
