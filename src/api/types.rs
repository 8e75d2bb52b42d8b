//! Wire types for the answering endpoint.
//!
//! ```text
//! POST /ask   { "question": "...", "top_k": 3 }
//!        ←    { "answer": "...", "sources": [{doc_id, page, text}], "latency_seconds": 1.2 }
//! ```
//!
//! Some deployments echo `question` back in the response; it is accepted and ignored.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Number of passages requested when the caller does not say otherwise.
pub const DEFAULT_TOP_K: u32 = 3;

/// Request body for the `/ask` endpoint.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AskRequest<'a> {
    pub question: &'a str,
    pub top_k: u32,
}

/// A citation attached to an answer.
///
/// `doc_id` and `page` come back as strings from some backends and as
/// numbers from others, so both are normalized to display strings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SourceRef {
    #[serde(deserialize_with = "string_or_number")]
    pub doc_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub page: String,
    pub text: String,
}

/// One entry of the `sources` array as it arrived on the wire.
///
/// Entries that don't carry the three required fields are kept as raw JSON
/// instead of failing the whole response.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum SourceEntry {
    Valid(SourceRef),
    Malformed(serde_json::Value),
}

/// Successful response body.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AskResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<SourceEntry>,
    #[serde(default)]
    pub latency_seconds: f64,
    #[serde(default)]
    pub question: Option<String>,
}

impl AskResponse {
    /// Well-formed citations in response order.
    pub fn valid_sources(&self) -> Vec<SourceRef> {
        self.sources
            .iter()
            .filter_map(|entry| match entry {
                SourceEntry::Valid(source) => Some(source.clone()),
                SourceEntry::Malformed(_) => None,
            })
            .collect()
    }

    pub fn malformed_count(&self) -> usize {
        self.sources
            .iter()
            .filter(|entry| matches!(entry, SourceEntry::Malformed(_)))
            .count()
    }
}

/// Body of `GET /health`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrNumber;

    impl de::Visitor<'_> for StringOrNumber {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or a number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(StringOrNumber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_question_and_top_k() {
        let body = serde_json::to_value(AskRequest {
            question: "Hello",
            top_k: DEFAULT_TOP_K,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"question": "Hello", "top_k": 3}));
    }

    #[test]
    fn response_accepts_echoed_question() {
        let json = r#"{
            "question": "What is RAG?",
            "answer": "Retrieval-augmented generation.",
            "sources": [],
            "latency_seconds": 0.42
        }"#;
        let resp: AskResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.answer, "Retrieval-augmented generation.");
        assert_eq!(resp.question.as_deref(), Some("What is RAG?"));
        assert!(resp.sources.is_empty());
    }

    #[test]
    fn response_without_optional_fields_parses() {
        let resp: AskResponse = serde_json::from_str(r#"{"answer": "Hi there"}"#).unwrap();
        assert_eq!(resp.answer, "Hi there");
        assert!(resp.sources.is_empty());
        assert_eq!(resp.latency_seconds, 0.0);
    }

    #[test]
    fn response_missing_answer_is_an_error() {
        let result: Result<AskResponse, _> = serde_json::from_str(r#"{"sources": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn numeric_doc_id_and_page_become_strings() {
        let json = r#"{"answer": "a", "sources": [{"doc_id": 7, "page": 12, "text": "snippet"}]}"#;
        let resp: AskResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            resp.valid_sources(),
            vec![SourceRef {
                doc_id: "7".into(),
                page: "12".into(),
                text: "snippet".into(),
            }]
        );
    }

    #[test]
    fn malformed_sources_are_tagged_not_fatal() {
        let json = r#"{
            "answer": "a",
            "sources": [
                {"doc_id": "report.pdf", "page": 3, "text": "first"},
                {"doc_id": "broken.pdf"},
                "just a string",
                {"doc_id": "notes.md", "page": "ii", "text": "second"}
            ]
        }"#;
        let resp: AskResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.sources.len(), 4);
        assert_eq!(resp.malformed_count(), 2);

        let valid = resp.valid_sources();
        assert_eq!(valid.len(), 2);
        assert_eq!(valid[0].doc_id, "report.pdf");
        assert_eq!(valid[1].page, "ii");
    }
}
