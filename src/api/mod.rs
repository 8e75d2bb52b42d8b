//! # Answer Endpoint Client
//!
//! Talks to the remote RAG service. Everything behind the endpoint
//! (retrieval, ranking, generation) is opaque to this crate.
//!
//! - [`endpoint`]: the `AnswerEndpoint` trait and `AskError`
//! - [`client`]: the reqwest-backed implementation
//! - [`types`]: request/response wire shapes

pub mod client;
pub mod endpoint;
pub mod types;

pub use client::HttpAnswerClient;
pub use endpoint::{AnswerEndpoint, AskError};
pub use types::{AskRequest, AskResponse, DEFAULT_TOP_K, SourceEntry, SourceRef};
