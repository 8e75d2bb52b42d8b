//! HTTP implementation of [`AnswerEndpoint`].
//!
//! One POST per question against a configured URL. The health probe hits
//! the sibling `/health` route of the same service.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use super::endpoint::{AnswerEndpoint, AskError};
use super::types::{AskRequest, AskResponse, HealthResponse};

/// Upper bound for the startup probe, whole body included.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

pub struct HttpAnswerClient {
    endpoint_url: String,
    client: reqwest::Client,
}

impl HttpAnswerClient {
    /// `timeout` of `None` means the request may wait indefinitely.
    pub fn new(endpoint_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().unwrap_or_else(|e| {
            warn!("Failed to build HTTP client with timeout ({e}), using defaults");
            reqwest::Client::new()
        });

        Self {
            endpoint_url: endpoint_url.into(),
            client,
        }
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }
}

/// `http://host:8000/ask` → `http://host:8000/health`.
pub fn health_url(endpoint_url: &str) -> Option<String> {
    let mut url = reqwest::Url::parse(endpoint_url).ok()?;
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .pop()
        .push("health");
    url.set_query(None);
    Some(url.to_string())
}

fn transport(e: reqwest::Error) -> AskError {
    AskError::Transport {
        status: e.status().map(|s| s.as_u16()),
        message: e.to_string(),
    }
}

#[async_trait]
impl AnswerEndpoint for HttpAnswerClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn ask(
        &self,
        question: &str,
        top_k: u32,
        cancel: CancellationToken,
    ) -> Result<AskResponse, AskError> {
        let body = AskRequest { question, top_k };
        info!(
            "Ask request: url={}, top_k={}, question_len={}",
            self.endpoint_url,
            top_k,
            question.len()
        );

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AskError::Cancelled),
            sent = self.client.post(&self.endpoint_url).json(&body).send() => sent.map_err(transport)?,
        };

        let status = response.status();
        debug!("Ask response status: {}", status);

        if !status.is_success() {
            let err_body = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(AskError::Cancelled),
                body = response.text() => body.unwrap_or_default(),
            };
            warn!("Endpoint error: {} - {}", status.as_u16(), err_body);
            return Err(AskError::Transport {
                status: Some(status.as_u16()),
                message: status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            });
        }

        let text = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AskError::Cancelled),
            text = response.text() => text.map_err(transport)?,
        };

        serde_json::from_str::<AskResponse>(&text).map_err(|e| {
            warn!("Failed to decode ask response: {e}");
            debug!("Undecodable body: {text}");
            AskError::Decode(e.to_string())
        })
    }

    async fn health(&self) -> Result<(), AskError> {
        let url = health_url(&self.endpoint_url).ok_or_else(|| AskError::Transport {
            status: None,
            message: format!("invalid endpoint URL: {}", self.endpoint_url),
        })?;

        let response = self
            .client
            .get(&url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(AskError::Transport {
                status: Some(response.status().as_u16()),
                message: "health check failed".to_string(),
            });
        }

        let body = response.text().await.map_err(transport)?;
        let health: HealthResponse =
            serde_json::from_str(&body).map_err(|e| AskError::Decode(e.to_string()))?;
        if health.status == "ok" {
            Ok(())
        } else {
            Err(AskError::Decode(format!("unexpected health status: {}", health.status)))
        }
    }
}
