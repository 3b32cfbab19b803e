//! HTTP transport to player workers
//!
//! Every avatar has its own worker endpoint; the engine POSTs the avatar's
//! state view there once per tick and reads back a single JSON decision.
//! Timeouts are applied by the caller, not here.

use crate::core::error::{DecisionError, GameError, Result};
use crate::worker::protocol::StateView;
use reqwest::{Client, Url};
use serde_json::Value;

/// Something that can turn a state view into a raw worker decision
///
/// `WorkerClient` is the production implementation; tests script answers
/// in memory.
#[allow(async_fn_in_trait)]
pub trait DecisionTransport {
    async fn request_decision(
        &self,
        endpoint: &Url,
        view: &StateView,
    ) -> std::result::Result<Value, DecisionError>;
}

/// Async HTTP client shared by every avatar in a game
#[derive(Debug, Clone)]
pub struct WorkerClient {
    client: Client,
}

impl WorkerClient {
    pub fn new() -> Self {
        Self { client: Client::new() }
    }

    /// Parse a worker URL handed over by the game creator
    pub fn parse_endpoint(endpoint: &str) -> Result<Url> {
        let url = Url::parse(endpoint)
            .map_err(|e| GameError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(GameError::InvalidEndpoint(format!(
                "{}: unsupported scheme {}",
                endpoint, other
            ))),
        }
    }
}

impl Default for WorkerClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTransport for WorkerClient {
    async fn request_decision(
        &self,
        endpoint: &Url,
        view: &StateView,
    ) -> std::result::Result<Value, DecisionError> {
        let response = self
            .client
            .post(endpoint.clone())
            .header("content-type", "application/json")
            .json(view)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DecisionError::Transport(format!(
                "worker returned {}: {}",
                status, error_text
            )));
        }

        Ok(response.json::<Value>().await?)
    }
}
