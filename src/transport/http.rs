//! HTTP Memory Backend
//!
//! Information Hiding:
//! - Request building, headers and status handling hidden
//! - Every action is a JSON POST to one endpoint
//! - Timeouts are whatever the underlying client carries

use super::protocol::{Action, MemoryRequest};
use super::TransportBackend;
use crate::error::TransportError;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::Value;

static SHARED_CLIENT: Lazy<Client> = Lazy::new(Client::new);

/// Talks to a remote memory API (e.g. a webhook) over HTTP
pub struct HttpBackend {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl HttpBackend {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: SHARED_CLIENT.clone(),
            url: url.into(),
            api_key: None,
        }
    }

    /// Bearer credential; an empty key means no credential
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.is_empty());
        self
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl TransportBackend for HttpBackend {
    fn name(&self) -> &'static str {
        "HttpBackend"
    }

    async fn dispatch(&self, request: &MemoryRequest) -> Result<Value, TransportError> {
        tracing::debug!(
            "[HttpBackend] {:?} for session '{}' -> {}",
            request.action,
            request.session_id,
            self.url
        );

        let mut builder = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(request);

        if let Some(ref key) = self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }

        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        // add/clear responses carry nothing we use
        if request.action != Action::Get {
            return Ok(Value::Null);
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
