//! HTTP client for the remote messages API.

use std::time::Duration;

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{StatusCode, Url};

use super::mapping::{enrich_outbound, envelope_from_client, envelope_to_client};
use super::types::{ClientMessage, RemoteEnvelope};

const ERROR_BODY_LIMIT: usize = 200;

/// Endpoint and credentials for the remote messages API.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub endpoint: String,
    pub api_key: String,
    /// Whole-request timeout applied to the underlying client. `None` = no timeout.
    pub timeout: Option<Duration>,
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("messages api request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("messages api returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("messages api response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid relay configuration: {0}")]
    InvalidConfig(String),
}

impl RelayError {
    /// True when the remote could not be reached or answered with a non-success status.
    pub fn is_transport(&self) -> bool {
        matches!(self, RelayError::Transport(_) | RelayError::Status { .. })
    }
}

/// Relays messages to and from a single remote endpoint, translating between
/// [`ClientMessage`] and [`RemoteEnvelope`].
#[derive(Clone)]
pub struct MessageRelay {
    endpoint: Url,
    client: reqwest::Client,
}

impl MessageRelay {
    /// Build a relay with its own HTTP client.
    /// Every request carries `Authorization: Bearer <api_key>`.
    pub fn new(settings: RelaySettings) -> Result<Self, RelayError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", settings.api_key.trim()))
            .map_err(|_| {
                RelayError::InvalidConfig("api key is not a valid header value".to_string())
            })?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RelayError::InvalidConfig(format!("building http client: {}", e)))?;
        Self::with_client(&settings.endpoint, client)
    }

    /// Use a caller-configured client as is (no auth header is added).
    pub fn with_client(endpoint: &str, client: reqwest::Client) -> Result<Self, RelayError> {
        let endpoint = Url::parse(endpoint.trim()).map_err(|e| {
            RelayError::InvalidConfig(format!("invalid messages api url {:?}: {}", endpoint, e))
        })?;
        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// GET the endpoint and translate the returned records in order.
    pub async fn fetch_messages(&self) -> Result<Vec<ClientMessage>, RelayError> {
        log::debug!("GET {}", self.endpoint);
        let res = self.client.get(self.endpoint.clone()).send().await?;
        let envelope = read_envelope(res).await?;
        log::debug!("fetched {} record(s)", envelope.records.len());
        Ok(envelope_to_client(&envelope))
    }

    /// Stamp `messages` with fresh ids and the current time, POST them, and translate the
    /// response. Empty input returns an empty list without a request. `messages` is not modified.
    pub async fn submit_messages(
        &self,
        messages: &[ClientMessage],
    ) -> Result<Vec<ClientMessage>, RelayError> {
        if messages.is_empty() {
            return Ok(Vec::new());
        }
        let outbound = enrich_outbound(messages, Utc::now());
        let body = envelope_from_client(&outbound);
        log::debug!("POST {} with {} record(s)", self.endpoint, body.records.len());
        let res = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;
        let envelope = read_envelope(res).await?;
        Ok(envelope_to_client(&envelope))
    }
}

async fn read_envelope(res: reqwest::Response) -> Result<RemoteEnvelope, RelayError> {
    let status = res.status();
    let body = res.text().await?;
    if !status.is_success() {
        log::warn!("messages api returned {}", status);
        return Err(RelayError::Status {
            status,
            body: body.chars().take(ERROR_BODY_LIMIT).collect(),
        });
    }
    let envelope: Option<RemoteEnvelope> = serde_json::from_str(&body)?;
    Ok(envelope.unwrap_or_default())
}
