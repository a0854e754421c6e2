use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::error::{OpsBuddyError, OpsBuddyResult};
use crate::models::Reply;
use crate::sources::backend_response::{format_backend_response, QueryResponse};
use crate::sources::traits::ResponseSource;

const PROBE_QUERY: &str = "ping";
const DEFAULT_BACKEND_ERROR: &str = "Failed to get a response from the backend";

#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    pub query: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Result of the connectivity probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStatus {
    Connected,
    Fallback,
}

impl BackendStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, BackendStatus::Connected)
    }
}

impl fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendStatus::Connected => write!(f, "Backend connected"),
            BackendStatus::Fallback => write!(f, "Using fallback mode"),
        }
    }
}

/// REST client for the incident backend's `/query` endpoint.
pub struct BackendClient {
    client: Client,
    base_url: String,
    probe_timeout: Duration,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> OpsBuddyResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| {
                OpsBuddyError::Internal(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            probe_timeout: Duration::from_millis(config.probe_timeout_ms),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn query_url(&self) -> String {
        format!("{}/query", self.base_url)
    }

    pub async fn send_query(&self, text: &str) -> OpsBuddyResult<QueryResponse> {
        let url = self.query_url();
        debug!(url = %url, "Sending backend query");

        let response = self
            .client
            .post(&url)
            .json(&QueryRequest { query: text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| DEFAULT_BACKEND_ERROR.to_string());
            return Err(OpsBuddyError::BackendError {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<QueryResponse>()
            .await
            .map_err(|e| OpsBuddyError::ApiParseError(e.to_string()))
    }

    /// Sends a `ping` query with the short probe timeout. Never fails.
    pub async fn probe(&self) -> BackendStatus {
        let result = self
            .client
            .post(self.query_url())
            .timeout(self.probe_timeout)
            .json(&QueryRequest { query: PROBE_QUERY })
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => BackendStatus::Connected,
            Ok(resp) => {
                warn!(status = %resp.status(), "Backend probe returned an error status");
                BackendStatus::Fallback
            }
            Err(e) => {
                warn!(error = %e, "Backend probe failed");
                BackendStatus::Fallback
            }
        }
    }
}

#[async_trait]
impl ResponseSource for BackendClient {
    fn source_name(&self) -> &str {
        "backend"
    }

    async fn respond(&self, text: &str) -> OpsBuddyResult<Reply> {
        let response = self.send_query(text).await?;
        debug!(
            intent = %response.intent,
            sub_intent = %response.sub_intent,
            "Backend classified query"
        );
        Ok(format_backend_response(&response))
    }

    async fn health_check(&self) -> OpsBuddyResult<bool> {
        Ok(self.probe().await.is_connected())
    }
}
