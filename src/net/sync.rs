use crate::board::SyncRequest;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Acknowledgement bodies are tiny; anything bigger is not read.
const MAX_ACK_SIZE: usize = 64 * 1024;

/// Why a status notification did not succeed.
///
/// Never reverts local state; the caller only logs and reports it.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Rejected by service: {0}")]
    Rejected(String),
    #[error("Invalid service URL: {0}")]
    InvalidBaseUrl(String),
}

/// Acknowledgement body returned by the status service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SyncAck {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl SyncAck {
    fn is_error(&self) -> bool {
        self.status.eq_ignore_ascii_case("error")
    }
}

/// Sends `PUT {base}/articles/{key}/{status}` after a committed move.
///
/// Cheap to clone; the underlying `reqwest::Client` is shared.
#[derive(Debug, Clone)]
pub struct SyncNotifier {
    client: reqwest::Client,
    base: Url,
    timeout: Duration,
}

impl SyncNotifier {
    pub fn new(client: reqwest::Client, base: Url, timeout: Duration) -> Self {
        Self {
            client,
            base,
            timeout,
        }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Request URL for one notification. The article key is encoded as a
    /// single path segment.
    pub fn url_for(&self, request: &SyncRequest) -> Result<Url, SyncError> {
        super::endpoint(
            &self.base,
            &["articles", &request.key, request.status.label()],
        )
        .ok_or_else(|| SyncError::InvalidBaseUrl(self.base.to_string()))
    }

    /// Notify the service of one committed move.
    ///
    /// A 2xx response whose body is not a JSON acknowledgement still counts
    /// as success; an acknowledgement with `"status": "error"` does not.
    pub async fn notify(&self, request: &SyncRequest) -> Result<SyncAck, SyncError> {
        let url = self.url_for(request)?;
        tracing::debug!(key = %request.key, status = %request.status, "Sending status update");

        let response = tokio::time::timeout(self.timeout, self.client.put(url).send())
            .await
            .map_err(|_| SyncError::Timeout(self.timeout.as_secs()))??;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::HttpStatus(status.as_u16()));
        }

        let body = tokio::time::timeout(self.timeout, super::read_limited(response, MAX_ACK_SIZE))
            .await
            .map_err(|_| SyncError::Timeout(self.timeout.as_secs()))??
            .unwrap_or_default();

        match serde_json::from_slice::<SyncAck>(&body) {
            Ok(ack) if ack.is_error() => Err(SyncError::Rejected(ack.message)),
            Ok(ack) => Ok(ack),
            Err(_) => Ok(SyncAck::default()),
        }
    }
}
