use async_trait::async_trait;

use crate::error::{AppError, AppResult};
use crate::models::EventEnvelope;

/// Delivery channel for event envelopes
///
/// The tracker only knows this trait; tests swap in recording or failing
/// transports without touching the dispatch pipeline.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventTransport: Send + Sync {
    /// Delivers one envelope, returning an error when the receiving end
    /// rejects it or cannot be reached
    async fn deliver(&self, envelope: &EventEnvelope) -> AppResult<()>;

    fn name(&self) -> &'static str;
}

/// Delivers envelopes to the collector's track endpoint over HTTP
pub struct HttpTransport {
    http_client: reqwest::Client,
    endpoint_url: String,
}

impl HttpTransport {
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            endpoint_url: endpoint_url.into(),
        }
    }
}

#[async_trait]
impl EventTransport for HttpTransport {
    async fn deliver(&self, envelope: &EventEnvelope) -> AppResult<()> {
        let response = self
            .http_client
            .post(&self.endpoint_url)
            .json(envelope)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Delivery(format!(
                "collector returned {status}: {body}"
            )));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
