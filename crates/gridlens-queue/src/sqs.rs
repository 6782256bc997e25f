use async_trait::async_trait;
use gridlens_core::models::EnrichmentNotice;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

/// Queue operation errors
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Failed to serialize notice: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to send message: {0}")]
    Send(String),
}

/// Notification seam for the upload pipeline.
///
/// The pipeline treats the publish as best-effort; implementations
/// report failures normally and the caller decides what to suppress.
#[async_trait]
pub trait EnrichmentQueue: Send + Sync {
    /// Enqueue the correlation message for the enrichment workers.
    async fn publish(&self, notice: &EnrichmentNotice) -> Result<(), NotifyError>;
}

/// Configuration for the SQS queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqsConfig {
    /// SQS queue URL.
    pub queue_url: String,

    /// AWS region. Falls back to the ambient credential chain when unset.
    pub region: Option<String>,

    /// Endpoint URL override (for LocalStack).
    pub endpoint_url: Option<String>,
}

impl SqsConfig {
    pub fn new(queue_url: impl Into<String>) -> Self {
        Self {
            queue_url: queue_url.into(),
            region: None,
            endpoint_url: None,
        }
    }

    /// Set the AWS region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the endpoint URL override.
    #[must_use]
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }
}

/// AWS SQS publisher for enrichment notices.
pub struct SqsQueue {
    config: SqsConfig,
    client: aws_sdk_sqs::Client,
}

impl std::fmt::Debug for SqsQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqsQueue")
            .field("config", &self.config)
            .field("client", &"<SqsClient>")
            .finish()
    }
}

impl SqsQueue {
    /// Create a new `SqsQueue` by building an AWS SDK client from the
    /// standard credential chain.
    pub async fn new(config: SqsConfig) -> Self {
        let mut loader = aws_config::from_env();
        if let Some(ref region) = config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(ref endpoint) = config.endpoint_url {
            debug!(endpoint = %endpoint, "Using custom SQS endpoint");
            loader = loader.endpoint_url(endpoint.clone());
        }
        let sdk_config = loader.load().await;
        let client = aws_sdk_sqs::Client::new(&sdk_config);
        Self { config, client }
    }

    /// Create an `SqsQueue` with a pre-built client (for testing).
    pub fn with_client(config: SqsConfig, client: aws_sdk_sqs::Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl EnrichmentQueue for SqsQueue {
    #[tracing::instrument(skip(self, notice), fields(blob_name = %notice.blob_name))]
    async fn publish(&self, notice: &EnrichmentNotice) -> Result<(), NotifyError> {
        let body = serde_json::to_string(notice)?;

        debug!(queue_url = %self.config.queue_url, "Sending enrichment notice");

        let result = self
            .client
            .send_message()
            .queue_url(self.config.queue_url.as_str())
            .message_body(body)
            .send()
            .await
            .map_err(|e| {
                let err_str = e.to_string();
                error!(error = %err_str, "SQS send_message failed");
                NotifyError::Send(err_str)
            })?;

        let message_id = result.message_id().unwrap_or("unknown");
        info!(
            message_id = %message_id,
            queue_url = %self.config.queue_url,
            "Enrichment notice sent"
        );

        Ok(())
    }
}
