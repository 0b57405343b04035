use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use wreq::Client;
use wreq_util::Emulation;

/// Bound on each image download.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
}

/// Byte-fetching capability for product images.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Browser-emulating HTTP fetcher with a bounded per-request timeout.
pub struct HttpAssetFetcher {
    client: Client,
}

impl HttpAssetFetcher {
    pub fn new(timeout: Duration) -> Result<Self, anyhow::Error> {
        let client = Client::builder()
            .emulation(Emulation::Firefox136)
            .timeout(timeout)
            .build()?;

        Ok(HttpAssetFetcher { client })
    }
}

#[async_trait]
impl AssetFetcher for HttpAssetFetcher {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}
