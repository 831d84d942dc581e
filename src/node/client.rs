use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{Block, NodeApi, NodeError, NodeInfo, Transaction};
use crate::constants::{BIGFILE_NODE_URL, REQUEST_TIMEOUT_SECS};

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub url: String,
    pub request_timeout: Duration,
    /// Accept self-signed or otherwise invalid node certificates
    pub insecure_tls: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            url: BIGFILE_NODE_URL.to_string(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            insecure_tls: true,
        }
    }
}

/// HTTP client for a single BigFile node. Requests are never retried.
#[derive(Debug, Clone)]
pub struct NodeClient {
    base_url: Url,
    client: Client,
}

impl NodeClient {
    pub fn new(config: &NodeConfig) -> Result<Self, NodeError> {
        let mut base_url = Url::parse(&config.url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .danger_accept_invalid_certs(config.insecure_tls)
            .build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, NodeError> {
        let url = self.base_url.join(path)?;
        debug!(%url, "Requesting node resource");

        let response = self.client.get(url).send().await?;
        match response.status() {
            code if code.is_success() => {
                let bytes = response.bytes().await?;
                serde_json::from_slice(&bytes).map_err(|e| NodeError::Decode(path.to_string(), e))
            }
            StatusCode::NOT_FOUND => {
                debug!(path, "Node resource not found");
                Err(NodeError::NotFound(path.to_string()))
            }
            code => Err(NodeError::Status(path.to_string(), code)),
        }
    }
}

#[async_trait]
impl NodeApi for NodeClient {
    #[instrument(skip(self))]
    async fn info(&self) -> Result<NodeInfo, NodeError> {
        self.get_json("info").await
    }

    #[instrument(skip(self))]
    async fn block_by_height(&self, height: u64) -> Result<Block, NodeError> {
        self.get_json(&format!("block/height/{height}")).await
    }

    #[instrument(skip(self))]
    async fn block_by_hash(&self, hash: &str) -> Result<Block, NodeError> {
        self.get_json(&format!("block/hash/{hash}")).await
    }

    #[instrument(skip(self))]
    async fn current_block(&self) -> Result<Block, NodeError> {
        self.get_json("block/current").await
    }

    #[instrument(skip(self))]
    async fn transaction(&self, id: &str) -> Result<Transaction, NodeError> {
        self.get_json(&format!("tx/{id}")).await
    }
}
