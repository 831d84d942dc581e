pub mod client;
pub mod de;

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use reqwest::StatusCode;
use serde_derive::{Deserialize, Serialize};
use thiserror::Error;

pub use self::client::{NodeClient, NodeConfig};

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("invalid node url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Request(#[from] reqwest::Error),

    #[error("{0} not found on node")]
    NotFound(String),

    #[error("node responded to {0} with {1}")]
    Status(String, StatusCode),

    #[error("failed to decode {0}: {1}")]
    Decode(String, #[source] serde_json::Error),
}

impl NodeError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, NodeError::NotFound(_))
    }
}

/// Read access to a BigFile node
#[async_trait]
pub trait NodeApi: Send + Sync {
    async fn info(&self) -> Result<NodeInfo, NodeError>;

    async fn block_by_height(&self, height: u64) -> Result<Block, NodeError>;

    async fn block_by_hash(&self, hash: &str) -> Result<Block, NodeError>;

    async fn current_block(&self) -> Result<Block, NodeError>;

    async fn transaction(&self, id: &str) -> Result<Transaction, NodeError>;
}

/// The node reports either a peer count or the peer list itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PeerCount {
    Count(u64),
    List(Vec<serde_json::Value>),
}

impl Default for PeerCount {
    fn default() -> Self {
        PeerCount::Count(0)
    }
}

impl PeerCount {
    pub fn count(&self) -> u64 {
        match self {
            PeerCount::Count(n) => *n,
            PeerCount::List(peers) => peers.len() as u64,
        }
    }
}

fn lenient_peers<'de, D>(deserializer: D) -> Result<PeerCount, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = <Option<serde_json::Value> as serde::Deserialize>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default())
}

/// Response of `/info`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    #[serde(default, deserialize_with = "de::opt_string")]
    pub network: Option<String>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    pub version: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    pub release: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    pub height: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub current: Option<String>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    pub blocks: Option<u64>,
    #[serde(default, deserialize_with = "lenient_peers")]
    pub peers: PeerCount,
    #[serde(default, deserialize_with = "de::opt_u64")]
    pub queue_length: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    pub node_state_latency: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    pub weave_size: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    pub network_size: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub current_diff: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    pub tx_count: Option<u64>,
    #[serde(default, deserialize_with = "de::lenient_vec")]
    pub tx_pending: Vec<String>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub tx_throughput: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub storage_cost: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub block_time: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub current_block_time: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    pub current_timestamp: Option<u64>,
}

/// Entry of a block's `txs` list: usually a bare id, sometimes the whole transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TxRef {
    Id(String),
    Embedded(Box<Transaction>),
}

impl TxRef {
    pub fn id(&self) -> Option<&str> {
        match self {
            TxRef::Id(id) => Some(id),
            TxRef::Embedded(tx) => tx.id.as_deref(),
        }
    }

    pub fn data_size(&self) -> u64 {
        match self {
            TxRef::Id(_) => 0,
            TxRef::Embedded(tx) => tx.data_size.unwrap_or(0),
        }
    }
}

/// Response of `/block/height/{h}`, `/block/hash/{h}` and `/block/current`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default, deserialize_with = "de::opt_string")]
    pub indep_hash: Option<String>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    pub height: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    pub timestamp: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub previous_block: Option<String>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    pub weave_size: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    pub block_size: Option<u64>,
    #[serde(default, deserialize_with = "de::lenient_vec")]
    pub txs: Vec<TxRef>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub diff: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub reward_addr: Option<String>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub block_time: Option<f64>,
}

impl Block {
    pub fn height(&self) -> u64 {
        self.height.unwrap_or(0)
    }

    /// Seconds since the epoch
    pub fn timestamp(&self) -> u64 {
        self.timestamp.unwrap_or(0)
    }

    pub fn hash(&self) -> String {
        self.indep_hash.clone().unwrap_or_default()
    }

    pub fn tx_count(&self) -> u64 {
        self.txs.len() as u64
    }

    pub fn tx_ids(&self) -> Vec<String> {
        self.txs
            .iter()
            .filter_map(|tx| tx.id().map(str::to_owned))
            .collect()
    }

    pub fn size(&self) -> u64 {
        self.weave_size.or(self.block_size).unwrap_or(0)
    }

    /// Bytes of transaction data carried by this block
    pub fn data_size(&self) -> u64 {
        self.block_size
            .unwrap_or_else(|| self.txs.iter().map(TxRef::data_size).sum())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl Tag {
    /// Tags travel base64url encoded; fall back to the raw text when they aren't
    pub fn decoded(&self) -> (String, String) {
        (decode_tag_part(&self.name), decode_tag_part(&self.value))
    }
}

fn decode_tag_part(raw: &str) -> String {
    URL_SAFE_NO_PAD
        .decode(raw.trim_end_matches('='))
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| raw.to_owned())
}

/// Response of `/tx/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, deserialize_with = "de::opt_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub owner: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub target: Option<String>,
    #[serde(default, deserialize_with = "de::opt_amount")]
    pub quantity: Option<String>,
    #[serde(default, deserialize_with = "de::opt_amount")]
    pub reward: Option<String>,
    #[serde(default, deserialize_with = "de::opt_amount")]
    pub fee: Option<String>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    pub data_size: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub data_root: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_vec")]
    pub tags: Vec<Tag>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    pub block_height: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub block_indep_hash: Option<String>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    pub timestamp: Option<u64>,
}

impl Transaction {
    pub fn fee(&self) -> Option<&str> {
        self.fee.as_deref().or(self.reward.as_deref())
    }
}

/// Block ids and transaction ids are base64url strings
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
