//! Block and transaction lookups backing the explorer pages

use std::str::FromStr;

use serde_derive::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    blocks::{fetch_transactions, latest_window, BlockSummary},
    node::{is_valid_id, Block, NodeApi, NodeError, Transaction},
};

/// A block is addressed by height when the id is all digits, by hash otherwise
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockId {
    Height(u64),
    Hash(String),
}

impl FromStr for BlockId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            return s
                .parse()
                .map(BlockId::Height)
                .map_err(|_| format!("Block height out of range: {s}"));
        }
        if is_valid_id(s) {
            Ok(BlockId::Hash(s.to_string()))
        } else {
            Err(format!("Malformed block id: {s}"))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagSummary {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub id: String,
    pub block_height: Option<u64>,
    pub block_hash: Option<String>,
    pub data_size: u64,
    pub timestamp: Option<u64>,
    pub fee: Option<String>,
    pub quantity: Option<String>,
    pub data_root: Option<String>,
    pub owner: Option<String>,
    pub target: Option<String>,
    pub tags: Vec<TagSummary>,
}

impl From<Transaction> for TransactionSummary {
    fn from(tx: Transaction) -> Self {
        let tags = tx
            .tags
            .iter()
            .map(|tag| {
                let (name, value) = tag.decoded();
                TagSummary { name, value }
            })
            .collect();
        Self {
            fee: tx.fee().map(str::to_owned),
            id: tx.id.unwrap_or_default(),
            block_height: tx.block_height,
            block_hash: tx.block_indep_hash,
            data_size: tx.data_size.unwrap_or(0),
            timestamp: tx.timestamp,
            quantity: tx.quantity,
            data_root: tx.data_root,
            owner: tx.owner,
            target: tx.target,
            tags,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDetail {
    pub hash: String,
    pub height: u64,
    /// Seconds since the epoch
    pub timestamp: u64,
    pub previous_block: Option<String>,
    pub miner: Option<String>,
    pub size: u64,
    pub txs: Vec<String>,
    /// Transactions the node could resolve, in block order
    pub transactions: Vec<TransactionSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCount {
    pub total: u64,
    pub last_block: u64,
    pub pending: u64,
}

/// The `count` newest blocks, newest first
#[instrument(skip(node))]
pub async fn latest_blocks(
    node: &dyn NodeApi,
    count: usize,
    max_in_flight: usize,
) -> Result<Vec<BlockSummary>, NodeError> {
    let (_, blocks) = latest_window(node, count, max_in_flight).await?;
    Ok(blocks.iter().map(BlockSummary::from).collect())
}

#[instrument(skip(node))]
pub async fn block_detail(
    node: &dyn NodeApi,
    id: &BlockId,
    max_in_flight: usize,
) -> Result<BlockDetail, NodeError> {
    let mut block: Block = match id {
        BlockId::Height(height) => {
            let mut block = node.block_by_height(*height).await?;
            block.height.get_or_insert(*height);
            block
        }
        BlockId::Hash(hash) => {
            let mut block = node.block_by_hash(hash).await?;
            block.indep_hash.get_or_insert_with(|| hash.clone());
            block
        }
    };

    let txs = block.tx_ids();
    let transactions = fetch_transactions(node, &txs, max_in_flight)
        .await
        .into_iter()
        .map(TransactionSummary::from)
        .collect::<Vec<_>>();
    debug!(
        height = block.height(),
        txs = txs.len(),
        resolved = transactions.len(),
        "Resolved block transactions"
    );

    Ok(BlockDetail {
        hash: block.hash(),
        height: block.height(),
        timestamp: block.timestamp(),
        size: block.size(),
        previous_block: block.previous_block.take(),
        miner: block.reward_addr.take(),
        txs,
        transactions,
    })
}

#[instrument(skip(node))]
pub async fn transaction_summary(
    node: &dyn NodeApi,
    id: &str,
) -> Result<TransactionSummary, NodeError> {
    let mut tx = node.transaction(id).await?;
    tx.id.get_or_insert_with(|| id.to_string());
    Ok(tx.into())
}

#[instrument(skip(node))]
pub async fn transaction_count(node: &dyn NodeApi) -> Result<TransactionCount, NodeError> {
    let (info, current) = futures::try_join!(node.info(), node.current_block())?;
    Ok(TransactionCount {
        total: info.tx_count.unwrap_or(0),
        last_block: current.tx_count(),
        pending: info.tx_pending.len() as u64,
    })
}
