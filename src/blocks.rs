use futures::{stream, StreamExt};
use serde_derive::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::node::{Block, NodeApi, NodeError, NodeInfo, Transaction};

/// Row of a block listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSummary {
    pub hash: String,
    pub height: u64,
    /// Milliseconds since the epoch
    pub timestamp: u64,
    pub size: u64,
    pub tx_count: u64,
}

impl From<&Block> for BlockSummary {
    fn from(block: &Block) -> Self {
        Self {
            hash: block.hash(),
            height: block.height(),
            timestamp: block.timestamp().saturating_mul(1000),
            size: block.size(),
            tx_count: block.tx_count(),
        }
    }
}

/// Fetches up to `count` blocks walking down from `from_height`, at most
/// `max_in_flight` requests at a time.
///
/// Blocks the node fails to return are logged and left out. The result is
/// ordered by height, newest first.
pub async fn fetch_blocks_descending(
    node: &dyn NodeApi,
    from_height: u64,
    count: usize,
    max_in_flight: usize,
) -> Vec<Block> {
    let heights = (0..=from_height).rev().take(count);
    let mut blocks: Vec<Block> = stream::iter(heights)
        .map(|height| async move {
            match node.block_by_height(height).await {
                Ok(mut block) => {
                    block.height.get_or_insert(height);
                    Some(block)
                }
                Err(err) => {
                    warn!(height, error = %err, "Omitting block");
                    None
                }
            }
        })
        .buffered(max_in_flight.max(1))
        .filter_map(|block| async move { block })
        .collect()
        .await;

    blocks.sort_by(|a, b| b.height().cmp(&a.height()));
    debug!(
        from_height,
        requested = count,
        fetched = blocks.len(),
        "Fetched block window"
    );
    blocks
}

/// Fetches node info, then the `count` newest blocks. Only the info request is
/// allowed to fail the call.
pub async fn latest_window(
    node: &dyn NodeApi,
    count: usize,
    max_in_flight: usize,
) -> Result<(NodeInfo, Vec<Block>), NodeError> {
    let info = node.info().await?;
    let height = info.height.unwrap_or(0);
    let blocks = fetch_blocks_descending(node, height, count, max_in_flight).await;
    Ok((info, blocks))
}

/// Resolves transaction ids with the same bounded fan-out, keeping input order
/// and leaving out the ones the node can't return.
pub async fn fetch_transactions(
    node: &dyn NodeApi,
    ids: &[String],
    max_in_flight: usize,
) -> Vec<Transaction> {
    stream::iter(ids)
        .map(|id| async move {
            match node.transaction(id).await {
                Ok(mut tx) => {
                    tx.id.get_or_insert_with(|| id.clone());
                    Some(tx)
                }
                Err(err) => {
                    warn!(id = %id, error = %err, "Omitting transaction");
                    None
                }
            }
        })
        .buffered(max_in_flight.max(1))
        .filter_map(|tx| async move { tx })
        .collect()
        .await
}
