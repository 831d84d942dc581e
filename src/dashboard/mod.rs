pub mod stats;

use std::{sync::Arc, time::Duration};

use serde_derive::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::{
    blocks::{latest_window, BlockSummary},
    cache::TtlCache,
    constants::*,
    node::{Block, NodeApi, NodeError, NodeInfo},
};

use self::stats::{
    block_changes, calculate_tps, data_uploaded_trend, transaction_trend, weave_size_trend,
    Changes, Trend,
};

/// Tunables for the dashboard aggregation, including the fallback figures
/// used when the node leaves sizes out.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub cache_ttl: Duration,
    pub recent_blocks: usize,
    pub latest_blocks: usize,
    pub trend_samples: usize,
    pub history_window: usize,
    pub max_in_flight: usize,
    pub assumed_block_bytes: u64,
    pub assumed_network_bytes_per_block: u64,
    pub storage_cost: f64,
    pub min_tps: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(DASHBOARD_CACHE_TTL_SECS),
            recent_blocks: RECENT_BLOCKS,
            latest_blocks: LATEST_BLOCKS,
            trend_samples: TREND_SAMPLES,
            history_window: HISTORY_WINDOW,
            max_in_flight: MAX_IN_FLIGHT_REQUESTS,
            assumed_block_bytes: ASSUMED_BLOCK_BYTES,
            assumed_network_bytes_per_block: ASSUMED_NETWORK_BYTES_PER_BLOCK,
            storage_cost: STORAGE_COST,
            min_tps: MIN_TPS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentStats {
    pub total_transactions: u64,
    pub tps: f64,
    pub active_addresses: u64,
    pub storage_cost: f64,
    pub weave_size: u64,
    pub network_size: u64,
    pub proof_rate: u64,
    pub height: u64,
    pub peer_count: u64,
    pub changes: Changes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trends {
    pub transactions: Trend,
    pub weave_size: Trend,
    pub data_uploaded: Trend,
}

/// Everything `/api/dashboard` returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub current: CurrentStats,
    pub trends: Trends,
    /// Newest first
    pub recent_blocks: Vec<BlockSummary>,
}

impl DashboardSnapshot {
    /// `blocks` must be ordered newest first
    pub fn build(info: &NodeInfo, blocks: &[Block], config: &DashboardConfig) -> Self {
        let declared_blocks = info.blocks.unwrap_or(0);
        let window_tx: u64 = blocks.iter().map(Block::tx_count).sum();
        let peer_count = info.peers.count();

        let current = CurrentStats {
            total_transactions: window_tx.max(declared_blocks),
            tps: calculate_tps(blocks, config.min_tps),
            active_addresses: peer_count.max(1),
            storage_cost: info.storage_cost.unwrap_or(config.storage_cost),
            weave_size: info
                .weave_size
                .unwrap_or(0)
                .max(declared_blocks.saturating_mul(config.assumed_block_bytes)),
            network_size: info
                .network_size
                .unwrap_or(0)
                .max(declared_blocks.saturating_mul(config.assumed_network_bytes_per_block)),
            proof_rate: declared_blocks.max(1),
            height: info.height.unwrap_or(0),
            peer_count,
            changes: block_changes(blocks),
        };

        let trends = Trends {
            transactions: transaction_trend(blocks, config.trend_samples),
            weave_size: weave_size_trend(blocks, config.trend_samples),
            data_uploaded: data_uploaded_trend(blocks, config.trend_samples),
        };

        let recent_blocks = blocks
            .iter()
            .take(config.recent_blocks)
            .map(BlockSummary::from)
            .collect();

        Self {
            current,
            trends,
            recent_blocks,
        }
    }
}

/// Builds dashboard snapshots and keeps the last one around for the cache TTL
pub struct DashboardService {
    node: Arc<dyn NodeApi>,
    cache: TtlCache<Arc<DashboardSnapshot>>,
    config: DashboardConfig,
}

impl DashboardService {
    pub fn new(node: Arc<dyn NodeApi>, config: DashboardConfig) -> Self {
        Self {
            node,
            cache: TtlCache::new(config.cache_ttl),
            config,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Serves the cached snapshot while it's fresh, otherwise rebuilds it.
    ///
    /// Fails only when the node info can't be fetched; missing blocks just
    /// thin out the window.
    #[instrument(skip(self))]
    pub async fn snapshot(&self) -> Result<Arc<DashboardSnapshot>, NodeError> {
        if let Some(snapshot) = self.cache.get().await {
            debug!("Serving cached dashboard snapshot");
            return Ok(snapshot);
        }
        debug!("Dashboard cache miss, rebuilding snapshot");

        let window = self.config.trend_samples.max(self.config.recent_blocks);
        let (info, blocks) = latest_window(self.node.as_ref(), window, self.config.max_in_flight)
            .await
            .map_err(|err| {
                error!(error = %err, "Unable to fetch node info for dashboard");
                err
            })?;
        let height = info.height.unwrap_or(0);

        let snapshot = Arc::new(DashboardSnapshot::build(&info, &blocks, &self.config));
        info!(
            height,
            peers = snapshot.current.peer_count,
            total_transactions = snapshot.current.total_transactions,
            blocks = blocks.len(),
            "Rebuilt dashboard snapshot"
        );

        self.cache.set(snapshot.clone()).await;
        Ok(snapshot)
    }
}
