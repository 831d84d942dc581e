//! Short time series for the metrics charts.
//!
//! `network_growth`, `transaction_rate` and `hash_rate` come from real blocks.
//! `historical` and `health` are placeholders: they carry `synthetic: true`
//! and must not be read as telemetry.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rand::Rng;
use serde_derive::{Deserialize, Serialize};

use crate::{
    constants::*,
    dashboard::stats::{format_clock, weave_sizes},
    node::{Block, NodeInfo},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthPoint {
    pub timestamp: String,
    /// Chain weave size after this block
    pub size: u64,
    pub tx_count: u64,
    pub height: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatePoint {
    pub timestamp: String,
    /// Transactions in the block
    pub tps: u64,
    pub height: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashRatePoint {
    pub timestamp: String,
    pub hash_rate: f64,
    pub height: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalSample {
    pub timestamp: String,
    pub tps: f64,
    pub size: f64,
    pub hash_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticSeries<T> {
    pub synthetic: bool,
    pub data: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkHealth {
    pub uptime: f64,
    pub block_time: f64,
    pub peer_health: u64,
    pub synthetic: bool,
}

/// Blocks newest first in, points oldest first out
pub fn network_growth(blocks: &[Block]) -> Vec<GrowthPoint> {
    let sizes = weave_sizes(blocks.iter().rev());
    blocks
        .iter()
        .rev()
        .zip(sizes)
        .map(|(block, size)| GrowthPoint {
            timestamp: format_clock(block.timestamp()),
            size,
            tx_count: block.tx_count(),
            height: block.height(),
        })
        .collect()
}

pub fn transaction_rate(blocks: &[Block]) -> Vec<RatePoint> {
    blocks
        .iter()
        .rev()
        .map(|block| RatePoint {
            timestamp: format_clock(block.timestamp()),
            tps: block.tx_count(),
            height: block.height(),
        })
        .collect()
}

pub fn hash_rate(blocks: &[Block]) -> Vec<HashRatePoint> {
    blocks
        .iter()
        .rev()
        .map(|block| HashRatePoint {
            timestamp: format_clock(block.timestamp()),
            hash_rate: block.diff.unwrap_or(0.0),
            height: block.height(),
        })
        .collect()
}

/// Random hourly samples over the last `hours` hours ending at `now`
pub fn historical<R: Rng>(
    rng: &mut R,
    now: DateTime<Utc>,
    hours: usize,
) -> SyntheticSeries<HistoricalSample> {
    let data = (0..hours)
        .map(|i| {
            let hours_ago = (hours - 1 - i) as i64;
            let at = now - ChronoDuration::hours(hours_ago);
            HistoricalSample {
                timestamp: at.format("%I:%M %p").to_string(),
                tps: 2.0 + rng.gen::<f64>(),
                size: 120.0 + i as f64 * 3.0 + rng.gen::<f64>() * 2.0,
                hash_rate: 45.0 + rng.gen::<f64>() * 10.0,
            }
        })
        .collect();

    SyntheticSeries {
        synthetic: true,
        data,
    }
}

pub fn health(info: &NodeInfo) -> NetworkHealth {
    let peer_health = if info.peers.count() > HEALTHY_PEER_THRESHOLD {
        PEER_HEALTH_GOOD
    } else {
        PEER_HEALTH_DEGRADED
    };
    NetworkHealth {
        uptime: SYNTHETIC_UPTIME,
        block_time: info.current_block_time.unwrap_or(FALLBACK_BLOCK_TIME),
        peer_health,
        synthetic: true,
    }
}
