//! Figures derived from a window of blocks. Every function here expects the
//! window ordered newest first, as returned by
//! [`fetch_blocks_descending`](crate::blocks::fetch_blocks_descending).

use chrono::DateTime;
use serde_derive::{Deserialize, Serialize};

use crate::{
    constants::{TRANSACTION_EOD_FACTOR, WEAVE_SIZE_EOD_FACTOR},
    node::Block,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub value: f64,
    pub is_positive: bool,
}

impl Default for Change {
    fn default() -> Self {
        Self {
            value: 0.0,
            is_positive: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Changes {
    pub transactions: Change,
    pub size: Change,
    pub peers: Change,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Wall clock time of the block, `hh:mm AM`
    pub timestamp: String,
    pub value: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trend {
    /// Oldest first
    pub data: Vec<TrendPoint>,
    #[serde(rename = "total24h")]
    pub total_24h: u64,
    pub eod_estimate: f64,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn format_clock(timestamp: u64) -> String {
    let secs = i64::try_from(timestamp).unwrap_or(i64::MAX);
    DateTime::from_timestamp(secs, 0)
        .map(|t| t.format("%I:%M %p").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

/// Transactions per second across the window: total transactions over the
/// time between the newest and oldest block, the span floored at 1s.
pub fn calculate_tps(blocks: &[Block], min_tps: f64) -> f64 {
    let (Some(latest), Some(oldest)) = (blocks.first(), blocks.last()) else {
        return min_tps;
    };
    if blocks.len() < 2 {
        return min_tps;
    }

    let total_tx: u64 = blocks.iter().map(Block::tx_count).sum();
    let span = latest.timestamp().saturating_sub(oldest.timestamp()).max(1);
    round2(total_tx as f64 / span as f64)
}

pub fn percentage_change(current: f64, previous: f64) -> Change {
    if previous == 0.0 {
        return Change::default();
    }
    let change = (current - previous) / previous * 100.0;
    Change {
        value: round2(change.abs()),
        is_positive: change >= 0.0,
    }
}

/// Compares the two newest blocks
pub fn block_changes(blocks: &[Block]) -> Changes {
    match blocks {
        [latest, previous, ..] => Changes {
            transactions: percentage_change(latest.tx_count() as f64, previous.tx_count() as f64),
            size: percentage_change(latest.data_size() as f64, previous.data_size() as f64),
            peers: Change::default(),
        },
        _ => Changes::default(),
    }
}

fn oldest_first(blocks: &[Block], samples: usize) -> impl Iterator<Item = &Block> {
    blocks.iter().take(samples).rev()
}

pub fn transaction_trend(blocks: &[Block], samples: usize) -> Trend {
    let data: Vec<TrendPoint> = oldest_first(blocks, samples)
        .map(|block| TrendPoint {
            timestamp: format_clock(block.timestamp()),
            value: block.tx_count(),
        })
        .collect();

    let latest = data.last().map(|p| p.value).unwrap_or(0);
    Trend {
        total_24h: data.iter().map(|p| p.value).sum(),
        eod_estimate: latest as f64 * TRANSACTION_EOD_FACTOR,
        data,
    }
}

/// Chain weave size after each block, in iteration order. A block that
/// doesn't report `weave_size` adds its own bytes to the previous point.
pub fn weave_sizes<'a>(blocks: impl Iterator<Item = &'a Block>) -> Vec<u64> {
    let mut weave = 0u64;
    blocks
        .map(|block| {
            weave = block
                .weave_size
                .unwrap_or_else(|| weave.saturating_add(block.data_size()));
            weave
        })
        .collect()
}

pub fn weave_size_trend(blocks: &[Block], samples: usize) -> Trend {
    let sizes = weave_sizes(oldest_first(blocks, samples));
    let data: Vec<TrendPoint> = oldest_first(blocks, samples)
        .zip(&sizes)
        .map(|(block, size)| TrendPoint {
            timestamp: format_clock(block.timestamp()),
            value: *size,
        })
        .collect();

    let latest = sizes.last().copied().unwrap_or(0);
    Trend {
        total_24h: latest,
        eod_estimate: latest as f64 * WEAVE_SIZE_EOD_FACTOR,
        data,
    }
}

pub fn data_uploaded_trend(blocks: &[Block], samples: usize) -> Trend {
    let data: Vec<TrendPoint> = oldest_first(blocks, samples)
        .map(|block| TrendPoint {
            timestamp: format_clock(block.timestamp()),
            value: block.data_size(),
        })
        .collect();

    let total: u64 = data.iter().map(|p| p.value).sum();
    let eod_estimate = if data.is_empty() {
        0.0
    } else {
        total as f64 * (samples as f64 / data.len() as f64)
    };
    Trend {
        total_24h: total,
        eod_estimate,
        data,
    }
}
