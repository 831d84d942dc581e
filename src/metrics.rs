//! Prometheus exposition of node figures, and the reverse parse used by the
//! terminal client.

use prometheus::{Encoder, Gauge, Opts, Registry, TextEncoder};
use prometheus_parse::{Scrape, Value};
use serde_derive::{Deserialize, Serialize};

use crate::{
    constants::METRICS_PREFIX,
    node::{Block, NodeInfo},
};

const HEIGHT: &str = "height";
const PEERS: &str = "peers";
const STORAGE_SIZE: &str = "storage_size";
const MINING_RATE: &str = "mining_rate";
const TRANSACTION_THROUGHPUT: &str = "transaction_throughput";
const TRANSACTION_COUNT: &str = "transaction_count";
const PRICE_PER_GIB: &str = "price_per_gib";
const BLOCK_TIME: &str = "block_time";
const TIMESTAMP: &str = "timestamp";
const TOTAL_TRANSACTIONS: &str = "total_transactions";
const AVERAGE_BLOCK_SIZE: &str = "average_block_size";

fn metric_name(name: &str) -> String {
    format!("{METRICS_PREFIX}_{name}")
}

/// Renders the node gauges in the Prometheus text format.
///
/// `latest` is the block at the node's height, when it could be fetched.
/// `now` (seconds) stands in for a missing node timestamp.
pub fn render(
    info: &NodeInfo,
    latest: Option<&Block>,
    now: u64,
) -> Result<String, prometheus::Error> {
    let height = info.height.unwrap_or(0);
    let weave_size = info.weave_size.unwrap_or(0);
    let gauges: [(&str, &str, f64); 11] = [
        (HEIGHT, "Current block height", height as f64),
        (PEERS, "Number of connected peers", info.peers.count() as f64),
        (STORAGE_SIZE, "Total storage size in bytes", weave_size as f64),
        (MINING_RATE, "Network hash rate", info.current_diff.unwrap_or(0.0)),
        (
            TRANSACTION_THROUGHPUT,
            "Transactions per second",
            info.tx_throughput.unwrap_or(0.0),
        ),
        (
            TRANSACTION_COUNT,
            "Total number of transactions",
            info.tx_count.unwrap_or(0) as f64,
        ),
        (
            PRICE_PER_GIB,
            "Storage price per GiB",
            info.storage_cost.unwrap_or(0.0),
        ),
        (
            BLOCK_TIME,
            "Average block time in seconds",
            info.block_time.unwrap_or(0.0),
        ),
        (
            TIMESTAMP,
            "Last block timestamp",
            info.current_timestamp.unwrap_or(now) as f64,
        ),
        (
            TOTAL_TRANSACTIONS,
            "Transactions in the latest block",
            latest.map(Block::tx_count).unwrap_or(0) as f64,
        ),
        (
            AVERAGE_BLOCK_SIZE,
            "Average block size in bytes",
            weave_size as f64 / height.max(1) as f64,
        ),
    ];

    let registry = Registry::new();
    for (name, help, value) in gauges {
        let gauge = Gauge::with_opts(Opts::new(metric_name(name), help))?;
        gauge.set(value);
        registry.register(Box::new(gauge))?;
    }

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

/// Gauges read back from [`render`] output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkMetrics {
    pub height: f64,
    pub peer_count: f64,
    pub total_size: f64,
    pub network_size: f64,
    pub hash_rate: f64,
    pub tps: f64,
    pub transaction_count: f64,
    pub storage_price: f64,
    pub block_time: f64,
    pub proof_rate: f64,
    /// Milliseconds since the epoch
    pub last_block_time: f64,
    pub total_transactions: f64,
    pub average_block_size: f64,
}

impl NetworkMetrics {
    /// Reads the `bigfile_*` gauges out of Prometheus text. Labels are ignored,
    /// other metrics and non-numeric samples are skipped.
    pub fn parse(text: &str) -> std::io::Result<Self> {
        let scrape = Scrape::parse(text.lines().map(|line| Ok(line.to_owned())))?;
        let mut metrics = Self::default();

        for sample in scrape.samples {
            let value = match sample.value {
                Value::Gauge(v) | Value::Untyped(v) | Value::Counter(v) => v,
                _ => continue,
            };
            let Some(gauge) = sample
                .metric
                .strip_prefix(METRICS_PREFIX)
                .and_then(|n| n.strip_prefix('_'))
            else {
                continue;
            };

            match gauge {
                HEIGHT => metrics.height = value,
                PEERS => metrics.peer_count = value,
                STORAGE_SIZE => {
                    metrics.total_size = value;
                    metrics.network_size = value;
                }
                MINING_RATE => metrics.hash_rate = value,
                TRANSACTION_THROUGHPUT => metrics.tps = value,
                TRANSACTION_COUNT => metrics.transaction_count = value,
                PRICE_PER_GIB => metrics.storage_price = value,
                BLOCK_TIME => {
                    metrics.block_time = value;
                    metrics.proof_rate = 1.0 / value.max(0.1);
                }
                TIMESTAMP => metrics.last_block_time = value * 1000.0,
                TOTAL_TRANSACTIONS => metrics.total_transactions = value,
                AVERAGE_BLOCK_SIZE => metrics.average_block_size = value,
                _ => {}
            }
        }

        Ok(metrics)
    }
}
