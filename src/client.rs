use crate::{
    blocks::BlockSummary,
    constants::*,
    dashboard::DashboardSnapshot,
    explorer::{BlockDetail, TransactionSummary},
    format::{format_bytes, format_number, format_time_ago, shorten_hash},
    metrics::NetworkMetrics,
};
use anyhow::{bail, Context};
use clap::{Args, Parser};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::instrument;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub enum ClientCli {
    /// Show the network dashboard
    Dashboard(OutputArgs),
    /// List the latest blocks
    Blocks(OutputArgs),
    /// Show a block by height or hash
    Block(BlockArgs),
    /// Show a transaction
    Tx(TxArgs),
    /// Show the network gauges
    Metrics(OutputArgs),
}

#[derive(Args, Debug)]
#[command(author, version, about, long_about = None)]
pub struct OutputArgs {
    /// Base URL of the explorer API
    #[arg(long, env = "EXPLORER_API_URL", default_value = EXPLORER_API_URL)]
    api_url: String,
    /// Output JSON data
    #[arg(short, long, default_value_t = false)]
    json: bool,
}

#[derive(Args, Debug)]
#[command(author, version, about, long_about = None)]
pub struct BlockArgs {
    /// Block height or hash
    id: String,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
#[command(author, version, about, long_about = None)]
pub struct TxArgs {
    /// Transaction id
    id: String,
    #[command(flatten)]
    output: OutputArgs,
}

impl ClientCli {
    fn output(&self) -> &OutputArgs {
        match self {
            Self::Dashboard(output) | Self::Blocks(output) | Self::Metrics(output) => output,
            Self::Block(BlockArgs { output, .. }) | Self::Tx(TxArgs { output, .. }) => output,
        }
    }

    fn path(&self) -> String {
        match self {
            Self::Dashboard(_) => "api/dashboard".into(),
            Self::Blocks(_) => "api/blocks".into(),
            Self::Block(args) => format!("api/block/{}", args.id),
            Self::Tx(args) => format!("api/tx/{}", args.id),
            Self::Metrics(_) => "api/metrics".into(),
        }
    }
}

#[instrument]
pub async fn run(command: &ClientCli) -> Result<(), anyhow::Error> {
    let output = command.output();
    let url = format!("{}/{}", output.api_url.trim_end_matches('/'), command.path());
    let body = fetch(&url).await?;

    let msg = if output.json && !matches!(command, ClientCli::Metrics(_)) {
        body
    } else {
        let now = now_secs();
        match command {
            ClientCli::Dashboard(_) => {
                render_dashboard(&serde_json::from_str::<DashboardSnapshot>(&body)?, now)
            }
            ClientCli::Blocks(_) => {
                render_blocks(&serde_json::from_str::<Vec<BlockSummary>>(&body)?, now)
            }
            ClientCli::Block(_) => render_block(&serde_json::from_str::<BlockDetail>(&body)?, now),
            ClientCli::Tx(_) => {
                render_transaction(&serde_json::from_str::<TransactionSummary>(&body)?)
            }
            ClientCli::Metrics(args) => {
                let metrics = NetworkMetrics::parse(&body)?;
                if args.json {
                    serde_json::to_string_pretty(&metrics)?
                } else {
                    render_metrics(&metrics)
                }
            }
        }
    };
    println!("{msg}");
    Ok(())
}

async fn fetch(url: &str) -> anyhow::Result<String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()?;
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Unable to reach the explorer API at {url}"))?;
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        bail!("{url} returned {status}: {body}");
    }
    Ok(body)
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn render_dashboard(snapshot: &DashboardSnapshot, now: u64) -> String {
    let current = &snapshot.current;
    let mut lines = vec![
        format!("Height:             {}", format_number(current.height)),
        format!("Peers:              {}", format_number(current.peer_count)),
        format!("Total transactions: {}", format_number(current.total_transactions)),
        format!("TPS:                {}", current.tps),
        format!("Weave size:         {}", format_bytes(current.weave_size)),
        format!("Network size:       {}", format_bytes(current.network_size)),
        format!("Storage cost:       {}", current.storage_cost),
        String::new(),
        "Recent blocks".to_string(),
    ];
    lines.push(render_blocks(&snapshot.recent_blocks, now));
    lines.join("\n")
}

fn render_blocks(blocks: &[BlockSummary], now: u64) -> String {
    blocks
        .iter()
        .map(|block| {
            format!(
                "{:>10}  {}  {:>4} txs  {:>10}  {}",
                block.height,
                shorten_hash(&block.hash, 8),
                block.tx_count,
                format_bytes(block.size),
                format_time_ago(block.timestamp / 1000, now),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_block(block: &BlockDetail, now: u64) -> String {
    let mut lines = vec![
        format!("Block {} ({})", block.height, block.hash),
        format!("Mined:    {}", format_time_ago(block.timestamp, now)),
        format!("Previous: {}", block.previous_block.as_deref().unwrap_or("-")),
        format!("Miner:    {}", block.miner.as_deref().unwrap_or("-")),
        format!("Size:     {}", format_bytes(block.size)),
        format!("Txs:      {}", block.txs.len()),
    ];
    for id in &block.txs {
        match block.transactions.iter().find(|tx| &tx.id == id) {
            Some(tx) => {
                lines.push(format!(
                    "  {id}  {}  fee {}",
                    format_bytes(tx.data_size),
                    tx.fee.as_deref().unwrap_or("-")
                ));
                lines.extend(
                    tx.tags
                        .iter()
                        .map(|tag| format!("    {}: {}", tag.name, tag.value)),
                );
            }
            None => lines.push(format!("  {id}")),
        }
    }
    lines.join("\n")
}

fn render_transaction(tx: &TransactionSummary) -> String {
    let mut lines = vec![
        format!("Transaction {}", tx.id),
        format!(
            "Block:     {}",
            tx.block_height.map_or("pending".to_string(), |h| h.to_string())
        ),
        format!("Data size: {}", format_bytes(tx.data_size)),
        format!("Fee:       {}", tx.fee.as_deref().unwrap_or("-")),
        format!("Quantity:  {}", tx.quantity.as_deref().unwrap_or("-")),
        format!("Owner:     {}", tx.owner.as_deref().map_or("-".into(), |o| shorten_hash(o, 8))),
        format!("Target:    {}", tx.target.as_deref().unwrap_or("-")),
    ];
    lines.extend(
        tx.tags
            .iter()
            .map(|tag| format!("  {}: {}", tag.name, tag.value)),
    );
    lines.join("\n")
}

fn render_metrics(metrics: &NetworkMetrics) -> String {
    [
        format!("Height:             {}", metrics.height),
        format!("Peers:              {}", metrics.peer_count),
        format!("Storage size:       {}", format_bytes(metrics.total_size as u64)),
        format!("Hash rate:          {}", metrics.hash_rate),
        format!("TPS:                {}", metrics.tps),
        format!("Transactions:       {}", metrics.transaction_count),
        format!("Price per GiB:      {}", metrics.storage_price),
        format!("Block time:         {}s", metrics.block_time),
        format!("Latest block txs:   {}", metrics.total_transactions),
        format!("Average block size: {}", format_bytes(metrics.average_block_size as u64)),
    ]
    .join("\n")
}
