use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use tracing::{debug, info, instrument, level_filters::LevelFilter};
use tracing_subscriber::prelude::*;

use crate::{
    constants::*,
    dashboard::DashboardConfig,
    node::{NodeClient, NodeConfig},
    web::{start_web_server, AppState},
};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct ServerArgs {
    /// Base URL of the BigFile node to read from
    #[arg(long, env = "BIGFILE_NODE", default_value = BIGFILE_NODE_URL)]
    pub node_url: String,
    /// Address to bind the explorer API to
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,
    /// Port for the explorer API
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// Seconds a dashboard snapshot is served before it's rebuilt
    #[arg(long, default_value_t = DASHBOARD_CACHE_TTL_SECS)]
    pub cache_ttl_secs: u64,
    /// Timeout for each request to the node
    #[arg(long, default_value_t = REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,
    /// Max concurrent requests to the node while fetching block windows
    #[arg(long, default_value_t = MAX_IN_FLIGHT_REQUESTS)]
    pub max_in_flight: usize,
    /// Number of blocks listed on the dashboard
    #[arg(long, default_value_t = RECENT_BLOCKS)]
    pub recent_blocks: usize,
    /// Number of samples in each dashboard trend
    #[arg(long, default_value_t = TREND_SAMPLES)]
    pub trend_samples: usize,
    /// Bytes per block assumed when the node reports no weave size
    #[arg(long, default_value_t = ASSUMED_BLOCK_BYTES)]
    pub assumed_block_bytes: u64,
    /// Bytes per block assumed when the node reports no network size
    #[arg(long, default_value_t = ASSUMED_NETWORK_BYTES_PER_BLOCK)]
    pub assumed_network_bytes_per_block: u64,
    /// Storage cost shown when the node reports none
    #[arg(long, default_value_t = STORAGE_COST)]
    pub storage_cost: f64,
    /// TPS reported when there are too few blocks to measure it
    #[arg(long, default_value_t = MIN_TPS)]
    pub min_tps: f64,
    /// Accept invalid TLS certificates from the node
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub insecure_tls: bool,
    /// Path to a log file [default: none]
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    /// Max file log level
    #[arg(long, default_value_t = LevelFilter::DEBUG)]
    pub log_level_file: LevelFilter,
    /// Max stdout log level
    #[arg(long, default_value_t = LevelFilter::INFO)]
    pub log_level: LevelFilter,
}

#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    pub host: String,
    pub port: u16,
    pub node: NodeConfig,
    pub dashboard: DashboardConfig,
}

impl From<&ServerArgs> for ExplorerConfig {
    fn from(args: &ServerArgs) -> Self {
        Self {
            host: args.host.clone(),
            port: args.port,
            node: NodeConfig {
                url: args.node_url.clone(),
                request_timeout: Duration::from_secs(args.request_timeout_secs),
                insecure_tls: args.insecure_tls,
            },
            dashboard: DashboardConfig {
                cache_ttl: Duration::from_secs(args.cache_ttl_secs),
                recent_blocks: args.recent_blocks,
                trend_samples: args.trend_samples,
                max_in_flight: args.max_in_flight,
                assumed_block_bytes: args.assumed_block_bytes,
                assumed_network_bytes_per_block: args.assumed_network_bytes_per_block,
                storage_cost: args.storage_cost,
                min_tps: args.min_tps,
                ..Default::default()
            },
        }
    }
}

pub fn init_tracing(args: &ServerArgs) -> anyhow::Result<()> {
    let file_layer = match &args.log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let log_file = std::fs::File::create(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(log_file))
                    .with_filter(args.log_level_file),
            )
        }
        None => None,
    };

    let stdout_layer = tracing_subscriber::fmt::layer();
    tracing_subscriber::registry()
        .with(stdout_layer.with_filter(args.log_level))
        .with(file_layer)
        .try_init()?;
    Ok(())
}

#[instrument(skip_all)]
pub async fn run(config: ExplorerConfig) -> anyhow::Result<()> {
    debug!(?config, "Explorer configuration");
    let node = NodeClient::new(&config.node)?;
    info!("Starting bigfile-explorer against node {}", node.base_url());
    let state = Arc::new(AppState::new(Arc::new(node), config.dashboard));
    start_web_server(state, &config.host, config.port).await?;

    info!("Explorer API shut down");
    Ok(())
}
