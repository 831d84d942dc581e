/// Upstream BigFile node. It serves a self-signed certificate, hence the relaxed TLS default
pub const BIGFILE_NODE_URL: &str = "https://thebigfile.info:1984";
pub const EXPLORER_API_URL: &str = "http://localhost:3001";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;

pub const DASHBOARD_CACHE_TTL_SECS: u64 = 10;
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
pub const MAX_IN_FLIGHT_REQUESTS: usize = 8;

pub const RECENT_BLOCKS: usize = 15;
pub const LATEST_BLOCKS: usize = 10;
pub const TREND_SAMPLES: usize = 24;
pub const HISTORY_WINDOW: usize = 24;

// heuristic fallbacks when the node omits sizes
pub const ASSUMED_BLOCK_BYTES: u64 = 1024 * 1024;
pub const ASSUMED_NETWORK_BYTES_PER_BLOCK: u64 = 2 * 1024 * 1024;
pub const STORAGE_COST: f64 = 0.1;
pub const MIN_TPS: f64 = 0.01;

pub const TRANSACTION_EOD_FACTOR: f64 = 24.0;
pub const WEAVE_SIZE_EOD_FACTOR: f64 = 1.01;

// placeholders served by the synthetic health endpoint
pub const SYNTHETIC_UPTIME: f64 = 99.9;
pub const FALLBACK_BLOCK_TIME: f64 = 2.1;
pub const HEALTHY_PEER_THRESHOLD: u64 = 5;
pub const PEER_HEALTH_GOOD: u64 = 92;
pub const PEER_HEALTH_DEGRADED: u64 = 75;

pub const METRICS_PREFIX: &str = "bigfile";
pub const SYNTHETIC_DATA_HEADER: &str = "X-Synthetic-Data";
