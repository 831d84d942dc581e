pub mod blocks;
pub mod cache;
pub mod client;
pub mod constants;
pub mod dashboard;
pub mod explorer;
pub mod format;
pub mod history;
pub mod metrics;
pub mod node;
pub mod server;
pub mod web;
