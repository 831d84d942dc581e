pub mod rest;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware, web, web::Data, App, HttpServer};
use tracing::info;

use crate::{
    dashboard::{DashboardConfig, DashboardService},
    node::NodeApi,
};

use self::rest::{blocks, dashboard, metrics, transactions};

/// State shared by every request handler
pub struct AppState {
    pub node: Arc<dyn NodeApi>,
    pub dashboard: DashboardService,
}

impl AppState {
    pub fn new(node: Arc<dyn NodeApi>, config: DashboardConfig) -> Self {
        Self {
            dashboard: DashboardService::new(node.clone(), config),
            node,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        self.dashboard.config()
    }
}

/// Registers the `/api` routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard::get_dashboard)
        .service(blocks::get_blocks)
        .service(blocks::get_block)
        .service(transactions::get_transaction)
        .service(transactions::get_transaction_count)
        .service(metrics::get_metrics)
        .service(metrics::get_historical)
        .service(metrics::get_network_growth)
        .service(metrics::get_transaction_rate)
        .service(metrics::get_hash_rate)
        .service(metrics::get_health);
}

pub async fn start_web_server(state: Arc<AppState>, host: &str, port: u16) -> std::io::Result<()> {
    info!("Explorer API listening on {host}:{port}");
    HttpServer::new(move || {
        App::new()
            .app_data(Data::from(state.clone()))
            .configure(configure)
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
    })
    .bind((host, port))?
    .run()
    .await
}
