use actix_web::{get, http::header::ContentType, web::Data, HttpResponse};
use chrono::Utc;
use tracing::warn;

use super::ApiError;
use crate::{
    blocks::latest_window, constants::SYNTHETIC_DATA_HEADER, history, metrics, web::AppState,
};

#[get("/api/metrics")]
pub async fn get_metrics(state: Data<AppState>) -> Result<HttpResponse, ApiError> {
    let node = state.node.as_ref();
    let info = node
        .info()
        .await
        .map_err(ApiError::upstream("Error fetching metrics"))?;

    let height = info.height.unwrap_or(0);
    let latest = match node.block_by_height(height).await {
        Ok(block) => Some(block),
        Err(err) => {
            warn!(height, error = %err, "Latest block unavailable for metrics");
            None
        }
    };

    let now = u64::try_from(Utc::now().timestamp()).unwrap_or(0);
    let body = metrics::render(&info, latest.as_ref(), now)?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(body))
}

/// Placeholder series, not backed by the node
#[get("/api/metrics/historical")]
pub async fn get_historical(state: Data<AppState>) -> HttpResponse {
    let series = history::historical(
        &mut rand::thread_rng(),
        Utc::now(),
        state.config().history_window,
    );
    HttpResponse::Ok()
        .insert_header((SYNTHETIC_DATA_HEADER, "true"))
        .json(series)
}

#[get("/api/metrics/network-growth")]
pub async fn get_network_growth(state: Data<AppState>) -> Result<HttpResponse, ApiError> {
    let config = state.config();
    let (_, blocks) =
        latest_window(state.node.as_ref(), config.history_window, config.max_in_flight)
            .await
            .map_err(ApiError::upstream("Error fetching network growth metrics"))?;
    Ok(HttpResponse::Ok().json(history::network_growth(&blocks)))
}

#[get("/api/metrics/transaction-rate")]
pub async fn get_transaction_rate(state: Data<AppState>) -> Result<HttpResponse, ApiError> {
    let config = state.config();
    let (_, blocks) =
        latest_window(state.node.as_ref(), config.history_window, config.max_in_flight)
            .await
            .map_err(ApiError::upstream("Error fetching transaction rate metrics"))?;
    Ok(HttpResponse::Ok().json(history::transaction_rate(&blocks)))
}

#[get("/api/metrics/hash-rate")]
pub async fn get_hash_rate(state: Data<AppState>) -> Result<HttpResponse, ApiError> {
    let config = state.config();
    let (_, blocks) =
        latest_window(state.node.as_ref(), config.history_window, config.max_in_flight)
            .await
            .map_err(ApiError::upstream("Error fetching hash rate metrics"))?;
    Ok(HttpResponse::Ok().json(history::hash_rate(&blocks)))
}

/// Partly synthetic: uptime is a fixed figure
#[get("/api/metrics/health")]
pub async fn get_health(state: Data<AppState>) -> Result<HttpResponse, ApiError> {
    let info = state
        .node
        .info()
        .await
        .map_err(ApiError::upstream("Error fetching network health metrics"))?;
    Ok(HttpResponse::Ok()
        .insert_header((SYNTHETIC_DATA_HEADER, "true"))
        .json(history::health(&info)))
}
