use actix_web::{
    get,
    web::{self, Data},
    HttpResponse,
};
use tracing::debug;

use super::ApiError;
use crate::{
    explorer::{self, BlockId},
    web::AppState,
};

#[get("/api/blocks")]
pub async fn get_blocks(state: Data<AppState>) -> Result<HttpResponse, ApiError> {
    let config = state.config();
    let blocks = explorer::latest_blocks(
        state.node.as_ref(),
        config.latest_blocks,
        config.max_in_flight,
    )
    .await
    .map_err(ApiError::upstream("Error fetching blocks"))?;
    Ok(HttpResponse::Ok().json(blocks))
}

#[get("/api/block/{id}")]
pub async fn get_block(
    state: Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let block_id: BlockId = id.parse().map_err(|err: String| {
        debug!("{err}");
        ApiError::NotFound("Block not found".into())
    })?;
    let block = explorer::block_detail(state.node.as_ref(), &block_id, state.config().max_in_flight)
        .await
        .map_err(|err| {
            if err.is_not_found() {
                ApiError::upstream("Block not found")(err)
            } else {
                ApiError::upstream("Error fetching block details")(err)
            }
        })?;
    Ok(HttpResponse::Ok().json(block))
}
