use actix_web::{
    get,
    web::{self, Data},
    HttpResponse,
};

use super::ApiError;
use crate::{explorer, node::is_valid_id, web::AppState};

#[get("/api/tx/{id}")]
pub async fn get_transaction(
    state: Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    if !is_valid_id(&id) {
        return Err(ApiError::NotFound("Transaction not found".into()));
    }
    let tx = explorer::transaction_summary(state.node.as_ref(), &id)
        .await
        .map_err(|err| {
            if err.is_not_found() {
                ApiError::upstream("Transaction not found")(err)
            } else {
                ApiError::upstream("Error fetching transaction")(err)
            }
        })?;
    Ok(HttpResponse::Ok().json(tx))
}

#[get("/api/transactions/count")]
pub async fn get_transaction_count(state: Data<AppState>) -> Result<HttpResponse, ApiError> {
    let count = explorer::transaction_count(state.node.as_ref())
        .await
        .map_err(ApiError::upstream("Error fetching transaction count"))?;
    Ok(HttpResponse::Ok().json(count))
}
