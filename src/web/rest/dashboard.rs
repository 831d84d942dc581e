use actix_web::{get, web::Data, HttpResponse};

use super::ApiError;
use crate::web::AppState;

#[get("/api/dashboard")]
pub async fn get_dashboard(state: Data<AppState>) -> Result<HttpResponse, ApiError> {
    let snapshot = state
        .dashboard
        .snapshot()
        .await
        .map_err(ApiError::upstream("Error fetching dashboard data"))?;
    Ok(HttpResponse::Ok().json(snapshot.as_ref()))
}
