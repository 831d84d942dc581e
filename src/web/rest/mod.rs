pub mod blocks;
pub mod dashboard;
pub mod metrics;
pub mod transactions;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_derive::Serialize;
use thiserror::Error;

use crate::node::NodeError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{context}")]
    Upstream {
        context: &'static str,
        #[source]
        source: NodeError,
    },

    #[error("Error rendering metrics")]
    Metrics(#[from] prometheus::Error),
}

impl ApiError {
    /// Tags a node failure with what the handler was doing
    pub fn upstream(context: &'static str) -> impl FnOnce(NodeError) -> Self {
        move |source| ApiError::Upstream { context, source }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream { source, .. } if source.is_not_found() => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let details = match self {
            ApiError::NotFound(_) => None,
            ApiError::Upstream { source, .. } => Some(source.to_string()),
            ApiError::Metrics(err) => Some(err.to_string()),
        };
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
            details,
        })
    }
}
