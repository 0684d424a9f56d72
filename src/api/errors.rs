use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::strategies::UnknownStrategy;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing Router header")]
    MissingRouter,
    #[error("Router header is not valid text")]
    InvalidRouter,
    #[error("{0}")]
    UnknownRouter(#[from] UnknownStrategy)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string(),
        }));

        (StatusCode::BAD_REQUEST, body).into_response()
    }
}
