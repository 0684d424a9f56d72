use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use tracing::warn;

use crate::api::{ApiError, AppState, ROUTER_HEADER};
use crate::models::{BatchResult, PaymentBatch};
use crate::strategies::DispatchStrategy;

/// `POST /payments/submit`: dispatches the batch with the strategy named by the `Router` header.
pub async fn submit_payments(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(batch): Json<PaymentBatch>,
) -> Result<Json<BatchResult>, ApiError> {
    let strategy = parse_strategy(&headers).inspect_err(|error| warn!("Rejected payments batch: {error}"))?;

    Ok(Json(state.dispatcher.dispatch(strategy, batch).await))
}

fn parse_strategy(headers: &HeaderMap) -> Result<DispatchStrategy, ApiError> {
    let value = headers.get(ROUTER_HEADER).ok_or(ApiError::MissingRouter)?;
    let name = value.to_str().map_err(|_| ApiError::InvalidRouter)?;

    Ok(name.trim().parse::<DispatchStrategy>()?)
}
