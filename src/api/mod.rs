mod errors;
mod routes;

use std::sync::Arc;

use axum::routing::post;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::engine::BatchDispatcher;

pub use errors::ApiError;

/// Header selecting the dispatch strategy of a submitted batch.
pub const ROUTER_HEADER: &str = "Router";

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<BatchDispatcher>
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/payments/submit", post(routes::submit_payments))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
