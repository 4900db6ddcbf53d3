//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the prediction API under a single Axum router. Only `/predict`
//! consumes rate-limit budget; `/me/usage` and `/debug/limits` require
//! a valid key but are not metered.

pub mod predict;
pub mod usage;

use axum::Router;
use axum::response::Json;
use axum::routing::{get, post};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

/// Assemble the API router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/predict", post(predict::predict_price))
        .route("/health", get(health))
        .route("/me/usage", get(usage::my_usage))
        .route("/debug/limits", get(usage::debug_limits))
        .layer(cors)
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// `GET /health` — liveness probe.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
