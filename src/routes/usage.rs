//! Usage and diagnostics routes.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::json;

use crate::services::{auth, prediction};
use crate::state::AppState;

use super::predict::api_key;

#[derive(Serialize)]
pub struct UsageResponse {
    pub api_key: String,
    pub month_requests: i64,
}

#[derive(Serialize)]
pub struct LimitsResponse {
    pub api_key: String,
    pub active_limit: String,
}

fn unauthorized(err: &auth::AuthError) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "detail": err.to_string() }))).into_response()
}

/// `GET /me/usage` — the caller's logged predictions this calendar month.
pub async fn my_usage(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let key = api_key(&headers);
    if let Err(e) = auth::authenticate(&state.config, key) {
        return unauthorized(&e);
    }
    let key = key.unwrap_or_default();

    match prediction::monthly_usage(&state.pool, key).await {
        Ok(month_requests) => Json(UsageResponse { api_key: key.to_string(), month_requests }).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "usage query failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "detail": "usage query failed" }))).into_response()
        }
    }
}

/// `GET /debug/limits` — echo the caller's resolved policy. Requires a
/// valid key and reveals nothing about other callers' tier membership.
pub async fn debug_limits(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let key = api_key(&headers);
    if let Err(e) = auth::authenticate(&state.config, key) {
        return unauthorized(&e);
    }
    let policy = auth::resolve_tier(&state.config, key);

    Json(LimitsResponse {
        api_key: key.unwrap_or_default().to_string(),
        active_limit: policy.to_string(),
    })
    .into_response()
}
