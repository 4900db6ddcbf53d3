//! Predict route — the authenticated, rate-limited prediction pipeline.
//!
//! DESIGN
//! ======
//! One handler runs the admission pipeline in order: caller key →
//! authentication → tier → rate limit → body validation → prediction →
//! log. Each stage short-circuits, so a rejected request never reaches
//! the predictor or the database. The body is taken as raw bytes and
//! parsed after the limit check to keep that ordering.
//!
//! Every response past the limiter carries the current-window headers;
//! counter-store failures fail closed (503), never a silent allow.

use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::json;

use crate::predictor::Features;
use crate::rate_limit::LimitDecision;
use crate::services::{auth, prediction};
use crate::state::AppState;

pub(crate) const API_KEY_HEADER: &str = "api-key";

// Lowercase per `HeaderName` requirements; header names are
// case-insensitive on the wire.
const HEADER_LIMIT: &str = "x-ratelimit-limit";
const HEADER_REMAINING: &str = "x-ratelimit-remaining";
const HEADER_PERIOD: &str = "x-ratelimit-period";

#[derive(Serialize)]
pub struct PredictResponse {
    pub predicted_price: f64,
}

#[derive(Serialize)]
pub(crate) struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

// =============================================================================
// CALLER IDENTITY
// =============================================================================

/// The `api-key` header value, trimmed, when present and non-empty.
pub(crate) fn api_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(API_KEY_HEADER)?
        .to_str()
        .ok()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Rate-limit partition key: the API key when presented, else the peer
/// address.
pub(crate) fn caller_key(headers: &HeaderMap, addr: SocketAddr) -> String {
    api_key(headers).map_or_else(|| addr.ip().to_string(), ToString::to_string)
}

// =============================================================================
// HANDLER
// =============================================================================

/// `POST /predict` — validate, predict, and log one price estimate.
pub async fn predict_price(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let caller = caller_key(&headers, addr);
    let key = api_key(&headers);

    if let Err(e) = auth::authenticate(&state.config, key) {
        return unauthorized(&e);
    }

    let policy = auth::resolve_tier(&state.config, key);
    let decision = match state.limiter.check_and_increment(&caller, policy).await {
        Ok(d) => d,
        Err(e) => {
            tracing::error!(error = %e, %caller, "rate limit store unavailable");
            return store_unavailable();
        }
    };
    if !decision.allowed {
        tracing::debug!(%caller, limit = decision.limit, "rate limit exceeded");
        return rate_limited(&decision);
    }

    let features = match parse_features(&body) {
        Ok(f) => f,
        Err(rejection) => return with_limit_headers(rejection, &decision),
    };

    let price = state.predictor.predict(&features);

    match prediction::log_prediction(&state.pool, &features, price, key).await {
        Ok(id) => tracing::debug!(%id, price, "prediction logged"),
        Err(e) => {
            // Synchronous-commit policy: an unlogged prediction is a
            // failed request.
            tracing::error!(error = %e, "failed to record prediction");
            let response = (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": "failed to record prediction" })),
            )
                .into_response();
            return with_limit_headers(response, &decision);
        }
    }

    with_limit_headers(Json(PredictResponse { predicted_price: price }).into_response(), &decision)
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Parse and range-check the feature payload. Returns a ready 422
/// response on failure so the handler can short-circuit.
pub(crate) fn parse_features(body: &[u8]) -> Result<Features, Response> {
    let features: Features = match serde_json::from_slice(body) {
        Ok(f) => f,
        Err(e) => {
            let detail = json!([{ "field": "body", "message": e.to_string() }]);
            return Err((StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": detail }))).into_response());
        }
    };
    if let Some(errors) = validate_features(&features) {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": errors }))).into_response());
    }
    Ok(features)
}

pub(crate) fn validate_features(features: &Features) -> Option<Vec<FieldError>> {
    let mut errors = Vec::new();
    if !(1..=10).contains(&features.overall_qual) {
        errors.push(FieldError { field: "OverallQual", message: "must be between 1 and 10" });
    }
    if features.gr_liv_area < 0.0 {
        errors.push(FieldError { field: "GrLivArea", message: "must not be negative" });
    }
    if features.garage_cars < 0 {
        errors.push(FieldError { field: "GarageCars", message: "must not be negative" });
    }
    if features.total_bsmt_sf < 0.0 {
        errors.push(FieldError { field: "TotalBsmtSF", message: "must not be negative" });
    }
    if errors.is_empty() { None } else { Some(errors) }
}

// =============================================================================
// RESPONSES
// =============================================================================

fn unauthorized(err: &auth::AuthError) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "detail": err.to_string() }))).into_response()
}

fn store_unavailable() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "detail": "rate limit store unavailable" })),
    )
        .into_response()
}

/// 429 with standard limit headers and machine-readable retry guidance.
pub(crate) fn rate_limited(decision: &LimitDecision) -> Response {
    let body = json!({
        "detail": "Rate limit exceeded",
        "retry_after": decision.retry_after_secs,
    });
    with_limit_headers((StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response(), decision)
}

/// Attach the current-window `X-RateLimit-*` headers, plus
/// `Retry-After` once the budget is spent.
pub(crate) fn with_limit_headers(mut response: Response, decision: &LimitDecision) -> Response {
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&decision.limit.to_string()) {
        headers.insert(HEADER_LIMIT, value);
    }
    if let Ok(value) = HeaderValue::from_str(&decision.remaining.to_string()) {
        headers.insert(HEADER_REMAINING, value);
    }
    if let Ok(value) = HeaderValue::from_str(&decision.period) {
        headers.insert(HEADER_PERIOD, value);
    }
    if decision.remaining == 0 {
        if let Ok(value) = HeaderValue::from_str(&decision.retry_after_secs.to_string()) {
            headers.insert(header::RETRY_AFTER, value);
        }
    }
    response
}

#[cfg(test)]
#[path = "predict_test.rs"]
mod tests;
