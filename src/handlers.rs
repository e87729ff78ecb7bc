use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::aggregate::Engine;
use crate::domain::Domain;
use crate::error::{ApiError, ApiResult};
use crate::request;
use crate::types::{HealthResponse, PredictionResponse};

// ---------- Server state ----------

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}

impl AppState {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

fn body(payload: Result<Json<Value>, JsonRejection>) -> ApiResult<Value> {
    payload
        .map(|Json(v)| v)
        .map_err(|e| ApiError::MalformedBody(e.body_text()))
}

// ---------- Handlers ----------

async fn transport(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<PredictionResponse>> {
    let days = request::parse_transport(&body(payload)?)?;
    let predictions = state.engine.aggregate(Domain::Transport, &days)?;
    Ok(Json(PredictionResponse::success(Domain::Transport, predictions)))
}

async fn explosive(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<PredictionResponse>> {
    let days = request::parse_explosive(&body(payload)?)?;
    let predictions = state.engine.aggregate(Domain::Explosives, &days)?;
    Ok(Json(PredictionResponse::success(Domain::Explosives, predictions)))
}

async fn fuel(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<PredictionResponse>> {
    let days = request::parse_fuel(&body(payload)?)?;
    let predictions = state.engine.aggregate(Domain::Fuel, &days)?;
    Ok(Json(PredictionResponse::success(Domain::Fuel, predictions)))
}

async fn electricity(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<PredictionResponse>> {
    let (state_name, readings) = request::parse_electricity(&body(payload)?)?;
    let days = request::inject_state(readings, &state_name);
    let predictions = state.engine.aggregate(Domain::Electricity, &days)?;
    Ok(Json(
        PredictionResponse::success(Domain::Electricity, predictions).with_state(state_name),
    ))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let timestamp_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default();
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        domains: state.engine.domains(),
        timestamp_ms,
    })
}

/// Prediction and health routes over a shared engine.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ml/transport", post(transport))
        .route("/ml/explosive", post(explosive))
        .route("/ml/fuel", post(fuel))
        .route("/ml/electricity", post(electricity))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// [`router`] plus permissive CORS for browser dashboards.
pub fn router_with_cors(state: AppState) -> Router {
    router(state).layer(CorsLayer::permissive())
}
