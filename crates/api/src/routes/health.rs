use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::AppState;

pub fn health_router() -> Router<AppState> {
    Router::new().route("/healthz", get(healthz))
}

/// Health check endpoint. Used by the watcher's ops scripts.
async fn healthz(State(state): State<AppState>) -> Json<Value> {
    let telemetry = if state.bot.telemetry_enabled() {
        "enabled"
    } else {
        "disabled"
    };
    Json(json!({
        "status": "ok",
        "telemetry": telemetry,
        "symbol": state.symbol_name,
        "renkomode": state.renko_mode,
    }))
}
