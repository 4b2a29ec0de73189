use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use common::ChartSnapshot;
use engine::HostEvent;

use crate::AppState;

pub fn event_router() -> Router<AppState> {
    Router::new()
        .route("/events/bar", post(bar_closed))
        .route("/events/tick", post(tick))
}

#[derive(Deserialize, Default)]
struct TickRequest {
    #[serde(default)]
    snapshot: Option<ChartSnapshot>,
}

async fn bar_closed(
    State(state): State<AppState>,
    Json(snapshot): Json<ChartSnapshot>,
) -> (StatusCode, Json<Value>) {
    forward(&state, HostEvent::BarClosed(snapshot)).await
}

/// Ticks may arrive with an empty body; the bot then uses its cached chart state.
async fn tick(State(state): State<AppState>, body: Bytes) -> (StatusCode, Json<Value>) {
    let request = if body.is_empty() {
        TickRequest::default()
    } else {
        match serde_json::from_slice::<TickRequest>(&body) {
            Ok(r) => r,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": e.to_string() })),
                )
            }
        }
    };
    forward(
        &state,
        HostEvent::Tick {
            snapshot: request.snapshot,
        },
    )
    .await
}

async fn forward(state: &AppState, event: HostEvent) -> (StatusCode, Json<Value>) {
    match state.bot.publish(event).await {
        Ok(()) => (StatusCode::ACCEPTED, Json(json!({ "status": "accepted" }))),
        Err(e) => {
            warn!(error = %e, "Dropping host event");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": e.to_string() })),
            )
        }
    }
}
