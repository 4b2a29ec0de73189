use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::debug;

use common::CommandResponse;

use crate::AppState;

pub fn method_router() -> Router<AppState> {
    Router::new().route("/methods/:name", post(invoke_method))
}

/// Direct method invocation from the watcher. The body is passed through
/// untouched so the router decides what counts as malformed.
async fn invoke_method(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> (StatusCode, Json<CommandResponse>) {
    debug!(method = %name, bytes = body.len(), "Direct method call");
    let resp = state.router.invoke(&name, &body);
    let status = StatusCode::from_u16(resp.code).unwrap_or(StatusCode::UNAUTHORIZED);
    (status, Json(resp))
}
