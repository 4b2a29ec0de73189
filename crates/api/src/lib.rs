pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use engine::BotHandle;
use watcher::CommandRouter;

/// Shared application state injected into every route handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<CommandRouter>,
    pub bot: BotHandle,
    pub symbol_name: String,
    pub renko_mode: String,
}

/// Build the full route tree. Split out of `serve` so tests can drive it
/// without a socket.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods(Any);

    Router::new()
        .merge(routes::method_router())
        .merge(routes::event_router())
        .merge(routes::health_router())
        .with_state(state)
        .layer(cors)
}

/// Build and run the Axum API server.
pub async fn serve(state: AppState, port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = app(state);

    info!(%addr, "Direct-method API listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}
