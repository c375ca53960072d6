// HTTP transport - health check and the streamable MCP endpoint
use crate::presentation::app_state::AppState;
use crate::presentation::tools::GrafanaTools;
use axum::{Router, routing::get};
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// `/healthz` plus the MCP service at `/mcp`. Every MCP session gets its own
/// `GrafanaTools` over the shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    let mcp_service = StreamableHttpService::new(
        move || Ok(GrafanaTools::new(state.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    Router::new()
        .route("/healthz", get(health_check))
        .nest_service("/mcp", mcp_service)
        .layer(TraceLayer::new_for_http())
}
