// Main entry point - Dependency injection and transport setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use rmcp::{ServiceExt, transport::stdio};
use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_template::DashboardTemplate;
use crate::application::grafana_api::GrafanaApi;
use crate::infrastructure::config::{Transport, load_config};
use crate::infrastructure::grafana_client::GrafanaClient;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::build_router;
use crate::presentation::tools::GrafanaTools;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout belongs to the stdio transport
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = load_config().context("failed to load configuration")?;
    tracing::info!(
        "Starting grafana-dashboard-mcp against {} (datasource {})",
        config.grafana.base_url(),
        config.grafana.datasource_uid
    );
    if config.grafana.api_token.is_none() {
        tracing::warn!("GRAFANA_API_TOKEN is not set; tool calls will fail until it is configured");
    }

    // Gateway (infrastructure layer)
    let api: Arc<dyn GrafanaApi> = Arc::new(
        GrafanaClient::new(&config.grafana).context("failed to build Grafana client")?,
    );

    // Services (application layer)
    let template = DashboardTemplate::bundled().context("bundled dashboard template is invalid")?;
    let state = Arc::new(AppState::new(api, &config.grafana, template));

    match config.server.transport {
        Transport::Stdio => {
            let service = GrafanaTools::new(state)
                .serve(stdio())
                .await
                .inspect_err(|e| tracing::error!("MCP serve error: {:?}", e))?;
            service.waiting().await?;
        }
        Transport::Http => {
            let addr: SocketAddr = config
                .server
                .bind_addr
                .parse()
                .with_context(|| format!("invalid bind address {}", config.server.bind_addr))?;
            tracing::info!("Serving MCP over HTTP on {}/mcp", addr);

            axum::serve(tokio::net::TcpListener::bind(addr).await?, build_router(state)).await?;
        }
    }

    Ok(())
}
