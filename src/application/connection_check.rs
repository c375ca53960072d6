// Connection check - Verifies the configured credential against Grafana
use crate::application::grafana_api::{GrafanaApi, GrafanaError};
use crate::domain::connection::ConnectionReport;
use std::sync::Arc;

#[derive(Clone)]
pub struct ConnectionCheck {
    api: Arc<dyn GrafanaApi>,
}

impl ConnectionCheck {
    pub fn new(api: Arc<dyn GrafanaApi>) -> Self {
        Self { api }
    }

    pub async fn check(&self) -> Result<ConnectionReport, GrafanaError> {
        if !self.api.is_authenticated() {
            return Err(GrafanaError::MissingToken);
        }

        let health = self.api.health().await?;
        let org = self.api.current_organization().await?;
        let datasources = self.api.list_datasources().await?;

        let report = ConnectionReport::new(health, org, datasources.len());
        tracing::info!(
            "Connected to Grafana {} (organization {})",
            report.version,
            report.organization
        );
        Ok(report)
    }
}
