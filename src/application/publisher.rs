// Publishing service - Shares dashboards publicly and resolves their URL
use crate::application::grafana_api::{GrafanaApi, GrafanaError};
use crate::domain::public_dashboard::PublicDashboardRequest;
use std::sync::Arc;

#[derive(Clone)]
pub struct Publisher {
    api: Arc<dyn GrafanaApi>,
    base_url: String,
}

impl Publisher {
    pub fn new(api: Arc<dyn GrafanaApi>, base_url: String) -> Self {
        Self {
            api,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Enable the public view of a dashboard, then fetch the record to
    /// compose its URL. `Ok(None)` when the record is missing or incomplete.
    pub async fn publish(&self, dashboard_uid: &str) -> Result<Option<String>, GrafanaError> {
        self.api
            .create_public_dashboard(dashboard_uid, &PublicDashboardRequest::default())
            .await?;

        let Some(record) = self.api.get_public_dashboard(dashboard_uid).await? else {
            tracing::warn!("No public dashboard record found for {}", dashboard_uid);
            return Ok(None);
        };

        tracing::debug!(
            "Public dashboard for {}: enabled={}, share={:?}",
            dashboard_uid,
            record.is_enabled,
            record.share
        );

        Ok(record.public_url(&self.base_url))
    }
}
