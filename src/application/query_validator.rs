// Query validation service - Executes candidate SQL against the datasource
use crate::application::grafana_api::{GrafanaApi, GrafanaError};
use crate::domain::dashboard::DatasourceRef;
use crate::domain::query::{DataCheck, DataSummary, QueryRequest, QueryValidation, TimeRange};
use std::sync::Arc;

#[derive(Clone)]
pub struct QueryValidator {
    api: Arc<dyn GrafanaApi>,
    datasource: DatasourceRef,
}

impl QueryValidator {
    pub fn new(api: Arc<dyn GrafanaApi>, datasource: DatasourceRef) -> Self {
        Self { api, datasource }
    }

    /// Run `raw_sql` over `range` and classify the response. Failures of any
    /// kind are folded into an invalid result.
    pub async fn validate(
        &self,
        raw_sql: &str,
        range: &TimeRange,
        datasource_uid: Option<&str>,
    ) -> QueryValidation {
        if !self.api.is_authenticated() {
            return QueryValidation::invalid(GrafanaError::MissingToken.to_string());
        }

        let mut datasource = self.datasource.clone();
        if let Some(uid) = datasource_uid.filter(|uid| !uid.is_empty()) {
            datasource.uid = Some(uid.to_string());
        }

        let request = QueryRequest::single(raw_sql, range, datasource);
        match self.api.query(&request).await {
            Ok(result) => QueryValidation::valid(result),
            Err(GrafanaError::Status { status, body }) => {
                tracing::debug!("Query rejected with status {}", status);
                QueryValidation::invalid(format!("Query failed with status {}: {}", status, body))
            }
            Err(e) => QueryValidation::invalid(e.to_string()),
        }
    }

    /// Re-run the first query of a stored dashboard over its own time range
    /// and report whether it returns any datapoints.
    pub async fn check_dashboard_data(&self, dashboard_uid: &str) -> DataCheck {
        if !self.api.is_authenticated() {
            return DataCheck::failed(GrafanaError::MissingToken.to_string());
        }

        let dashboard = match self.api.get_dashboard(dashboard_uid).await {
            Ok(Some(envelope)) => envelope.dashboard,
            Ok(None) => return DataCheck::failed(format!("Dashboard {} not found", dashboard_uid)),
            Err(e) => return DataCheck::failed(e.to_string()),
        };

        let time_range = dashboard.time_range();

        let Some(panel) = dashboard.panels.first() else {
            return DataCheck::failed("No panels found in dashboard");
        };
        let Some(target) = panel.targets.first() else {
            return DataCheck::failed("No queries found in panel");
        };
        let Some(raw_sql) = target.sql() else {
            return DataCheck::failed("No SQL query found");
        };

        let datasource_uid = target
            .datasource
            .as_ref()
            .and_then(|datasource| datasource.uid.as_deref());

        let validation = self.validate(raw_sql, &time_range, datasource_uid).await;
        let Some(result) = validation.result.filter(|_| validation.is_valid) else {
            return DataCheck::failed(validation.error.unwrap_or_default());
        };

        let summary = DataSummary::from_query_result(&result);
        tracing::debug!(
            "Dashboard {} returned {} datapoints",
            dashboard_uid,
            summary.total_datapoints
        );

        DataCheck::completed(summary, time_range, raw_sql.to_string())
    }
}
