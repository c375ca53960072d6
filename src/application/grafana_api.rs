// Gateway trait for the Grafana REST API
use crate::domain::connection::{Health, Organization};
use crate::domain::dashboard::{DashboardEnvelope, DashboardUpload};
use crate::domain::folder::Folder;
use crate::domain::public_dashboard::{PublicDashboard, PublicDashboardRequest};
use crate::domain::query::QueryRequest;
use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use super::dashboard_template::TemplateError;

#[derive(Debug, Error)]
pub enum GrafanaError {
    #[error("GRAFANA_API_TOKEN environment variable is not set.")]
    MissingToken,

    #[error("Grafana returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Connection, timeout or body-read failure; holds the reqwest message so
    /// this layer stays independent of the HTTP client.
    #[error("request to Grafana failed: {0}")]
    Transport(String),

    #[error("unexpected response from Grafana: {0}")]
    Decode(String),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Each method issues at most one request. Lookups that may legitimately
/// miss return `Ok(None)` on 404.
#[async_trait]
pub trait GrafanaApi: Send + Sync {
    /// Whether a bearer credential is configured.
    fn is_authenticated(&self) -> bool;

    async fn get_dashboard(&self, uid: &str) -> Result<Option<DashboardEnvelope>, GrafanaError>;

    async fn save_dashboard(
        &self,
        upload: &DashboardUpload,
    ) -> Result<Map<String, Value>, GrafanaError>;

    /// Folders directly under `parent_uid`, or top-level folders for `None`.
    async fn list_folders(&self, parent_uid: Option<&str>) -> Result<Vec<Folder>, GrafanaError>;

    async fn create_folder(
        &self,
        title: &str,
        parent_uid: Option<&str>,
    ) -> Result<Folder, GrafanaError>;

    /// Raw `/api/ds/query` response body.
    async fn query(&self, request: &QueryRequest) -> Result<Value, GrafanaError>;

    async fn create_public_dashboard(
        &self,
        dashboard_uid: &str,
        request: &PublicDashboardRequest,
    ) -> Result<Value, GrafanaError>;

    async fn get_public_dashboard(
        &self,
        dashboard_uid: &str,
    ) -> Result<Option<PublicDashboard>, GrafanaError>;

    async fn health(&self) -> Result<Health, GrafanaError>;

    async fn current_organization(&self) -> Result<Organization, GrafanaError>;

    async fn list_datasources(&self) -> Result<Vec<Value>, GrafanaError>;
}
