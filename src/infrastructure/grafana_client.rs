// Grafana HTTP client - reqwest implementation of the gateway trait
use crate::application::grafana_api::{GrafanaApi, GrafanaError};
use crate::domain::connection::{Health, Organization};
use crate::domain::dashboard::{DashboardEnvelope, DashboardUpload};
use crate::domain::folder::{Folder, NewFolder};
use crate::domain::public_dashboard::{PublicDashboard, PublicDashboardRequest};
use crate::domain::query::QueryRequest;
use crate::infrastructure::config::GrafanaSettings;
use async_trait::async_trait;
use reqwest::{header, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct GrafanaClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GrafanaClient {
    pub fn new(settings: &GrafanaSettings) -> Result<Self, GrafanaError> {
        let mut builder = reqwest::Client::builder();
        if let Some(seconds) = settings.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let http = builder
            .build()
            .map_err(|e| GrafanaError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: settings.base_url().to_string(),
            token: settings.api_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn public_dashboard_path(dashboard_uid: &str) -> String {
        format!(
            "/api/dashboards/uid/{}/public-dashboards/",
            urlencoding::encode(dashboard_uid)
        )
    }

    /// Build an authenticated request. Fails before touching the network
    /// when no token is configured.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, GrafanaError> {
        let token = self.token.as_deref().ok_or(GrafanaError::MissingToken)?;
        tracing::debug!("Grafana request: {} {}", method, path);
        Ok(self
            .http
            .request(method, self.url(path))
            .bearer_auth(token)
            .header(header::ACCEPT, "application/json"))
    }

    async fn send(request: RequestBuilder) -> Result<Response, GrafanaError> {
        request
            .send()
            .await
            .map_err(|e| GrafanaError::Transport(e.to_string()))
    }

    async fn read_text(response: Response) -> Result<String, GrafanaError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GrafanaError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(GrafanaError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    fn decode<T: DeserializeOwned>(body: &str) -> Result<T, GrafanaError> {
        serde_json::from_str(body).map_err(|e| GrafanaError::Decode(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GrafanaError> {
        let response = Self::send(self.request(Method::GET, path)?).await?;
        Self::decode(&Self::read_text(response).await?)
    }

    /// GET that treats 404, an empty body and `null` as "not found".
    async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, GrafanaError> {
        let response = Self::send(self.request(Method::GET, path)?).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = Self::read_text(response).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        Self::decode(&body)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, GrafanaError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = Self::send(self.request(Method::POST, path)?.json(body)).await?;
        Self::decode(&Self::read_text(response).await?)
    }
}

#[async_trait]
impl GrafanaApi for GrafanaClient {
    fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    async fn get_dashboard(&self, uid: &str) -> Result<Option<DashboardEnvelope>, GrafanaError> {
        let path = format!("/api/dashboards/uid/{}", urlencoding::encode(uid));
        self.get_optional(&path).await
    }

    async fn save_dashboard(
        &self,
        upload: &DashboardUpload,
    ) -> Result<Map<String, Value>, GrafanaError> {
        self.post_json("/api/dashboards/db", upload).await
    }

    async fn list_folders(&self, parent_uid: Option<&str>) -> Result<Vec<Folder>, GrafanaError> {
        let mut request = self.request(Method::GET, "/api/folders")?;
        if let Some(parent_uid) = parent_uid {
            request = request.query(&[("parentUid", parent_uid)]);
        }
        let response = Self::send(request).await?;
        Self::decode(&Self::read_text(response).await?)
    }

    async fn create_folder(
        &self,
        title: &str,
        parent_uid: Option<&str>,
    ) -> Result<Folder, GrafanaError> {
        self.post_json("/api/folders", &NewFolder { title, parent_uid })
            .await
    }

    async fn query(&self, request: &QueryRequest) -> Result<Value, GrafanaError> {
        self.post_json("/api/ds/query", request).await
    }

    async fn create_public_dashboard(
        &self,
        dashboard_uid: &str,
        request: &PublicDashboardRequest,
    ) -> Result<Value, GrafanaError> {
        self.post_json(&Self::public_dashboard_path(dashboard_uid), request)
            .await
    }

    async fn get_public_dashboard(
        &self,
        dashboard_uid: &str,
    ) -> Result<Option<PublicDashboard>, GrafanaError> {
        self.get_optional(&Self::public_dashboard_path(dashboard_uid))
            .await
    }

    async fn health(&self) -> Result<Health, GrafanaError> {
        self.get_json("/api/health").await
    }

    async fn current_organization(&self) -> Result<Organization, GrafanaError> {
        self.get_json("/api/org").await
    }

    async fn list_datasources(&self) -> Result<Vec<Value>, GrafanaError> {
        self.get_json("/api/datasources").await
    }
}
