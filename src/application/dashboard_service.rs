// Dashboard service - Use case for provisioning time-series dashboards
use crate::application::dashboard_template::DashboardTemplate;
use crate::application::folder_resolver::FolderResolver;
use crate::application::grafana_api::{GrafanaApi, GrafanaError};
use crate::application::publisher::Publisher;
use crate::application::query_validator::QueryValidator;
use crate::domain::dashboard::DatasourceRef;
use crate::domain::query::{DataCheck, TimeRange};
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct CreateDashboardRequest {
    pub title: String,
    pub raw_sql: String,
    pub description: Option<String>,
    pub panel_title: Option<String>,
    pub make_public: bool,
    pub folder: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CreateDashboardOutcome {
    /// The query did not execute; nothing was created.
    Rejected { error: String },
    Created {
        response: Map<String, Value>,
        public_url: Option<String>,
    },
}

impl CreateDashboardOutcome {
    pub fn into_json(self) -> Map<String, Value> {
        match self {
            Self::Rejected { error } => {
                let mut map = Map::new();
                map.insert("error".to_string(), Value::String(error));
                map.insert("dashboard".to_string(), Value::Null);
                map
            }
            Self::Created {
                mut response,
                public_url,
            } => {
                if let Some(url) = public_url {
                    response.insert("public_url".to_string(), Value::String(url));
                }
                response
            }
        }
    }
}

#[derive(Clone)]
pub struct DashboardService {
    api: Arc<dyn GrafanaApi>,
    validator: QueryValidator,
    folders: FolderResolver,
    template: DashboardTemplate,
    publisher: Publisher,
    datasource: DatasourceRef,
}

impl DashboardService {
    pub fn new(
        api: Arc<dyn GrafanaApi>,
        validator: QueryValidator,
        folders: FolderResolver,
        template: DashboardTemplate,
        publisher: Publisher,
        datasource: DatasourceRef,
    ) -> Self {
        Self {
            api,
            validator,
            folders,
            template,
            publisher,
            datasource,
        }
    }

    /// Validate the query, resolve the folder, render and upload the
    /// dashboard, then optionally publish it. Publishing never fails the
    /// operation; a failed publish only drops `public_url`.
    pub async fn create_time_series_dashboard(
        &self,
        request: CreateDashboardRequest,
    ) -> Result<CreateDashboardOutcome, GrafanaError> {
        let validation = self
            .validator
            .validate(
                &request.raw_sql,
                &TimeRange::default(),
                self.datasource.uid.as_deref(),
            )
            .await;
        if !validation.is_valid {
            let error = validation.error.unwrap_or_default();
            tracing::info!("Rejected dashboard '{}': {}", request.title, error);
            return Ok(CreateDashboardOutcome::Rejected {
                error: format!("Query validation failed: {}", error),
            });
        }

        let folder_id = self.folders.resolve(&request.folder, None).await?;

        let builder = self.template.builder();
        let uid = builder.uid().to_string();
        let mut upload = builder
            .title(request.title.as_str())
            .description(request.description)
            .panel_title(request.panel_title)
            .raw_sql(request.raw_sql)
            .datasource(self.datasource.clone())
            .build()?;
        upload.folder_id = folder_id;

        let response = self.api.save_dashboard(&upload).await?;
        tracing::info!(
            "Uploaded dashboard '{}' (uid {}) to folder {:?}",
            request.title,
            uid,
            folder_id
        );

        let public_url = if request.make_public {
            match self.publisher.publish(&uid).await {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Failed to make dashboard {} public: {}", uid, e);
                    None
                }
            }
        } else {
            None
        };

        Ok(CreateDashboardOutcome::Created {
            response,
            public_url,
        })
    }

    pub async fn check_dashboard_data(&self, dashboard_uid: &str) -> DataCheck {
        self.validator.check_dashboard_data(dashboard_uid).await
    }
}
