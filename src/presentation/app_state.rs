// Application state shared by the tool handlers
use crate::application::connection_check::ConnectionCheck;
use crate::application::dashboard_service::DashboardService;
use crate::application::dashboard_template::DashboardTemplate;
use crate::application::folder_resolver::FolderResolver;
use crate::application::grafana_api::GrafanaApi;
use crate::application::publisher::Publisher;
use crate::application::query_validator::QueryValidator;
use crate::infrastructure::config::GrafanaSettings;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
    pub folder_resolver: FolderResolver,
    pub connection_check: ConnectionCheck,
}

impl AppState {
    pub fn new(
        api: Arc<dyn GrafanaApi>,
        settings: &GrafanaSettings,
        template: DashboardTemplate,
    ) -> Self {
        let datasource = settings.datasource();
        let folder_resolver = FolderResolver::new(api.clone());
        let validator = QueryValidator::new(api.clone(), datasource.clone());
        let publisher = Publisher::new(api.clone(), settings.base_url().to_string());

        let dashboard_service = DashboardService::new(
            api.clone(),
            validator,
            folder_resolver.clone(),
            template,
            publisher,
            datasource,
        );

        Self {
            dashboard_service,
            folder_resolver,
            connection_check: ConnectionCheck::new(api),
        }
    }
}
