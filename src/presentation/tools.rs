// MCP tool registry
use crate::application::dashboard_service::CreateDashboardRequest;
use crate::application::grafana_api::GrafanaError;
use crate::presentation::app_state::AppState;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        router::tool::ToolRouter,
        wrapper::{Json, Parameters},
    },
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::sync::Arc;

type ToolJson = Json<Map<String, Value>>;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct GetOrCreateFolderArgs {
    /// Folder path, segments separated by `/`. Empty means the root folder.
    folder_name: String,
    /// Uid of the folder to start from. Defaults to the root.
    #[serde(default)]
    parent_uid: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct CreateDashboardArgs {
    /// Dashboard title.
    title: String,
    /// ClickHouse SQL for the panel.
    raw_sql: String,
    /// Description for the dashboard and its panel.
    #[serde(default)]
    description: Option<String>,
    /// Panel title. Defaults to the dashboard title.
    #[serde(default)]
    panel_title: Option<String>,
    /// Share the dashboard publicly. Defaults to true.
    #[serde(default = "default_make_public")]
    make_public: bool,
    /// Folder path such as `team/infra`. Empty puts the dashboard in the root folder.
    #[serde(default)]
    folder: String,
}

fn default_make_public() -> bool {
    true
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct CheckDashboardDataArgs {
    /// Uid of the dashboard to check.
    dashboard_uid: String,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
struct NoArgs {}

#[derive(Clone)]
pub struct GrafanaTools {
    tool_router: ToolRouter<Self>,
    state: Arc<AppState>,
}

#[tool_router]
impl GrafanaTools {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            state,
        }
    }

    #[tool(
        name = "get_or_create_folder",
        description = "Get the id of a folder by path (e.g. `team/infra`), creating any missing folders along the way. Returns `folder_id`, null for the root folder."
    )]
    async fn get_or_create_folder(
        &self,
        Parameters(args): Parameters<GetOrCreateFolderArgs>,
    ) -> Result<ToolJson, McpError> {
        let folder_id = self
            .state
            .folder_resolver
            .resolve(&args.folder_name, args.parent_uid.as_deref())
            .await
            .map_err(tool_error)?;

        let mut response = Map::new();
        response.insert("folder_id".to_string(), json!(folder_id));
        Ok(Json(response))
    }

    /// Create a Grafana dashboard with a single time-series panel backed by the
    /// ClickHouse datasource. The query is executed first and nothing is
    /// created if it fails.
    ///
    /// The SQL must follow the Grafana ClickHouse (v4+) time-series shape:
    /// - Select a DateTime or DateTime64 column aliased as `time`, then one or
    ///   more numeric columns. Each numeric alias becomes a series name; put a
    ///   string label column between `time` and the metric to split one metric
    ///   into several lines.
    /// - Filter on the dashboard range with `WHERE $__timeFilter(<time column>)`,
    ///   or `WHERE $__dateTimeFilter(<date column>, <datetime column>)` when the
    ///   table has separate date and datetime columns. Other macros and template
    ///   variables are not supported.
    /// - End with `GROUP BY time ORDER BY time` so points render oldest first.
    /// - Do not end the query with a semicolon.
    ///
    /// Example:
    /// `SELECT toStartOfInterval(event_time, INTERVAL 1 minute) AS time, count() AS value
    /// FROM events WHERE $__timeFilter(event_time) GROUP BY time ORDER BY time`
    ///
    /// Returns Grafana's save response, plus `public_url` when the dashboard was
    /// published.
    #[tool(name = "create_time_series_dashboard")]
    async fn create_time_series_dashboard(
        &self,
        Parameters(args): Parameters<CreateDashboardArgs>,
    ) -> Result<ToolJson, McpError> {
        let request = CreateDashboardRequest {
            title: args.title,
            raw_sql: args.raw_sql,
            description: args.description,
            panel_title: args.panel_title,
            make_public: args.make_public,
            folder: args.folder,
        };

        let outcome = self
            .state
            .dashboard_service
            .create_time_series_dashboard(request)
            .await
            .map_err(tool_error)?;
        Ok(Json(outcome.into_json()))
    }

    #[tool(
        name = "check_dashboard_data",
        description = "Re-run the first query of a dashboard over the dashboard's time range and report whether it returns data."
    )]
    async fn check_dashboard_data(
        &self,
        Parameters(args): Parameters<CheckDashboardDataArgs>,
    ) -> Result<ToolJson, McpError> {
        let check = self
            .state
            .dashboard_service
            .check_dashboard_data(&args.dashboard_uid)
            .await;
        to_object(&check)
    }

    #[tool(
        name = "check_connection",
        description = "Verify the Grafana URL and API token. Returns the server version, organization and number of datasources."
    )]
    async fn check_connection(
        &self,
        Parameters(_args): Parameters<NoArgs>,
    ) -> Result<ToolJson, McpError> {
        let report = self
            .state
            .connection_check
            .check()
            .await
            .map_err(tool_error)?;
        to_object(&report)
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for GrafanaTools {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Create and inspect Grafana dashboards backed by ClickHouse. Requires GRAFANA_API_TOKEN."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

fn tool_error(error: GrafanaError) -> McpError {
    match error {
        GrafanaError::MissingToken => McpError::invalid_request(error.to_string(), None),
        GrafanaError::Status { status, ref body } => McpError::internal_error(
            error.to_string(),
            Some(json!({"status": status, "body": body})),
        ),
        other => McpError::internal_error(other.to_string(), None),
    }
}

fn to_object<T: Serialize>(value: &T) -> Result<ToolJson, McpError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(Json(map)),
        Ok(_) => Err(McpError::internal_error("tool result is not a JSON object", None)),
        Err(e) => Err(McpError::internal_error(
            format!("failed to serialize tool result: {}", e),
            None,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_template::DashboardTemplate;
    use crate::application::fake_api::FakeGrafana;
    use crate::infrastructure::config::GrafanaSettings;

    fn tools(api: Arc<FakeGrafana>) -> GrafanaTools {
        let settings = GrafanaSettings {
            url: "https://grafana.example.com".to_string(),
            api_token: Some("secret".to_string()),
            datasource_uid: "Clickhouse".to_string(),
            datasource_type: "grafana-clickhouse-datasource".to_string(),
            timeout_seconds: None,
        };
        let state = AppState::new(api, &settings, DashboardTemplate::bundled().unwrap());
        GrafanaTools::new(Arc::new(state))
    }

    #[tokio::test]
    async fn test_folder_tool_returns_id() {
        let api = Arc::new(FakeGrafana::new().with_folder(7, "team-uid", "team", None));
        let response = tools(api)
            .get_or_create_folder(Parameters(GetOrCreateFolderArgs {
                folder_name: "team".to_string(),
                parent_uid: None,
            }))
            .await
            .unwrap();

        assert_eq!(response.0.get("folder_id"), Some(&json!(7)));
    }

    #[tokio::test]
    async fn test_folder_tool_root_is_null() {
        let response = tools(Arc::new(FakeGrafana::new()))
            .get_or_create_folder(Parameters(GetOrCreateFolderArgs {
                folder_name: String::new(),
                parent_uid: None,
            }))
            .await
            .unwrap();

        assert_eq!(response.0.get("folder_id"), Some(&Value::Null));
    }

    #[test]
    fn test_create_args_defaults() {
        let args: CreateDashboardArgs =
            serde_json::from_value(json!({"title": "CPU", "raw_sql": "SELECT 1"})).unwrap();

        assert!(args.make_public);
        assert_eq!(args.folder, "");
        assert_eq!(args.description, None);
        assert_eq!(args.panel_title, None);
    }

    #[tokio::test]
    async fn test_create_tool_reports_rejection() {
        let api = Arc::new(FakeGrafana::new().with_query_status(400, "bad"));
        let response = tools(api)
            .create_time_series_dashboard(Parameters(CreateDashboardArgs {
                title: "CPU".to_string(),
                raw_sql: "SELEC".to_string(),
                description: None,
                panel_title: None,
                make_public: true,
                folder: String::new(),
            }))
            .await
            .unwrap();

        assert_eq!(
            response.0.get("error"),
            Some(&json!("Query validation failed: Query failed with status 400: bad"))
        );
        assert_eq!(response.0.get("dashboard"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn test_check_tool_without_targets() {
        let api = Arc::new(FakeGrafana::new().with_dashboard(json!({
            "uid": "dash-1",
            "title": "CPU",
            "panels": [{"targets": []}]
        })));
        let response = tools(api)
            .check_dashboard_data(Parameters(CheckDashboardDataArgs {
                dashboard_uid: "dash-1".to_string(),
            }))
            .await
            .unwrap();

        assert_eq!(
            Value::Object(response.0),
            json!({"has_data": false, "error": "No queries found in panel"})
        );
    }

    #[tokio::test]
    async fn test_missing_token_is_a_tool_error() {
        let api = Arc::new(FakeGrafana::new().unauthenticated());
        let err = tools(api)
            .check_connection(Parameters(NoArgs::default()))
            .await
            .err().expect("expected tool error");

        assert_eq!(err.message, "GRAFANA_API_TOKEN environment variable is not set.");
    }

    #[test]
    fn test_registry_lists_all_tools() {
        let tools = tools(Arc::new(FakeGrafana::new()));
        let mut names: Vec<String> = tools
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();

        assert_eq!(
            names,
            [
                "check_connection",
                "check_dashboard_data",
                "create_time_series_dashboard",
                "get_or_create_folder",
            ]
        );
    }
}
