// In-memory Grafana used by the service tests
use crate::application::grafana_api::{GrafanaApi, GrafanaError};
use crate::domain::connection::{Health, Organization};
use crate::domain::dashboard::{Dashboard, DashboardEnvelope, DashboardUpload};
use crate::domain::folder::Folder;
use crate::domain::public_dashboard::{PublicDashboard, PublicDashboardRequest};
use crate::domain::query::QueryRequest;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetDashboard(String),
    SaveDashboard(String),
    ListFolders(Option<String>),
    CreateFolder(String, Option<String>),
    Query(String),
    CreatePublic(String),
    GetPublic(String),
}

enum QueryReply {
    Ok(Value),
    Status(u16, String),
    Transport(String),
}

struct State {
    calls: Vec<Call>,
    folders: Vec<Folder>,
    next_folder_id: i64,
    dashboards: HashMap<String, Dashboard>,
    uploads: Vec<DashboardUpload>,
    query_reply: QueryReply,
    publish_fails: bool,
    keep_public_record: bool,
    published: HashMap<String, PublicDashboard>,
}

pub struct FakeGrafana {
    authenticated: bool,
    state: Mutex<State>,
}

impl FakeGrafana {
    pub fn new() -> Self {
        Self {
            authenticated: true,
            state: Mutex::new(State {
                calls: Vec::new(),
                folders: Vec::new(),
                next_folder_id: 100,
                dashboards: HashMap::new(),
                uploads: Vec::new(),
                query_reply: QueryReply::Ok(json!({"results": {}})),
                publish_fails: false,
                keep_public_record: true,
                published: HashMap::new(),
            }),
        }
    }

    pub fn unauthenticated(mut self) -> Self {
        self.authenticated = false;
        self
    }

    pub fn with_folder(self, id: i64, uid: &str, title: &str, parent_uid: Option<&str>) -> Self {
        self.state.lock().unwrap().folders.push(Folder {
            id,
            uid: uid.to_string(),
            title: title.to_string(),
            parent_uid: parent_uid.map(str::to_string),
        });
        self
    }

    pub fn with_dashboard(self, dashboard: Value) -> Self {
        let dashboard: Dashboard = serde_json::from_value(dashboard).unwrap();
        let uid = dashboard.uid.clone().unwrap();
        self.state.lock().unwrap().dashboards.insert(uid, dashboard);
        self
    }

    pub fn with_query_result(self, result: Value) -> Self {
        self.state.lock().unwrap().query_reply = QueryReply::Ok(result);
        self
    }

    pub fn with_query_status(self, status: u16, body: &str) -> Self {
        self.state.lock().unwrap().query_reply = QueryReply::Status(status, body.to_string());
        self
    }

    pub fn with_query_transport_error(self, message: &str) -> Self {
        self.state.lock().unwrap().query_reply = QueryReply::Transport(message.to_string());
        self
    }

    pub fn failing_publish(self) -> Self {
        self.state.lock().unwrap().publish_fails = true;
        self
    }

    /// Public dashboard creation succeeds but no record is stored for lookup.
    pub fn without_public_record(self) -> Self {
        self.state.lock().unwrap().keep_public_record = false;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn uploads(&self) -> Vec<DashboardUpload> {
        self.state.lock().unwrap().uploads.clone()
    }

    pub fn folders(&self) -> Vec<Folder> {
        self.state.lock().unwrap().folders.clone()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl GrafanaApi for FakeGrafana {
    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    async fn get_dashboard(&self, uid: &str) -> Result<Option<DashboardEnvelope>, GrafanaError> {
        self.record(Call::GetDashboard(uid.to_string()));
        let state = self.state.lock().unwrap();
        Ok(state
            .dashboards
            .get(uid)
            .cloned()
            .map(|dashboard| DashboardEnvelope { dashboard }))
    }

    async fn save_dashboard(
        &self,
        upload: &DashboardUpload,
    ) -> Result<Map<String, Value>, GrafanaError> {
        let uid = upload.dashboard.uid.clone().unwrap_or_default();
        self.record(Call::SaveDashboard(uid.clone()));
        self.state.lock().unwrap().uploads.push(upload.clone());

        let response = json!({
            "id": 1,
            "uid": uid,
            "url": format!("/d/{}/dashboard", uid),
            "status": "success",
            "version": 1
        });
        match response {
            Value::Object(map) => Ok(map),
            _ => unreachable!(),
        }
    }

    async fn list_folders(&self, parent_uid: Option<&str>) -> Result<Vec<Folder>, GrafanaError> {
        self.record(Call::ListFolders(parent_uid.map(str::to_string)));
        let state = self.state.lock().unwrap();
        Ok(state
            .folders
            .iter()
            .filter(|folder| folder.parent_uid.as_deref() == parent_uid)
            .cloned()
            .collect())
    }

    async fn create_folder(
        &self,
        title: &str,
        parent_uid: Option<&str>,
    ) -> Result<Folder, GrafanaError> {
        self.record(Call::CreateFolder(
            title.to_string(),
            parent_uid.map(str::to_string),
        ));
        let mut state = self.state.lock().unwrap();
        let id = state.next_folder_id;
        state.next_folder_id += 1;
        let folder = Folder {
            id,
            uid: format!("folder-{}", id),
            title: title.to_string(),
            parent_uid: parent_uid.map(str::to_string),
        };
        state.folders.push(folder.clone());
        Ok(folder)
    }

    async fn query(&self, request: &QueryRequest) -> Result<Value, GrafanaError> {
        self.record(Call::Query(request.queries[0].raw_sql.clone()));
        let state = self.state.lock().unwrap();
        match &state.query_reply {
            QueryReply::Ok(result) => Ok(result.clone()),
            QueryReply::Status(status, body) => Err(GrafanaError::Status {
                status: *status,
                body: body.clone(),
            }),
            QueryReply::Transport(message) => Err(GrafanaError::Transport(message.clone())),
        }
    }

    async fn create_public_dashboard(
        &self,
        dashboard_uid: &str,
        _request: &PublicDashboardRequest,
    ) -> Result<Value, GrafanaError> {
        self.record(Call::CreatePublic(dashboard_uid.to_string()));
        let mut state = self.state.lock().unwrap();
        if state.publish_fails {
            return Err(GrafanaError::Status {
                status: 403,
                body: "public dashboards are disabled".to_string(),
            });
        }
        let record = PublicDashboard {
            uid: Some(format!("pd-{}", dashboard_uid)),
            access_token: Some(format!("token-{}", dashboard_uid)),
            is_enabled: true,
            share: None,
        };
        if state.keep_public_record {
            state.published.insert(dashboard_uid.to_string(), record);
        }
        Ok(json!({"uid": format!("pd-{}", dashboard_uid)}))
    }

    async fn get_public_dashboard(
        &self,
        dashboard_uid: &str,
    ) -> Result<Option<PublicDashboard>, GrafanaError> {
        self.record(Call::GetPublic(dashboard_uid.to_string()));
        Ok(self.state.lock().unwrap().published.get(dashboard_uid).cloned())
    }

    async fn health(&self) -> Result<Health, GrafanaError> {
        Ok(Health {
            version: Some("11.2.0".to_string()),
            database: Some("ok".to_string()),
        })
    }

    async fn current_organization(&self) -> Result<Organization, GrafanaError> {
        Ok(Organization {
            id: 1,
            name: "Main Org.".to_string(),
        })
    }

    async fn list_datasources(&self) -> Result<Vec<Value>, GrafanaError> {
        Ok(vec![json!({"uid": "Clickhouse"})])
    }
}
