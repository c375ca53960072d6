// Dashboard domain model
//
// Only the fields this service reads or substitutes are typed. Everything
// else in a Grafana document is carried through untouched in `extra`.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::query::TimeRange;

/// Accepts both the object form and the legacy plain-string form
/// (`"datasource": "Clickhouse"`), which is read as the uid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DatasourceRepr")]
pub struct DatasourceRef {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DatasourceRepr {
    Uid(String),
    Ref {
        #[serde(rename = "type", default)]
        kind: Option<String>,
        #[serde(default)]
        uid: Option<String>,
    },
}

impl From<DatasourceRepr> for DatasourceRef {
    fn from(repr: DatasourceRepr) -> Self {
        match repr {
            DatasourceRepr::Uid(uid) => Self {
                kind: None,
                uid: Some(uid),
            },
            DatasourceRepr::Ref { kind, uid } => Self { kind, uid },
        }
    }
}

impl DatasourceRef {
    pub fn new(kind: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            uid: Some(uid.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    #[serde(rename = "rawSql", default, skip_serializing_if = "Option::is_none")]
    pub raw_sql: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource: Option<DatasourceRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Target {
    /// The target's SQL, if it has any non-empty text.
    pub fn sql(&self) -> Option<&str> {
        self.raw_sql.as_deref().filter(|sql| !sql.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource: Option<DatasourceRef>,
    #[serde(default)]
    pub targets: Vec<Target>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeRange>,
    #[serde(default)]
    pub panels: Vec<Panel>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Dashboard {
    pub fn time_range(&self) -> TimeRange {
        self.time.clone().unwrap_or_default()
    }
}

/// Payload for `POST /api/dashboards/db`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardUpload {
    pub dashboard: Dashboard,
    #[serde(rename = "folderId", default)]
    pub folder_id: Option<i64>,
    #[serde(default)]
    pub overwrite: bool,
}

/// Response of `GET /api/dashboards/uid/{uid}`.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardEnvelope {
    pub dashboard: Dashboard,
}
