// Connection check domain model
use serde::{Deserialize, Serialize};

/// Response of `GET /api/health`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Health {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
}

/// Response of `GET /api/org`.
#[derive(Debug, Clone, Deserialize)]
pub struct Organization {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionReport {
    pub version: String,
    pub database: String,
    pub organization: String,
    pub organization_id: i64,
    pub datasource_count: usize,
}

impl ConnectionReport {
    pub fn new(health: Health, org: Organization, datasource_count: usize) -> Self {
        Self {
            version: health.version.unwrap_or_else(|| "unknown".to_string()),
            database: health.database.unwrap_or_else(|| "unknown".to_string()),
            organization: org.name,
            organization_id: org.id,
            datasource_count,
        }
    }
}
