// Public dashboard domain model
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareMode {
    Public,
    Email,
}

/// Body of `POST /api/dashboards/uid/{uid}/public-dashboards/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicDashboardRequest {
    pub is_enabled: bool,
    pub time_selection_enabled: bool,
    pub share: ShareMode,
}

impl Default for PublicDashboardRequest {
    fn default() -> Self {
        Self {
            is_enabled: true,
            time_selection_enabled: true,
            share: ShareMode::Public,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicDashboard {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub share: Option<ShareMode>,
}

impl PublicDashboard {
    /// Externally reachable URL, `{base}/public-dashboards/{token}`.
    pub fn public_url(&self, base_url: &str) -> Option<String> {
        match (self.uid.as_deref(), self.access_token.as_deref()) {
            (Some(uid), Some(token)) if !uid.is_empty() && !token.is_empty() => Some(format!(
                "{}/public-dashboards/{}",
                base_url.trim_end_matches('/'),
                token
            )),
            _ => None,
        }
    }
}
