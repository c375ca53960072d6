use crate::domain::dashboard::DatasourceRef;
use serde::Deserialize;

pub const DEFAULT_GRAFANA_URL: &str = "http://pytorchci.grafana.net";
pub const DEFAULT_DATASOURCE_UID: &str = "Clickhouse";
pub const DEFAULT_DATASOURCE_TYPE: &str = "grafana-clickhouse-datasource";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub grafana: GrafanaSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GrafanaSettings {
    pub url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    pub datasource_uid: String,
    pub datasource_type: String,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl GrafanaSettings {
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    pub fn datasource(&self) -> DatasourceRef {
        DatasourceRef::new(&self.datasource_type, &self.datasource_uid)
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Stdio,
    Http,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub transport: Transport,
    pub bind_addr: String,
}

/// Environment variables and the settings keys they override.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("GRAFANA_URL", "grafana.url"),
    ("GRAFANA_API_TOKEN", "grafana.api_token"),
    ("GRAFANA_DATASOURCE_UID", "grafana.datasource_uid"),
    ("GRAFANA_DATASOURCE_TYPE", "grafana.datasource_type"),
    ("GRAFANA_TIMEOUT_SECONDS", "grafana.timeout_seconds"),
    ("MCP_TRANSPORT", "server.transport"),
    ("MCP_BIND_ADDR", "server.bind_addr"),
];

pub fn load_config() -> anyhow::Result<AppConfig> {
    load_config_from(env_non_empty)
}

/// Defaults, then the optional `config/grafana` file, then `lookup`.
pub fn load_config_from<F>(lookup: F) -> anyhow::Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = config::Config::builder()
        .set_default("grafana.url", DEFAULT_GRAFANA_URL)?
        .set_default("grafana.datasource_uid", DEFAULT_DATASOURCE_UID)?
        .set_default("grafana.datasource_type", DEFAULT_DATASOURCE_TYPE)?
        .set_default("server.transport", "stdio")?
        .set_default("server.bind_addr", DEFAULT_BIND_ADDR)?
        .add_source(config::File::with_name("config/grafana").required(false));

    for (var, key) in ENV_OVERRIDES {
        builder = builder.set_override_option(*key, lookup(var))?;
    }

    let settings = builder.build()?;
    let mut config: AppConfig = settings.try_deserialize()?;
    config.grafana.api_token = config
        .grafana
        .api_token
        .filter(|token| !token.trim().is_empty());

    Ok(config)
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
