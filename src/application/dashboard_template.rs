// Dashboard template engine - Builds upload documents from the bundled template
use crate::domain::dashboard::{DashboardUpload, DatasourceRef};
use thiserror::Error;
use uuid::Uuid;

const BUNDLED_TEMPLATE: &str = include_str!("../../assets/dashboard.json");

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("dashboard template is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("dashboard template has no panels")]
    NoPanels,

    #[error("dashboard template panel has no query targets")]
    NoTargets,
}

/// A canonical single-panel time-series dashboard. The parsed template is
/// never mutated; every builder works on its own copy.
#[derive(Debug, Clone)]
pub struct DashboardTemplate {
    template: DashboardUpload,
}

impl DashboardTemplate {
    pub fn bundled() -> Result<Self, TemplateError> {
        Self::from_json(BUNDLED_TEMPLATE)
    }

    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        let template: DashboardUpload = serde_json::from_str(json)?;
        let panel = template
            .dashboard
            .panels
            .first()
            .ok_or(TemplateError::NoPanels)?;
        if panel.targets.is_empty() {
            return Err(TemplateError::NoTargets);
        }
        Ok(Self { template })
    }

    /// Start a new dashboard with a freshly generated uid.
    pub fn builder(&self) -> DashboardBuilder {
        DashboardBuilder {
            document: self.template.clone(),
            uid: Uuid::new_v4().to_string(),
            title: None,
            description: None,
            panel_title: None,
            raw_sql: String::new(),
            datasource: None,
        }
    }
}

pub struct DashboardBuilder {
    document: DashboardUpload,
    uid: String,
    title: Option<String>,
    description: Option<String>,
    panel_title: Option<String>,
    raw_sql: String,
    datasource: Option<DatasourceRef>,
}

impl DashboardBuilder {
    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Used for both the dashboard and its panel.
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Defaults to the dashboard title.
    pub fn panel_title(mut self, panel_title: Option<String>) -> Self {
        self.panel_title = panel_title;
        self
    }

    pub fn raw_sql(mut self, raw_sql: impl Into<String>) -> Self {
        self.raw_sql = raw_sql.into();
        self
    }

    pub fn datasource(mut self, datasource: DatasourceRef) -> Self {
        self.datasource = Some(datasource);
        self
    }

    pub fn build(self) -> Result<DashboardUpload, TemplateError> {
        let mut document = self.document;
        let dashboard = &mut document.dashboard;

        let title = self.title.unwrap_or_else(|| dashboard.title.clone());
        let description = self.description.unwrap_or_default();

        dashboard.uid = Some(self.uid);
        dashboard.title = title.clone();
        dashboard.description = Some(description.clone());

        let panel = dashboard.panels.first_mut().ok_or(TemplateError::NoPanels)?;
        panel.title = Some(self.panel_title.unwrap_or(title));
        panel.description = Some(description);

        if let Some(datasource) = &self.datasource {
            panel.datasource = Some(merge_datasource(panel.datasource.take(), datasource));
        }

        let target = panel.targets.first_mut().ok_or(TemplateError::NoTargets)?;
        target.raw_sql = Some(self.raw_sql);
        if let Some(datasource) = &self.datasource {
            target.datasource = Some(merge_datasource(target.datasource.take(), datasource));
        }

        Ok(document)
    }
}

/// Keep the template's datasource type unless the override names one.
fn merge_datasource(existing: Option<DatasourceRef>, with: &DatasourceRef) -> DatasourceRef {
    let existing_kind = existing.and_then(|datasource| datasource.kind);
    DatasourceRef {
        kind: with.kind.clone().or(existing_kind),
        uid: with.uid.clone(),
    }
}
