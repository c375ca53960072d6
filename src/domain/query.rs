// Datasource query domain models
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::dashboard::DatasourceRef;

pub const DEFAULT_TIME_FROM: &str = "now-30d";
pub const DEFAULT_TIME_TO: &str = "now";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(default = "default_from")]
    pub from: String,
    #[serde(default = "default_to")]
    pub to: String,
}

fn default_from() -> String {
    DEFAULT_TIME_FROM.to_string()
}

fn default_to() -> String {
    DEFAULT_TIME_TO.to_string()
}

impl TimeRange {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_FROM, DEFAULT_TIME_TO)
    }
}

/// Body of `POST /api/ds/query` carrying a single SQL target.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    pub queries: Vec<DataQuery>,
    pub range: TimeRange,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataQuery {
    #[serde(rename = "refId")]
    pub ref_id: String,
    pub datasource: DatasourceRef,
    #[serde(rename = "rawSql")]
    pub raw_sql: String,
    pub format: u8,
}

impl QueryRequest {
    pub fn single(raw_sql: &str, range: &TimeRange, datasource: DatasourceRef) -> Self {
        Self {
            queries: vec![DataQuery {
                ref_id: "A".to_string(),
                datasource,
                raw_sql: raw_sql.to_string(),
                format: 0,
            }],
            range: range.clone(),
            from: range.from.clone(),
            to: range.to.clone(),
        }
    }
}

/// Outcome of executing a candidate query. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryValidation {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl QueryValidation {
    pub fn valid(result: Value) -> Self {
        Self {
            is_valid: true,
            error: None,
            result: Some(result),
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(error.into()),
            result: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DataSummary {
    pub has_data: bool,
    pub total_datapoints: usize,
}

impl DataSummary {
    /// Walk `results -> frames -> data -> values` and count the entries of
    /// every non-empty value column.
    pub fn from_query_result(result: &Value) -> Self {
        let mut summary = Self::default();

        let Some(results) = result.get("results").and_then(Value::as_object) else {
            return summary;
        };

        for ref_result in results.values() {
            let Some(frames) = ref_result.get("frames").and_then(Value::as_array) else {
                continue;
            };
            for frame in frames {
                let Some(columns) = frame
                    .get("data")
                    .and_then(|data| data.get("values"))
                    .and_then(Value::as_array)
                else {
                    continue;
                };
                for column in columns {
                    if let Some(values) = column.as_array() {
                        if !values.is_empty() {
                            summary.has_data = true;
                            summary.total_datapoints += values.len();
                        }
                    }
                }
            }
        }

        summary
    }
}

/// Report returned by the dashboard data check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataCheck {
    pub has_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_datapoints: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DataCheck {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            has_data: false,
            total_datapoints: None,
            time_range: None,
            query: None,
            error: Some(error.into()),
        }
    }

    pub fn completed(summary: DataSummary, time_range: TimeRange, query: String) -> Self {
        Self {
            has_data: summary.has_data,
            total_datapoints: Some(summary.total_datapoints),
            time_range: Some(time_range),
            query: Some(query),
            error: None,
        }
    }
}
