// Folder domain model
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: i64,
    pub uid: String,
    pub title: String,
    #[serde(rename = "parentUid", default, skip_serializing_if = "Option::is_none")]
    pub parent_uid: Option<String>,
}

/// Body of `POST /api/folders`.
#[derive(Debug, Clone, Serialize)]
pub struct NewFolder<'a> {
    pub title: &'a str,
    #[serde(rename = "parentUid", skip_serializing_if = "Option::is_none")]
    pub parent_uid: Option<&'a str>,
}

/// A slash-delimited folder path such as `team/infra`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderPath {
    segments: Vec<String>,
}

impl FolderPath {
    pub fn parse(path: &str) -> Self {
        let segments = path
            .split('/')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// An empty path denotes the root folder.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}
