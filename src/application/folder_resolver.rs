// Folder resolution service - Maps a folder path to a Grafana folder id
use crate::application::grafana_api::{GrafanaApi, GrafanaError};
use crate::domain::folder::FolderPath;
use std::sync::Arc;

#[derive(Clone)]
pub struct FolderResolver {
    api: Arc<dyn GrafanaApi>,
}

impl FolderResolver {
    pub fn new(api: Arc<dyn GrafanaApi>) -> Self {
        Self { api }
    }

    /// Walk `path` from `parent_uid` (or the root), descending into each
    /// segment and creating it when missing. Returns the id of the last
    /// folder, or `None` for an empty path.
    ///
    /// Folders are matched by exact title and the first match wins. Nothing
    /// is cached and nothing is locked: two callers creating the same new
    /// segment at once can both succeed and leave duplicate folders.
    pub async fn resolve(
        &self,
        path: &str,
        parent_uid: Option<&str>,
    ) -> Result<Option<i64>, GrafanaError> {
        let path = FolderPath::parse(path);
        let mut parent_uid = parent_uid.map(str::to_string);
        let mut folder_id = None;

        for segment in path.segments() {
            let folders = self.api.list_folders(parent_uid.as_deref()).await?;

            let folder = match folders.into_iter().find(|folder| &folder.title == segment) {
                Some(existing) => existing,
                None => {
                    let created = self
                        .api
                        .create_folder(segment, parent_uid.as_deref())
                        .await?;
                    tracing::info!(
                        "Created folder '{}' (uid {}) under {:?}",
                        created.title,
                        created.uid,
                        parent_uid
                    );
                    created
                }
            };

            parent_uid = Some(folder.uid);
            folder_id = Some(folder.id);
        }

        Ok(folder_id)
    }
}
