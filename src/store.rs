use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;

use crate::project::Project;

/// In-memory project list mirrored to a single JSON blob on every mutation.
///
/// The list is kept newest-first; `add` prepends. Load failures are never
/// fatal: an absent or malformed blob yields an empty list.
pub struct ProjectStore {
    path: PathBuf,
    projects: Vec<Project>,
}

impl ProjectStore {
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();

        let projects = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Vec<Project>>(&content) {
                Ok(list) => list,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Malformed project store, starting empty");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read project store, starting empty");
                Vec::new()
            }
        };

        tracing::info!(count = projects.len(), "Loaded projects");
        Self { path, projects }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Time-based id, bumped past any collision so uniqueness holds within
    /// this store instance.
    pub fn next_id(&self) -> String {
        let mut millis = Utc::now().timestamp_millis();
        while self.projects.iter().any(|p| p.id == millis.to_string()) {
            millis += 1;
        }
        millis.to_string()
    }

    pub fn add(&mut self, project: Project) -> Result<()> {
        self.projects.insert(0, project);
        self.persist()
    }

    /// Patches `name` and `description` in place. Unknown ids are a no-op.
    pub fn update(&mut self, id: &str, name: &str, description: &str) -> Result<()> {
        let Some(project) = self.projects.iter_mut().find(|p| p.id == id) else {
            return Ok(());
        };
        project.name = name.to_string();
        project.description = description.to_string();
        self.persist()
    }

    /// Removes the record. Returns whether anything was deleted.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let before = self.projects.len();
        self.projects.retain(|p| p.id != id);
        if self.projects.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create data directory: {}", parent.display())
            })?;
        }

        let content = serde_json::to_string_pretty(&self.projects)
            .context("failed to serialize projects")?;

        std::fs::write(&self.path, content)
            .with_context(|| format!("failed to write project store: {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::MANUAL_MODEL_TAG;
    use tempfile::tempdir;

    fn test_project(id: &str, name: &str) -> Project {
        Project {
            id: id.to_string(),
            name: name.to_string(),
            description: "An idea".to_string(),
            full_prd: "Body".to_string(),
            image_url: None,
            created_at: 0,
            model_used: MANUAL_MODEL_TAG.to_string(),
        }
    }

    #[test]
    fn test_add_is_newest_first() {
        let dir = tempdir().unwrap();
        let mut store = ProjectStore::load(dir.path().join("projects.json"));

        store.add(test_project("1", "First")).unwrap();
        store.add(test_project("2", "Second")).unwrap();

        let names: Vec<&str> = store.projects().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Second", "First"]);
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("projects.json");

        let mut store = ProjectStore::load(&path);
        store.add(test_project("1", "One")).unwrap();
        store.add(test_project("2", "Two")).unwrap();

        let reloaded = ProjectStore::load(&path);
        assert_eq!(reloaded.projects(), store.projects());
    }

    #[test]
    fn test_empty_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("projects.json");

        let mut store = ProjectStore::load(&path);
        store.add(test_project("1", "One")).unwrap();
        store.remove("1").unwrap();

        let reloaded = ProjectStore::load(&path);
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_malformed_blob_yields_empty_list() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("projects.json");
        std::fs::write(&path, "not json at all {{{").unwrap();

        let store = ProjectStore::load(&path);
        assert!(store.is_empty());
    }

    #[test]
    fn test_missing_blob_yields_empty_list() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::load(dir.path().join("nope.json"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_patches_only_name_and_description() {
        let dir = tempdir().unwrap();
        let mut store = ProjectStore::load(dir.path().join("projects.json"));

        let mut project = test_project("1", "Old");
        project.image_url = Some("data:image/png;base64,QUJD".to_string());
        project.created_at = 99;
        store.add(project).unwrap();

        store.update("1", "New", "New description").unwrap();

        let updated = store.get("1").unwrap();
        assert_eq!(updated.name, "New");
        assert_eq!(updated.description, "New description");
        assert_eq!(updated.full_prd, "Body");
        assert_eq!(updated.created_at, 99);
        assert_eq!(
            updated.image_url.as_deref(),
            Some("data:image/png;base64,QUJD")
        );
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let dir = tempdir().unwrap();
        let mut store = ProjectStore::load(dir.path().join("projects.json"));
        store.add(test_project("1", "One")).unwrap();

        store.update("missing", "X", "Y").unwrap();

        assert_eq!(store.get("1").unwrap().name, "One");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove() {
        let dir = tempdir().unwrap();
        let mut store = ProjectStore::load(dir.path().join("projects.json"));
        store.add(test_project("1", "One")).unwrap();
        store.add(test_project("2", "Two")).unwrap();

        assert!(store.remove("1").unwrap());
        assert!(store.get("1").is_none());
        assert_eq!(store.len(), 1);

        // Unknown id no-ops
        assert!(!store.remove("1").unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_next_id_bumps_on_collision() {
        let dir = tempdir().unwrap();
        let mut store = ProjectStore::load(dir.path().join("projects.json"));

        let id = store.next_id();
        store.add(test_project(&id, "One")).unwrap();

        let next = store.next_id();
        assert_ne!(id, next);
    }
}
