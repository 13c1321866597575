//! Multi-project storage.
//!
//! Provides a thread-safe [`ProjectStore`] holding every saved project plus
//! the id of the one being edited. With a data directory, each project is
//! mirrored to `<id>.json` after every change.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::persist::current_timestamp_ms;
use crate::CanvasElement;

/// Errors that can occur during project store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested project does not exist.
    #[error("Project not found: {0}")]
    ProjectNotFound(String),
    /// The operation needs a data directory but none was configured.
    #[error("No data directory configured")]
    NoDataDir,
    /// An I/O error occurred during persistence.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// A named, saved document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Preview image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// The saved document.
    #[serde(default)]
    pub elements: Vec<CanvasElement>,
    /// Creation time in Unix milliseconds.
    pub created_at: u64,
    /// Last modification time in Unix milliseconds.
    pub updated_at: u64,
}

/// Metadata changes for [`ProjectStore::update_project`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectUpdate {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New thumbnail; `Some(None)` clears it.
    pub thumbnail: Option<Option<String>>,
}

/// Thread-safe project storage.
#[derive(Debug, Clone, Default)]
pub struct ProjectStore {
    projects: Arc<RwLock<HashMap<String, Project>>>,
    current: Arc<RwLock<Option<String>>>,
    /// Optional data directory for filesystem persistence.
    data_dir: Option<PathBuf>,
}

impl ProjectStore {
    /// Create an in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with filesystem persistence.
    ///
    /// The directory is created if it doesn't exist. Nothing is loaded until
    /// [`ProjectStore::load_all_from_disk`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self {
            data_dir: Some(data_dir),
            ..Self::default()
        })
    }

    /// Create an empty project and make it current. Returns its id.
    pub fn create_project(&self, name: impl Into<String>, description: impl Into<String>) -> String {
        let now = current_timestamp_ms();
        let project = Project {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            thumbnail: None,
            elements: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        let id = project.id.clone();
        tracing::debug!("Creating project {id} ({})", project.name);
        {
            let mut projects = self
                .projects
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            projects.insert(id.clone(), project);
        }
        self.set_current_unchecked(Some(id.clone()));
        self.persist_project(&id);
        id
    }

    /// Get a project by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Project> {
        let projects = self
            .projects
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        projects.get(id).cloned()
    }

    /// Change a project's metadata.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProjectNotFound`] if the project does not exist.
    pub fn update_project(&self, id: &str, update: ProjectUpdate) -> Result<(), StoreError> {
        self.modify(id, |project| {
            if let Some(name) = update.name {
                project.name = name;
            }
            if let Some(description) = update.description {
                project.description = description;
            }
            if let Some(thumbnail) = update.thumbnail {
                project.thumbnail = thumbnail;
            }
        })
    }

    /// Store a new document for a project.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProjectNotFound`] if the project does not exist.
    pub fn save_elements(&self, id: &str, elements: &[CanvasElement]) -> Result<(), StoreError> {
        self.modify(id, |project| project.elements = elements.to_vec())
    }

    /// Remove a project and its file. Clears the current project if it was
    /// this one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProjectNotFound`] if the project does not exist.
    pub fn delete_project(&self, id: &str) -> Result<Project, StoreError> {
        let removed = {
            let mut projects = self
                .projects
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            projects
                .remove(id)
                .ok_or_else(|| StoreError::ProjectNotFound(id.to_string()))?
        };
        {
            let mut current = self
                .current
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if current.as_deref() == Some(id) {
                *current = None;
            }
        }
        self.delete_project_file(id);
        Ok(removed)
    }

    /// Choose the project being edited, or none.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProjectNotFound`] if `id` names no project.
    pub fn set_current(&self, id: Option<&str>) -> Result<(), StoreError> {
        if let Some(id) = id {
            if self.get(id).is_none() {
                return Err(StoreError::ProjectNotFound(id.to_string()));
            }
        }
        self.set_current_unchecked(id.map(str::to_string));
        Ok(())
    }

    /// The project being edited.
    #[must_use]
    pub fn current(&self) -> Option<Project> {
        let current = self
            .current
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();
        current.and_then(|id| self.get(&id))
    }

    /// All projects, oldest first.
    #[must_use]
    pub fn list(&self) -> Vec<Project> {
        let projects = self
            .projects
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut list: Vec<Project> = projects.values().cloned().collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.name.cmp(&b.name)));
        list
    }

    fn set_current_unchecked(&self, id: Option<String>) {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *current = id;
    }

    fn modify<F>(&self, id: &str, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Project),
    {
        {
            let mut projects = self
                .projects
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let project = projects
                .get_mut(id)
                .ok_or_else(|| StoreError::ProjectNotFound(id.to_string()))?;
            f(project);
            project.updated_at = current_timestamp_ms().max(project.updated_at);
        }
        self.persist_project(id);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Save a project to disk as JSON.
    ///
    /// No-op if the store was created without a data directory.
    fn persist_project(&self, id: &str) {
        let Some(ref data_dir) = self.data_dir else {
            return;
        };
        let Some(project) = self.get(id) else {
            return;
        };
        let json = match serde_json::to_string_pretty(&project) {
            Ok(j) => j,
            Err(e) => {
                tracing::warn!("Failed to serialize project {id}: {e}");
                return;
            }
        };
        let path = data_dir.join(format!("{}.json", sanitize_filename(id)));
        if let Err(e) = std::fs::write(&path, json) {
            tracing::warn!("Failed to persist project {id} to {}: {e}", path.display());
        }
    }

    fn delete_project_file(&self, id: &str) {
        let Some(ref data_dir) = self.data_dir else {
            return;
        };
        let path = data_dir.join(format!("{}.json", sanitize_filename(id)));
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                tracing::warn!("Failed to delete project file {}: {e}", path.display());
            }
        }
    }

    /// Load a single project from disk into memory.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no data directory, or the file doesn't
    /// exist or can't be parsed.
    pub fn load_project_from_disk(&self, id: &str) -> Result<Project, StoreError> {
        let data_dir = self.data_dir.as_ref().ok_or(StoreError::NoDataDir)?;
        let path = data_dir.join(format!("{}.json", sanitize_filename(id)));
        let contents = std::fs::read_to_string(&path)?;
        let project: Project = serde_json::from_str(&contents)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let mut projects = self
            .projects
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        projects.insert(project.id.clone(), project.clone());
        Ok(project)
    }

    /// Load every persisted project in the data directory.
    ///
    /// Files that fail to parse are skipped with a warning. Returns the ids
    /// that were loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory can't be read.
    pub fn load_all_from_disk(&self) -> Result<Vec<String>, StoreError> {
        let data_dir = self.data_dir.as_ref().ok_or(StoreError::NoDataDir)?;

        let mut ids = Vec::new();
        for entry in std::fs::read_dir(data_dir)? {
            let path = entry?.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match self.load_project_from_disk(stem) {
                Ok(project) => ids.push(project.id),
                Err(e) => tracing::warn!("Skipping project file {}: {e}", path.display()),
            }
        }
        Ok(ids)
    }
}

/// Sanitize a project id for use as a filename.
///
/// Replaces any character that is not alphanumeric, `-`, or `_` with `_`.
fn sanitize_filename(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_makes_project_current() {
        let store = ProjectStore::new();
        let id = store.create_project("Site", "My site");
        let current = store.current().expect("current project");
        assert_eq!(current.id, id);
        assert_eq!(current.name, "Site");
        assert!(current.elements.is_empty());
    }

    #[test]
    fn test_update_changes_metadata() {
        let store = ProjectStore::new();
        let id = store.create_project("Old", "");
        store
            .update_project(
                &id,
                ProjectUpdate {
                    name: Some("New".into()),
                    ..ProjectUpdate::default()
                },
            )
            .expect("update");
        let project = store.get(&id).expect("exists");
        assert_eq!(project.name, "New");
        assert!(project.updated_at >= project.created_at);
    }

    #[test]
    fn test_missing_project_errors() {
        let store = ProjectStore::new();
        assert!(matches!(
            store.save_elements("nope", &[]),
            Err(StoreError::ProjectNotFound(_))
        ));
        assert!(store.delete_project("nope").is_err());
        assert!(store.set_current(Some("nope")).is_err());
    }

    #[test]
    fn test_delete_clears_current() {
        let store = ProjectStore::new();
        let first = store.create_project("A", "");
        let second = store.create_project("B", "");
        store.set_current(Some(&first)).expect("exists");

        store.delete_project(&second).expect("delete");
        assert_eq!(store.current().map(|p| p.id), Some(first.clone()));

        store.delete_project(&first).expect("delete");
        assert!(store.current().is_none());
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_load_without_data_dir_errors() {
        let store = ProjectStore::new();
        assert!(matches!(
            store.load_all_from_disk(),
            Err(StoreError::NoDataDir)
        ));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_filename("ok-id_1"), "ok-id_1");
    }
}
