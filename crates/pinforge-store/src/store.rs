use std::sync::Arc;

use pinforge_core::Project;
use uuid::Uuid;

use crate::{KvBackend, StoreError};

const PROJECTS_KEY: &str = "projects";
const TOKEN_KEY: &str = "pinterest_token";
const OAUTH_STATE_KEY: &str = "pinterest_auth_state";

/// Project and credential repository over a [`KvBackend`].
///
/// All projects live under a single key as a JSON array, newest first.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn KvBackend>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl Store {
    pub fn new(backend: impl KvBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    #[must_use]
    pub fn from_arc(backend: Arc<dyn KvBackend>) -> Self {
        Self { backend }
    }

    /// Upsert by id. New projects are placed first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the stored list cannot be read, or the
    /// updated list cannot be encoded or written. A failed read never
    /// overwrites what is stored.
    pub async fn save_project(&self, project: &Project) -> Result<(), StoreError> {
        let mut projects = self.projects_for_update().await?;
        match projects.iter_mut().find(|p| p.id == project.id) {
            Some(slot) => *slot = project.clone(),
            None => projects.insert(0, project.clone()),
        }
        self.write_projects(&projects).await
    }

    /// All stored projects. Unreadable or corrupt data yields an empty list.
    pub async fn list_projects(&self) -> Vec<Project> {
        match self.backend.get(PROJECTS_KEY).await {
            Ok(raw) => decode_projects(raw),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read stored projects");
                Vec::new()
            }
        }
    }

    /// Current list for a read-modify-write. Backend errors propagate;
    /// corrupt data still reads as empty.
    async fn projects_for_update(&self) -> Result<Vec<Project>, StoreError> {
        Ok(decode_projects(self.backend.get(PROJECTS_KEY).await?))
    }

    pub async fn get_project(&self, id: Uuid) -> Option<Project> {
        self.list_projects().await.into_iter().find(|p| p.id == id)
    }

    /// Remove a project. Returns `false` when no project had that id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the stored list cannot be read or the updated
    /// list cannot be written.
    pub async fn delete_project(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut projects = self.projects_for_update().await?;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        if projects.len() == before {
            return Ok(false);
        }
        self.write_projects(&projects).await?;
        Ok(true)
    }

    async fn write_projects(&self, projects: &[Project]) -> Result<(), StoreError> {
        let json = serde_json::to_string(projects)?;
        self.backend.set(PROJECTS_KEY, &json).await
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failure.
    pub async fn save_token(&self, token: &str) -> Result<(), StoreError> {
        self.backend.set(TOKEN_KEY, token).await
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failure.
    pub async fn get_token(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .backend
            .get(TOKEN_KEY)
            .await?
            .filter(|t| !t.trim().is_empty()))
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failure.
    pub async fn clear_token(&self) -> Result<(), StoreError> {
        self.backend.remove(TOKEN_KEY).await
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failure.
    pub async fn save_oauth_state(&self, state: &str) -> Result<(), StoreError> {
        self.backend.set(OAUTH_STATE_KEY, state).await
    }

    /// Return the pending OAuth state and remove it so it cannot be replayed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend failure.
    pub async fn take_oauth_state(&self) -> Result<Option<String>, StoreError> {
        let state = self.backend.get(OAUTH_STATE_KEY).await?;
        if state.is_some() {
            self.backend.remove(OAUTH_STATE_KEY).await?;
        }
        Ok(state)
    }
}

fn decode_projects(raw: Option<String>) -> Vec<Project> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str(&raw) {
        Ok(projects) => projects,
        Err(e) => {
            tracing::warn!(error = %e, "stored projects are corrupt; ignoring");
            Vec::new()
        }
    }
}
