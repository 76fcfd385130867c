use std::sync::Arc;

use tokio::sync::RwLock;

use crate::application::ports::{AssistantDirectory, AssistantDirectoryError};
use crate::domain::{Assistant, AssistantSort};

/// Registered assistants in registration order, plus any imported from the
/// upstream platform.
pub struct AssistantCatalog {
    assistants: RwLock<Vec<Assistant>>,
    directory: Arc<dyn AssistantDirectory>,
}

impl AssistantCatalog {
    pub fn new(builtins: Vec<Assistant>, directory: Arc<dyn AssistantDirectory>) -> Self {
        Self {
            assistants: RwLock::new(builtins),
            directory,
        }
    }

    /// Substring search over name and description, then ordering.
    pub async fn list(&self, search: Option<&str>, sort: AssistantSort) -> Vec<Assistant> {
        let query = search.map(str::trim).unwrap_or_default().to_lowercase();
        let matching: Vec<Assistant> = self
            .assistants
            .read()
            .await
            .iter()
            .filter(|a| {
                query.is_empty()
                    || a.name.to_lowercase().contains(&query)
                    || a.description.to_lowercase().contains(&query)
            })
            .cloned()
            .collect();

        sort.apply(matching)
    }

    pub async fn get(&self, id: &str) -> Option<Assistant> {
        self.assistants
            .read()
            .await
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }

    pub async fn find_by_name(&self, name: &str) -> Option<Assistant> {
        self.assistants
            .read()
            .await
            .iter()
            .find(|a| a.name == name)
            .cloned()
    }

    pub async fn toggle_favorite(&self, id: &str) -> Option<Assistant> {
        let mut assistants = self.assistants.write().await;
        let assistant = assistants.iter_mut().find(|a| a.id == id)?;
        assistant.is_favorite = !assistant.is_favorite;
        tracing::debug!(id, favorite = assistant.is_favorite, "Favorite toggled");
        Some(assistant.clone())
    }

    /// Pulls assistants from the upstream platform and merges them in,
    /// replacing entries with the same id. Returns the imported entries.
    #[tracing::instrument(skip(self))]
    pub async fn import_remote(&self) -> Result<Vec<Assistant>, AssistantDirectoryError> {
        let imported: Vec<Assistant> = self
            .directory
            .list_assistants()
            .await?
            .iter()
            .map(Assistant::from_remote)
            .collect();

        let mut assistants = self.assistants.write().await;
        for assistant in &imported {
            match assistants.iter_mut().find(|a| a.id == assistant.id) {
                Some(existing) => {
                    let is_favorite = existing.is_favorite;
                    *existing = Assistant {
                        is_favorite,
                        ..assistant.clone()
                    };
                }
                None => assistants.push(assistant.clone()),
            }
        }

        tracing::info!(count = imported.len(), "Imported remote assistants");
        Ok(imported)
    }

    pub async fn fetch_remote(&self, id: &str) -> Result<Assistant, AssistantDirectoryError> {
        let remote = self.directory.get_assistant(id).await?;
        Ok(Assistant::from_remote(&remote))
    }

    pub async fn test_connection(&self) -> bool {
        self.directory.test_connection().await
    }
}
