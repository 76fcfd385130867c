use std::sync::Arc;

use chrono::Utc;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use serde_json::{Value, json};
use tokio::sync::RwLock;

use crate::application::ports::{DocumentStore, DocumentStoreError};
use crate::domain::{Prompt, PromptDraft, PromptUpdate};

/// Where the remote prompt collection lives. Any blank part means the store
/// runs on its fallback list.
#[derive(Debug, Clone, Default)]
pub struct ConnectionInfo {
    pub endpoint: Option<String>,
    pub database: Option<String>,
    pub collection: Option<String>,
}

impl ConnectionInfo {
    pub fn is_configured(&self) -> bool {
        [&self.endpoint, &self.database, &self.collection]
            .iter()
            .all(|part| part.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }

    pub fn summary(&self) -> ConnectionSummary {
        ConnectionSummary {
            database: self.database.clone().unwrap_or_default(),
            collection: self.collection.clone().unwrap_or_default(),
            has_connection_string: self.endpoint.as_deref().is_some_and(|e| !e.is_empty()),
            is_configured: self.is_configured(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSummary {
    pub database: String,
    pub collection: String,
    pub has_connection_string: bool,
    pub is_configured: bool,
}

/// Prompt catalog backed by a remote document collection, with a local
/// fallback list when that collection is unset or unreachable.
pub struct PromptStore {
    documents: Arc<dyn DocumentStore>,
    connection: ConnectionInfo,
    fallback: Vec<Prompt>,
    cache: RwLock<Option<Vec<Prompt>>>,
}

impl PromptStore {
    pub fn new(documents: Arc<dyn DocumentStore>, connection: ConnectionInfo) -> Self {
        Self {
            documents,
            connection,
            fallback: Vec::new(),
            cache: RwLock::new(None),
        }
    }

    /// Prompts served while the remote collection is unavailable.
    pub fn with_fallback(mut self, prompts: Vec<Prompt>) -> Self {
        self.fallback = prompts;
        self
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_configured()
    }

    pub fn connection_info(&self) -> ConnectionSummary {
        self.connection.summary()
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_prompts(&self, force_refresh: bool) -> Vec<Prompt> {
        if !self.is_connected() {
            tracing::debug!("Prompt store not configured, serving fallback prompts");
            return self.fallback.clone();
        }

        if !force_refresh {
            if let Some(cached) = self.cache.read().await.as_ref() {
                return cached.clone();
            }
        }

        match self.documents.find(json!({})).await {
            Ok(documents) => {
                let prompts = validate_documents(documents);
                tracing::info!(count = prompts.len(), "Fetched prompts");
                *self.cache.write().await = Some(prompts.clone());
                prompts
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch prompts, serving fallback prompts");
                self.fallback.clone()
            }
        }
    }

    pub async fn get_prompts_by_assistant(&self, assistant: &str) -> Vec<Prompt> {
        self.get_prompts(false)
            .await
            .into_iter()
            .filter(|p| p.assistant == assistant)
            .collect()
    }

    /// Case-insensitive pattern match over title, description and tags.
    /// Input that is not a valid pattern is matched literally.
    #[tracing::instrument(skip(self))]
    pub async fn search_prompts(&self, query: &str) -> Vec<Prompt> {
        let pattern = search_pattern(query);

        if self.is_connected() {
            let filter = json!({
                "$or": [
                    { "title": { "$regex": pattern, "$options": "i" } },
                    { "description": { "$regex": pattern, "$options": "i" } },
                    { "tags": { "$regex": pattern, "$options": "i" } },
                ]
            });
            match self.documents.find(filter).await {
                Ok(documents) => return validate_documents(documents),
                Err(e) => {
                    tracing::warn!(error = %e, "Remote prompt search failed, searching fallback prompts");
                }
            }
        }

        match RegexBuilder::new(&pattern).case_insensitive(true).build() {
            Ok(regex) => self
                .fallback
                .iter()
                .filter(|p| p.matches_pattern(&regex))
                .cloned()
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Search pattern rejected");
                Vec::new()
            }
        }
    }

    /// Inserts a new prompt. Drafts without an id get `custom_<millis>`.
    #[tracing::instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn add_prompt(&self, draft: PromptDraft) -> bool {
        if !self.is_connected() {
            tracing::warn!("Prompt store not configured, cannot add prompt");
            return false;
        }

        let prompt = match draft.into_prompt(format!("custom_{}", Utc::now().timestamp_millis())) {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::warn!(error = %e, "Rejected prompt");
                return false;
            }
        };
        let document = match serde_json::to_value(&prompt) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode prompt");
                return false;
            }
        };

        match self.documents.insert_one(document).await {
            Ok(inserted) => {
                tracing::info!(id = %prompt.id, storage_id = ?inserted, "Prompt added");
                self.invalidate().await;
                true
            }
            Err(e) => write_failed("add", e),
        }
    }

    /// Applies a partial update. `id` may be the logical id or the storage id.
    #[tracing::instrument(skip(self, update))]
    pub async fn update_prompt(&self, id: &str, update: PromptUpdate) -> bool {
        if !self.is_connected() || update.is_empty() {
            return false;
        }

        let (canonical, filter) = self.resolve(id).await;
        match self.documents.update_one(filter, update.fields()).await {
            Ok(matched) if matched > 0 => {
                tracing::info!(id = %canonical, "Prompt updated");
                if let Some(cached) = self.cache.write().await.as_mut() {
                    if let Some(prompt) = cached.iter_mut().find(|p| p.id == canonical) {
                        update.apply_to(prompt);
                    }
                }
                true
            }
            Ok(_) => {
                tracing::warn!(id = %canonical, "No prompt matched update");
                false
            }
            Err(e) => write_failed("update", e),
        }
    }

    /// Removes a prompt. `id` may be the logical id or the storage id.
    #[tracing::instrument(skip(self))]
    pub async fn delete_prompt(&self, id: &str) -> bool {
        if !self.is_connected() {
            return false;
        }

        let (canonical, filter) = self.resolve(id).await;
        match self.documents.delete_one(filter).await {
            Ok(deleted) if deleted > 0 => {
                tracing::info!(id = %canonical, "Prompt deleted");
                self.invalidate().await;
                true
            }
            Ok(_) => {
                tracing::warn!(id = %canonical, "No prompt matched delete");
                false
            }
            Err(e) => write_failed("delete", e),
        }
    }

    /// Canonical id and store filter for either kind of id. Unknown ids are
    /// taken as logical ids.
    async fn resolve(&self, id: &str) -> (String, Value) {
        match self
            .get_prompts(false)
            .await
            .into_iter()
            .find(|p| p.answers_to(id))
        {
            Some(prompt) => {
                let filter = prompt.store_filter();
                (prompt.id, filter)
            }
            None => (id.to_string(), json!({ "id": id })),
        }
    }

    async fn invalidate(&self) {
        *self.cache.write().await = None;
    }
}

fn validate_documents(documents: Vec<Value>) -> Vec<Prompt> {
    documents
        .into_iter()
        .filter_map(|document| match Prompt::from_document(document) {
            Ok(prompt) => Some(prompt),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping invalid prompt document");
                None
            }
        })
        .collect()
}

fn search_pattern(query: &str) -> String {
    match Regex::new(query) {
        Ok(_) => query.to_string(),
        Err(_) => regex::escape(query),
    }
}

fn write_failed(operation: &str, error: DocumentStoreError) -> bool {
    tracing::error!(operation, error = %error, "Prompt write failed");
    false
}
