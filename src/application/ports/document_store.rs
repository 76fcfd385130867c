use async_trait::async_trait;
use serde_json::{Map, Value};

/// A single remote document collection. Filters follow the MongoDB query
/// shape (`{"field": value}`, `$or`, `$regex`); implementations only need the
/// subset used by the prompt store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, filter: Value) -> Result<Vec<Value>, DocumentStoreError>;

    /// Returns the id the store assigned, when it reports one.
    async fn insert_one(&self, document: Value) -> Result<Option<String>, DocumentStoreError>;

    /// Applies `$set` with the given fields to the first match. Returns the
    /// number of matched documents.
    async fn update_one(
        &self,
        filter: Value,
        fields: Map<String, Value>,
    ) -> Result<u64, DocumentStoreError>;

    /// Returns the number of deleted documents.
    async fn delete_one(&self, filter: Value) -> Result<u64, DocumentStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentStoreError {
    #[error("document store not configured")]
    NotConfigured,
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("store returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
