use async_trait::async_trait;
use regex::RegexBuilder;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::application::ports::{DocumentStore, DocumentStoreError};

/// In-process collection understanding the filter subset the prompt store
/// issues: field equality, `$or`, and `$regex` with an `i` option.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<Vec<Value>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: Vec<Value>) -> Self {
        Self {
            documents: RwLock::new(documents),
        }
    }

    pub async fn snapshot(&self) -> Vec<Value> {
        self.documents.read().await.clone()
    }
}

fn matches(document: &Value, filter: &Value) -> bool {
    let Some(conditions) = filter.as_object() else {
        return false;
    };

    conditions.iter().all(|(field, condition)| {
        if field == "$or" {
            return condition
                .as_array()
                .is_some_and(|branches| branches.iter().any(|b| matches(document, b)));
        }
        let value = document.get(field);
        match condition.get("$regex").and_then(Value::as_str) {
            Some(pattern) => matches_regex(value, pattern, condition.get("$options")),
            None => value == Some(condition),
        }
    })
}

fn matches_regex(value: Option<&Value>, pattern: &str, options: Option<&Value>) -> bool {
    let case_insensitive = options
        .and_then(Value::as_str)
        .is_some_and(|o| o.contains('i'));
    let Ok(regex) = RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
    else {
        return false;
    };

    match value {
        Some(Value::String(text)) => regex.is_match(text),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .any(|item| regex.is_match(item)),
        _ => false,
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find(&self, filter: Value) -> Result<Vec<Value>, DocumentStoreError> {
        Ok(self
            .documents
            .read()
            .await
            .iter()
            .filter(|d| matches(d, &filter))
            .cloned()
            .collect())
    }

    async fn insert_one(&self, mut document: Value) -> Result<Option<String>, DocumentStoreError> {
        let object = document.as_object_mut().ok_or_else(|| {
            DocumentStoreError::InvalidResponse("document must be an object".to_string())
        })?;
        let storage_id = Uuid::new_v4().simple().to_string();
        object.insert("_id".to_string(), Value::String(storage_id.clone()));

        self.documents.write().await.push(document);
        Ok(Some(storage_id))
    }

    async fn update_one(
        &self,
        filter: Value,
        fields: Map<String, Value>,
    ) -> Result<u64, DocumentStoreError> {
        let mut documents = self.documents.write().await;
        let Some(object) = documents
            .iter_mut()
            .find(|d| matches(d, &filter))
            .and_then(Value::as_object_mut)
        else {
            return Ok(0);
        };
        object.extend(fields);
        Ok(1)
    }

    async fn delete_one(&self, filter: Value) -> Result<u64, DocumentStoreError> {
        let mut documents = self.documents.write().await;
        match documents.iter().position(|d| matches(d, &filter)) {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
