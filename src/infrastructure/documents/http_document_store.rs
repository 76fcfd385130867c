use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use crate::application::ports::{DocumentStore, DocumentStoreError};

/// Client for a JSON data API in front of a document collection:
/// `POST {endpoint}/action/{find|insertOne|updateOne|deleteOne}`.
pub struct HttpDocumentStore {
    client: Client,
    target: Option<Target>,
    api_key: Option<String>,
}

struct Target {
    endpoint: String,
    data_source: Option<String>,
    database: String,
    collection: String,
}

#[derive(Deserialize)]
struct FindResponse {
    #[serde(default)]
    documents: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InsertResponse {
    #[serde(default)]
    inserted_id: Option<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateResponse {
    #[serde(default)]
    matched_count: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteResponse {
    #[serde(default)]
    deleted_count: u64,
}

impl HttpDocumentStore {
    /// Any missing part leaves the store unconfigured; calls then fail with
    /// [`DocumentStoreError::NotConfigured`] without touching the network.
    pub fn new(
        client: Client,
        endpoint: Option<&str>,
        database: Option<&str>,
        collection: Option<&str>,
    ) -> Self {
        let non_blank = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        let target = match (non_blank(endpoint), non_blank(database), non_blank(collection)) {
            (Some(endpoint), Some(database), Some(collection)) => Some(Target {
                endpoint: endpoint.trim_end_matches('/').to_string(),
                data_source: None,
                database,
                collection,
            }),
            _ => None,
        };

        Self {
            client,
            target,
            api_key: None,
        }
    }

    pub fn with_data_source(mut self, data_source: Option<&str>) -> Self {
        if let Some(target) = self.target.as_mut() {
            target.data_source = data_source
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from);
        }
        self
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    async fn action<T: DeserializeOwned>(
        &self,
        action: &str,
        extra: Map<String, Value>,
    ) -> Result<T, DocumentStoreError> {
        let target = self.target.as_ref().ok_or(DocumentStoreError::NotConfigured)?;

        let mut body = Map::new();
        if let Some(data_source) = &target.data_source {
            body.insert("dataSource".to_string(), json!(data_source));
        }
        body.insert("database".to_string(), json!(target.database));
        body.insert("collection".to_string(), json!(target.collection));
        body.extend(extra);

        let mut request = self
            .client
            .post(format!("{}/action/{}", target.endpoint, action))
            .json(&Value::Object(body));
        if let Some(key) = &self.api_key {
            request = request.header("api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DocumentStoreError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DocumentStoreError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| DocumentStoreError::InvalidResponse(e.to_string()))
    }
}

fn fields(pairs: impl IntoIterator<Item = (&'static str, Value)>) -> Map<String, Value> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    #[tracing::instrument(skip(self))]
    async fn find(&self, filter: Value) -> Result<Vec<Value>, DocumentStoreError> {
        let response: FindResponse = self.action("find", fields([("filter", filter)])).await?;
        Ok(response.documents)
    }

    #[tracing::instrument(skip(self, document))]
    async fn insert_one(&self, document: Value) -> Result<Option<String>, DocumentStoreError> {
        let response: InsertResponse = self
            .action("insertOne", fields([("document", document)]))
            .await?;

        Ok(response.inserted_id.map(|id| match id {
            Value::String(id) => id,
            other => other
                .get("$oid")
                .and_then(Value::as_str)
                .map(String::from)
                .unwrap_or_else(|| other.to_string()),
        }))
    }

    #[tracing::instrument(skip(self, update))]
    async fn update_one(
        &self,
        filter: Value,
        update: Map<String, Value>,
    ) -> Result<u64, DocumentStoreError> {
        let response: UpdateResponse = self
            .action(
                "updateOne",
                fields([("filter", filter), ("update", json!({ "$set": update }))]),
            )
            .await?;
        Ok(response.matched_count)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_one(&self, filter: Value) -> Result<u64, DocumentStoreError> {
        let response: DeleteResponse = self
            .action("deleteOne", fields([("filter", filter)]))
            .await?;
        Ok(response.deleted_count)
    }
}
