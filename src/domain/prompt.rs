use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value, json};

/// A reusable prompt template from the catalog.
///
/// `id` is the logical identifier used throughout the application.
/// `storage_id` is whatever the document store assigned (`_id`), kept only so
/// callers holding it can still address the prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    #[serde(default)]
    pub id: String,
    #[serde(
        rename = "_id",
        default,
        deserialize_with = "deserialize_storage_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub storage_id: Option<String>,
    pub title: String,
    pub description: String,
    pub assistant: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functional_area: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PromptValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("malformed prompt document: {0}")]
    Malformed(String),
}

impl Prompt {
    /// Validates a raw document read from a store.
    pub fn from_document(document: Value) -> Result<Self, PromptValidationError> {
        let mut prompt: Prompt = serde_json::from_value(document)
            .map_err(|e| PromptValidationError::Malformed(e.to_string()))?;

        if prompt.id.trim().is_empty() {
            prompt.id = prompt
                .storage_id
                .clone()
                .ok_or(PromptValidationError::MissingField("id"))?;
        }
        prompt.normalize();
        prompt.validate()?;
        Ok(prompt)
    }

    pub fn validate(&self) -> Result<(), PromptValidationError> {
        require(&self.title, "title")?;
        require(&self.description, "description")?;
        require(&self.assistant, "assistant")?;
        Ok(())
    }

    pub fn answers_to(&self, id: &str) -> bool {
        self.id == id || self.storage_id.as_deref() == Some(id)
    }

    /// Store filter addressing this prompt's document. Documents that never
    /// had a logical id are addressed by `_id`, as an ObjectId when it looks
    /// like one.
    pub fn store_filter(&self) -> Value {
        match self.storage_id.as_deref() {
            Some(storage_id) if storage_id == self.id => {
                if is_object_id(storage_id) {
                    json!({ "_id": { "$oid": storage_id } })
                } else {
                    json!({ "_id": storage_id })
                }
            }
            _ => json!({ "id": self.id }),
        }
    }

    pub fn matches_pattern(&self, pattern: &Regex) -> bool {
        pattern.is_match(&self.title)
            || pattern.is_match(&self.description)
            || self.tags.iter().any(|tag| pattern.is_match(tag))
    }

    fn normalize(&mut self) {
        for field in [
            &mut self.task,
            &mut self.functional_area,
            &mut self.user,
            &mut self.system,
            &mut self.owner,
        ] {
            if field.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *field = None;
            }
        }
        self.tags.retain(|tag| !tag.trim().is_empty());
    }
}

/// A prompt as submitted by the create form, before it has an id.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub assistant: String,
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub functional_area: Option<String>,
    #[serde(default, deserialize_with = "deserialize_draft_tags")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub system: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
}

impl PromptDraft {
    /// Splits the comma separated tag field of the form. Drafts accept tags
    /// either as this string or as a list.
    pub fn parse_tags(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn into_prompt(self, fallback_id: String) -> Result<Prompt, PromptValidationError> {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or(fallback_id);

        let mut prompt = Prompt {
            id,
            storage_id: None,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            assistant: self.assistant.trim().to_string(),
            task: self.task,
            functional_area: self.functional_area,
            tags: self.tags,
            user: self.user,
            system: self.system,
            owner: self.owner,
        };
        prompt.normalize();
        prompt.validate()?;
        Ok(prompt)
    }
}

/// Partial update; only fields that are present are written.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assistant: Option<String>,
    pub task: Option<String>,
    pub functional_area: Option<String>,
    pub tags: Option<Vec<String>>,
    pub user: Option<String>,
    pub system: Option<String>,
    pub owner: Option<String>,
}

impl PromptUpdate {
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// The `$set` document for a store update.
    pub fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        let text = [
            ("title", &self.title),
            ("description", &self.description),
            ("assistant", &self.assistant),
            ("task", &self.task),
            ("functionalArea", &self.functional_area),
            ("user", &self.user),
            ("system", &self.system),
            ("owner", &self.owner),
        ];
        for (name, value) in text {
            if let Some(value) = value {
                fields.insert(name.to_string(), Value::String(value.clone()));
            }
        }
        if let Some(tags) = &self.tags {
            fields.insert(
                "tags".to_string(),
                Value::Array(tags.iter().cloned().map(Value::String).collect()),
            );
        }
        fields
    }

    pub fn apply_to(&self, prompt: &mut Prompt) {
        if let Some(title) = &self.title {
            prompt.title = title.clone();
        }
        if let Some(description) = &self.description {
            prompt.description = description.clone();
        }
        if let Some(assistant) = &self.assistant {
            prompt.assistant = assistant.clone();
        }
        if let Some(tags) = &self.tags {
            prompt.tags = tags.clone();
        }
        for (target, value) in [
            (&mut prompt.task, &self.task),
            (&mut prompt.functional_area, &self.functional_area),
            (&mut prompt.user, &self.user),
            (&mut prompt.system, &self.system),
            (&mut prompt.owner, &self.owner),
        ] {
            if value.is_some() {
                *target = value.clone();
            }
        }
        prompt.normalize();
    }
}

/// Catalog page filters. `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PromptFilter {
    pub search: Option<String>,
    pub assistant: Option<String>,
    pub task: Option<String>,
    pub functional_area: Option<String>,
}

impl PromptFilter {
    pub fn matches(&self, prompt: &Prompt) -> bool {
        let matches_search = match self.search.as_deref().map(str::to_lowercase) {
            Some(query) if !query.is_empty() => {
                prompt.title.to_lowercase().contains(&query)
                    || prompt.description.to_lowercase().contains(&query)
            }
            _ => true,
        };

        matches_search
            && matches_exact(self.assistant.as_deref(), Some(prompt.assistant.as_str()))
            && matches_exact(self.task.as_deref(), prompt.task.as_deref())
            && matches_exact(
                self.functional_area.as_deref(),
                prompt.functional_area.as_deref(),
            )
    }

    pub fn apply(&self, prompts: Vec<Prompt>) -> Vec<Prompt> {
        prompts.into_iter().filter(|p| self.matches(p)).collect()
    }
}

fn matches_exact(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match wanted {
        Some(wanted) if !wanted.is_empty() => actual == Some(wanted),
        _ => true,
    }
}

fn is_object_id(id: &str) -> bool {
    id.len() == 24 && id.chars().all(|c| c.is_ascii_hexdigit())
}

fn require(value: &str, field: &'static str) -> Result<(), PromptValidationError> {
    if value.trim().is_empty() {
        return Err(PromptValidationError::MissingField(field));
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStorageId {
    Plain(String),
    ObjectId {
        #[serde(rename = "$oid")]
        oid: String,
    },
}

fn deserialize_storage_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawStorageId>::deserialize(deserializer)?;
    Ok(raw.map(|id| match id {
        RawStorageId::Plain(id) => id,
        RawStorageId::ObjectId { oid } => oid,
    }))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTags {
    List(Vec<String>),
    Text(String),
}

fn deserialize_draft_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawTags>::deserialize(deserializer)? {
        Some(RawTags::List(tags)) => tags,
        Some(RawTags::Text(raw)) => PromptDraft::parse_tags(&raw),
        None => Vec::new(),
    })
}
