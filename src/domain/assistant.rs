use serde::{Deserialize, Serialize};

const DEFAULT_ICON: &str = "🤖";
const DESCRIPTION_PREVIEW_CHARS: usize = 100;

const PALETTE: [&str; 10] = [
    "bg-blue-100 text-blue-600",
    "bg-green-100 text-green-600",
    "bg-purple-100 text-purple-600",
    "bg-yellow-100 text-yellow-600",
    "bg-red-100 text-red-600",
    "bg-indigo-100 text-indigo-600",
    "bg-pink-100 text-pink-600",
    "bg-teal-100 text-teal-600",
    "bg-orange-100 text-orange-600",
    "bg-cyan-100 text-cyan-600",
];

const NAME_ICONS: [(&[&str], &str); 8] = [
    (&["code", "programming"], "💻"),
    (&["write", "content"], "✍️"),
    (&["analyze", "data"], "📊"),
    (&["support", "help"], "🔧"),
    (&["creative", "design"], "🎨"),
    (&["research"], "🔬"),
    (&["translate"], "🌐"),
    (&["math", "calculate"], "🧮"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assistant {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default)]
    pub is_custom: bool,
}

impl Assistant {
    pub fn builtin(id: &str, name: &str, description: &str, icon: &str, color: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            is_favorite: false,
            model: None,
            instructions: None,
            is_custom: false,
        }
    }

    /// Converts an assistant record from the upstream assistants API.
    pub fn from_remote(remote: &RemoteAssistant) -> Self {
        let name = remote
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "Unnamed Assistant".to_string());

        Self {
            id: remote.id.clone(),
            name,
            description: remote_description(remote),
            icon: remote_icon(remote).to_string(),
            color: palette_color(&remote.id).to_string(),
            is_favorite: false,
            model: Some(remote.model.clone()).filter(|m| !m.is_empty()),
            instructions: remote.instructions.clone(),
            is_custom: true,
        }
    }
}

/// Assistant record as returned by `GET /assistants`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteAssistant {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub tools: Vec<RemoteTool>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteTool {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistantSort {
    #[default]
    Default,
    NameAsc,
    NameDesc,
    RecentlyAdded,
    Favorites,
}

impl AssistantSort {
    /// Orders (or, for favorites, filters) a list already narrowed by search.
    pub fn apply(self, mut assistants: Vec<Assistant>) -> Vec<Assistant> {
        match self {
            AssistantSort::Default => assistants,
            AssistantSort::NameAsc => {
                assistants.sort_by_key(|a| a.name.to_lowercase());
                assistants
            }
            AssistantSort::NameDesc => {
                assistants.sort_by_key(|a| std::cmp::Reverse(a.name.to_lowercase()));
                assistants
            }
            AssistantSort::RecentlyAdded => {
                assistants.reverse();
                assistants
            }
            AssistantSort::Favorites => assistants.into_iter().filter(|a| a.is_favorite).collect(),
        }
    }
}

fn remote_description(remote: &RemoteAssistant) -> String {
    if let Some(description) = remote.description.as_deref().filter(|d| !d.is_empty()) {
        return description.to_string();
    }
    match remote.instructions.as_deref().filter(|i| !i.is_empty()) {
        Some(instructions) => {
            let preview: String = instructions.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
            format!("{}...", preview)
        }
        None => "No description available".to_string(),
    }
}

fn remote_icon(remote: &RemoteAssistant) -> &'static str {
    if !remote.tools.is_empty() {
        let has = |kind: &str| remote.tools.iter().any(|t| t.kind == kind);
        if has("code_interpreter") {
            return "💻";
        }
        if has("file_search") {
            return "🔍";
        }
        if has("function") {
            return "⚡";
        }
        return DEFAULT_ICON;
    }

    let name = remote.name.as_deref().unwrap_or_default().to_lowercase();
    NAME_ICONS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| name.contains(k)))
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}

/// Stable color per id: sum of UTF-16 code units modulo the palette size.
fn palette_color(id: &str) -> &'static str {
    let sum: usize = id.encode_utf16().map(usize::from).sum();
    PALETTE[sum % PALETTE.len()]
}
