use serde::{Deserialize, Serialize};

pub const DEFAULT_OWNER_NAME: &str = "Current User";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub has_accepted_guidelines: bool,
}

impl UserProfile {
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() {
            DEFAULT_OWNER_NAME
        } else {
            name
        }
    }
}
