use std::sync::Arc;

use crate::application::ports::{KeyValueStore, StorageError};
use crate::domain::{DEFAULT_OWNER_NAME, UserProfile};

pub const PROFILE_KEY: &str = "userProfile";
pub const API_KEY_KEY: &str = "openai_api_key";

#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    #[error("Profile name must not be empty")]
    InvalidProfile,
    #[error("No user profile saved")]
    NoProfile,
    #[error("API key must not be empty")]
    EmptyApiKey,
    #[error("failed to encode profile: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// User profile and API credential, kept in the key-value store.
pub struct PreferencesService {
    store: Arc<dyn KeyValueStore>,
    environment_api_key: Option<String>,
}

impl PreferencesService {
    /// `environment_api_key` takes precedence over any stored key and is
    /// never cleared.
    pub fn new(store: Arc<dyn KeyValueStore>, environment_api_key: Option<String>) -> Self {
        Self {
            store,
            environment_api_key: environment_api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    pub async fn api_key(&self) -> Result<Option<String>, PreferencesError> {
        if let Some(key) = &self.environment_api_key {
            return Ok(Some(key.clone()));
        }
        let stored = self.store.get(API_KEY_KEY).await?;
        Ok(stored.filter(|k| !k.trim().is_empty()))
    }

    pub async fn has_api_key(&self) -> bool {
        matches!(self.api_key().await, Ok(Some(_)))
    }

    pub async fn set_api_key(&self, key: &str) -> Result<(), PreferencesError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(PreferencesError::EmptyApiKey);
        }
        self.store.set(API_KEY_KEY, key).await?;
        tracing::info!("Stored API key updated");
        Ok(())
    }

    /// Forgets the stored key. A key from the environment stays in effect.
    pub async fn clear_api_key(&self) -> Result<(), PreferencesError> {
        self.store.remove(API_KEY_KEY).await?;
        tracing::info!("Stored API key cleared");
        Ok(())
    }

    /// The saved profile. A record that does not parse counts as absent.
    pub async fn profile(&self) -> Result<Option<UserProfile>, PreferencesError> {
        let Some(raw) = self.store.get(PROFILE_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<UserProfile>(&raw) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                tracing::warn!(error = %e, "Stored user profile is unreadable");
                Ok(None)
            }
        }
    }

    pub async fn save_profile(
        &self,
        profile: UserProfile,
    ) -> Result<UserProfile, PreferencesError> {
        if !profile.is_valid() {
            return Err(PreferencesError::InvalidProfile);
        }
        let profile = UserProfile {
            name: profile.name.trim().to_string(),
            ..profile
        };
        self.store
            .set(PROFILE_KEY, &serde_json::to_string(&profile)?)
            .await?;
        Ok(profile)
    }

    pub async fn accept_guidelines(&self) -> Result<UserProfile, PreferencesError> {
        let profile = self.profile().await?.ok_or(PreferencesError::NoProfile)?;
        self.save_profile(UserProfile {
            has_accepted_guidelines: true,
            ..profile
        })
        .await
    }

    /// Name recorded as the owner of prompts created by this user.
    pub async fn owner_name(&self) -> String {
        match self.profile().await {
            Ok(Some(profile)) => profile.display_name().to_string(),
            _ => DEFAULT_OWNER_NAME.to_string(),
        }
    }
}
