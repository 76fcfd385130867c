use std::sync::Arc;

use assistant_store::application::ports::KeyValueStore;
use assistant_store::application::services::{
    API_KEY_KEY, PROFILE_KEY, PreferencesError, PreferencesService,
};
use assistant_store::domain::{DEFAULT_OWNER_NAME, UserProfile};
use assistant_store::infrastructure::storage::MemoryStore;

fn service(environment_key: Option<&str>) -> (PreferencesService, Arc<dyn KeyValueStore>) {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    (
        PreferencesService::new(Arc::clone(&store), environment_key.map(String::from)),
        store,
    )
}

fn profile(name: &str) -> UserProfile {
    UserProfile {
        name: name.to_string(),
        ..UserProfile::default()
    }
}

#[tokio::test]
async fn given_no_key_anywhere_when_checking_then_not_configured() {
    let (preferences, _) = service(None);

    assert!(!preferences.has_api_key().await);
    assert_eq!(preferences.api_key().await.unwrap(), None);
}

#[tokio::test]
async fn given_stored_key_when_cleared_then_it_is_forgotten() {
    let (preferences, store) = service(None);

    preferences.set_api_key("  sk-user  ").await.unwrap();
    assert_eq!(store.get(API_KEY_KEY).await.unwrap().as_deref(), Some("sk-user"));

    preferences.clear_api_key().await.unwrap();
    assert!(!preferences.has_api_key().await);
}

#[tokio::test]
async fn given_environment_key_when_stored_key_cleared_then_environment_key_remains() {
    let (preferences, _) = service(Some("sk-env"));
    preferences.set_api_key("sk-user").await.unwrap();

    assert_eq!(preferences.api_key().await.unwrap().as_deref(), Some("sk-env"));
    preferences.clear_api_key().await.unwrap();
    assert_eq!(preferences.api_key().await.unwrap().as_deref(), Some("sk-env"));
}

#[tokio::test]
async fn given_blank_key_when_storing_then_rejected() {
    let (preferences, _) = service(None);

    let result = preferences.set_api_key("   ").await;

    assert!(matches!(result, Err(PreferencesError::EmptyApiKey)));
}

#[tokio::test]
async fn given_profile_when_saved_then_name_is_trimmed_and_persisted() {
    let (preferences, store) = service(None);

    let saved = preferences.save_profile(profile("  Ada  ")).await.unwrap();

    assert_eq!(saved.name, "Ada");
    assert_eq!(preferences.profile().await.unwrap(), Some(saved));
    assert!(store.get(PROFILE_KEY).await.unwrap().is_some());
    assert_eq!(preferences.owner_name().await, "Ada");
}

#[tokio::test]
async fn given_blank_name_when_saving_then_invalid_profile() {
    let (preferences, _) = service(None);

    let result = preferences.save_profile(profile(" ")).await;

    assert!(matches!(result, Err(PreferencesError::InvalidProfile)));
}

#[tokio::test]
async fn given_unreadable_profile_when_reading_then_treated_as_absent() {
    let (preferences, store) = service(None);
    store.set(PROFILE_KEY, "not json").await.unwrap();

    assert_eq!(preferences.profile().await.unwrap(), None);
    assert_eq!(preferences.owner_name().await, DEFAULT_OWNER_NAME);
}

#[tokio::test]
async fn given_profile_when_accepting_guidelines_then_flag_is_set() {
    let (preferences, _) = service(None);
    preferences.save_profile(profile("Grace")).await.unwrap();

    let accepted = preferences.accept_guidelines().await.unwrap();

    assert!(accepted.has_accepted_guidelines);
    assert!(preferences.profile().await.unwrap().unwrap().has_accepted_guidelines);
}

#[tokio::test]
async fn given_no_profile_when_accepting_guidelines_then_no_profile_error() {
    let (preferences, _) = service(None);

    let result = preferences.accept_guidelines().await;

    assert!(matches!(result, Err(PreferencesError::NoProfile)));
}
