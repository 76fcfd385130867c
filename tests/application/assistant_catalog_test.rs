use std::sync::Arc;

use assistant_store::application::services::AssistantCatalog;
use assistant_store::domain::{AssistantSort, RemoteTool};
use assistant_store::infrastructure::catalog::builtin_assistants;

use crate::helpers::{StaticDirectory, remote_assistant};

fn catalog_with(remote: Vec<assistant_store::domain::RemoteAssistant>) -> AssistantCatalog {
    AssistantCatalog::new(
        builtin_assistants(),
        Arc::new(StaticDirectory { assistants: remote }),
    )
}

#[tokio::test]
async fn given_builtins_when_listing_by_default_then_registration_order_is_kept() {
    let catalog = catalog_with(Vec::new());

    let names: Vec<String> = catalog
        .list(None, AssistantSort::Default)
        .await
        .into_iter()
        .map(|a| a.name)
        .collect();

    assert_eq!(names.first().map(String::as_str), Some("OmniChat"));
    assert_eq!(names.last().map(String::as_str), Some("Resume Assistant"));
    assert_eq!(names.len(), 8);
}

#[tokio::test]
async fn given_search_text_when_listing_then_description_matches_count() {
    let catalog = catalog_with(Vec::new());

    let found = catalog.list(Some("  RESUMES "), AssistantSort::Default).await;

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "resume-assistant");
}

#[tokio::test]
async fn given_builtins_when_sorting_by_name_then_order_ignores_case() {
    let catalog = catalog_with(Vec::new());

    let ascending = catalog.list(None, AssistantSort::NameAsc).await;
    let descending = catalog.list(None, AssistantSort::NameDesc).await;

    assert_eq!(ascending[0].name, "ADEPT Assistant");
    assert_eq!(ascending[1].name, "Advance Policies Assistant");
    assert_eq!(descending[0].name, "RFP Assistant");
}

#[tokio::test]
async fn given_builtins_when_sorting_recently_added_then_order_is_reversed() {
    let catalog = catalog_with(Vec::new());

    let recent = catalog.list(None, AssistantSort::RecentlyAdded).await;

    assert_eq!(recent[0].id, "resume-assistant");
    assert_eq!(recent[7].id, "bms-chatgpt");
}

#[tokio::test]
async fn given_favorite_toggled_twice_when_listing_favorites_then_it_is_gone_again() {
    let catalog = catalog_with(Vec::new());

    let toggled = catalog.toggle_favorite("hr-support").await.unwrap();
    assert!(toggled.is_favorite);
    assert_eq!(catalog.list(None, AssistantSort::Favorites).await.len(), 1);

    let toggled = catalog.toggle_favorite("hr-support").await.unwrap();
    assert!(!toggled.is_favorite);
    assert!(catalog.list(None, AssistantSort::Favorites).await.is_empty());
    assert!(catalog.toggle_favorite("missing").await.is_none());
}

#[tokio::test]
async fn given_remote_assistants_when_importing_then_they_are_appended_as_custom() {
    let mut coder = remote_assistant("asst_code", Some("Code Reviewer"));
    coder.tools = vec![RemoteTool {
        kind: "code_interpreter".to_string(),
    }];
    let catalog = catalog_with(vec![coder, remote_assistant("asst_blank", None)]);

    let imported = catalog.import_remote().await.unwrap();

    assert_eq!(imported.len(), 2);
    let all = catalog.list(None, AssistantSort::Default).await;
    assert_eq!(all.len(), 10);
    let code = catalog.get("asst_code").await.unwrap();
    assert_eq!(code.icon, "💻");
    assert!(code.is_custom);
    assert_eq!(code.model.as_deref(), Some("gpt-4o"));
    let blank = catalog.find_by_name("Unnamed Assistant").await.unwrap();
    assert_eq!(blank.id, "asst_blank");
    assert_eq!(blank.description, "No description available");
}

#[tokio::test]
async fn given_imported_favorite_when_reimporting_then_favorite_survives() {
    let catalog = catalog_with(vec![remote_assistant("asst_1", Some("Research Assistant"))]);
    catalog.import_remote().await.unwrap();
    catalog.toggle_favorite("asst_1").await.unwrap();

    catalog.import_remote().await.unwrap();

    let all = catalog.list(None, AssistantSort::Default).await;
    assert_eq!(all.len(), 9);
    assert!(catalog.get("asst_1").await.unwrap().is_favorite);
}

#[tokio::test]
async fn given_directory_when_fetching_single_assistant_then_converted() {
    let catalog = catalog_with(vec![remote_assistant("asst_1", Some("Data Analyst"))]);

    let fetched = catalog.fetch_remote("asst_1").await.unwrap();
    let missing = catalog.fetch_remote("asst_2").await;

    assert_eq!(fetched.icon, "📊");
    assert!(missing.is_err());
    assert!(catalog.test_connection().await);
}
