//! Tests for the settings service.

use super::{Language, ParseLanguageError, SettingsService};
use crate::entity::WorkspaceId;
use crate::storage::{
    adapters::InMemoryObjectStore,
    domain::{SettingKey, StoreName},
    services::StorageEngine,
};
use rstest::{fixture, rstest};

type Service = SettingsService<InMemoryObjectStore>;

#[fixture]
fn engine() -> StorageEngine<InMemoryObjectStore> {
    StorageEngine::new(InMemoryObjectStore::new())
}

#[fixture]
fn settings(engine: StorageEngine<InMemoryObjectStore>) -> Service {
    SettingsService::new(engine)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn app_name_is_scoped_per_workspace(settings: Service) {
    let home = WorkspaceId::from("home");
    let work = WorkspaceId::from("work");

    settings.set_app_name(&home, "Chores").await.expect("set");

    assert_eq!(settings.app_name(&home).await.as_deref(), Some("Chores"));
    assert_eq!(settings.app_name(&work).await, None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn clearing_the_icon_removes_the_record(engine: StorageEngine<InMemoryObjectStore>) {
    let settings = SettingsService::new(engine.clone());
    let home = WorkspaceId::from("home");

    settings
        .set_app_icon(&home, Some("data:image/png;base64,AA=="))
        .await
        .expect("set");
    settings.set_app_icon(&home, None).await.expect("clear");

    assert_eq!(settings.app_icon(&home).await, None);
    let stored = engine
        .get(
            StoreName::Settings,
            &SettingKey::app_icon("home").to_string(),
        )
        .await
        .expect("read");
    assert!(stored.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn language_defaults_to_english(settings: Service) {
    assert_eq!(settings.language().await, Language::En);

    settings.set_language(Language::De).await.expect("set");

    assert_eq!(settings.language().await, Language::De);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unsupported_stored_language_falls_back(engine: StorageEngine<InMemoryObjectStore>) {
    engine
        .put_setting(&SettingKey::Language, "fr")
        .await
        .expect("seed");
    let settings = SettingsService::new(engine);

    assert_eq!(settings.language().await, Language::En);
    assert_eq!(settings.language_or_locale(Some("es-MX")).await, Language::Es);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stored_language_wins_over_locale(settings: Service) {
    settings.set_language(Language::Es).await.expect("set");

    assert_eq!(settings.language_or_locale(Some("de-DE")).await, Language::Es);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn current_workspace_round_trips(settings: Service) {
    assert_eq!(settings.current_workspace().await, None);

    settings
        .set_current_workspace(&WorkspaceId::from("ws-9"))
        .await
        .expect("set");

    assert_eq!(
        settings.current_workspace().await,
        Some(WorkspaceId::from("ws-9"))
    );
}

#[rstest]
#[case("de-AT", Some(Language::De))]
#[case("EN_gb", Some(Language::En))]
#[case("fr-FR", None)]
fn locale_tags_map_to_languages(#[case] locale: &str, #[case] expected: Option<Language>) {
    assert_eq!(Language::from_locale(locale), expected);
}

#[rstest]
fn language_codes_parse_and_print() {
    assert_eq!("es".parse::<Language>(), Ok(Language::Es));
    assert_eq!(
        "pt".parse::<Language>(),
        Err(ParseLanguageError("pt".to_owned()))
    );
    assert_eq!(Language::De.to_string(), "de");
    assert_eq!(
        serde_json::to_value(Language::En).expect("serialise"),
        serde_json::json!("en")
    );
}
