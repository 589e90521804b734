mod common;

use common::FakeGateway;
use gradewise::infrastructure::{keys, FileStore, JsonStoreExt, KeyValueStore};
use gradewise::models::{EducationSettings, SaveMeta};
use gradewise::orchestrator::{App, Command};
use gradewise::services::{HistoryService, LibraryService, SettingsService};
use gradewise::Config;
use std::sync::Arc;

fn app_in(dir: &std::path::Path, gateway: Arc<FakeGateway>) -> (App, Arc<FileStore>) {
    let store = Arc::new(FileStore::open(dir.join("data")).unwrap());
    let app = App::with_parts(Config::default(), store.clone(), gateway);
    (app, store)
}

#[tokio::test]
async fn test_grade_command_saves_history() {
    let dir = tempfile::tempdir().unwrap();
    let essay = dir.path().join("essay.txt");
    std::fs::write(&essay, "Steam power reshaped cities.").unwrap();

    let gateway = Arc::new(FakeGateway::new());
    let (app, store) = app_in(dir.path(), gateway.clone());

    let command = Command::parse(
        [
            "grade",
            essay.to_str().unwrap(),
            "Ada Lovelace",
            "S-1",
            "History 201",
        ]
        .map(String::from),
    )
    .unwrap();
    app.run(command).await.unwrap();

    let history = HistoryService::new(store.clone()).load();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].student_name, "Ada Lovelace");
    assert_eq!(history[0].subject, "History 201");
    assert_eq!(history[0].max_score, Some(10));
    assert_eq!(
        gateway.last_request().unwrap().submission_text,
        "Steam power reshaped cities."
    );

    // 记录写在数据目录中，新的存储实例能读到
    let reopened: Arc<dyn KeyValueStore> =
        Arc::new(FileStore::open(dir.path().join("data")).unwrap());
    assert_eq!(HistoryService::new(reopened).load(), history);
}

#[tokio::test]
async fn test_grade_command_reports_gateway_failure() {
    let dir = tempfile::tempdir().unwrap();
    let essay = dir.path().join("essay.txt");
    std::fs::write(&essay, "essay").unwrap();

    let gateway = Arc::new(FakeGateway::new().failing_grade(503));
    let (app, store) = app_in(dir.path(), gateway);

    let meta = SaveMeta {
        student_name: "Ada".to_string(),
        ..SaveMeta::default()
    };
    assert!(app.grade(&essay, meta).await.is_err());
    assert!(HistoryService::new(store).load().is_empty());
}

#[tokio::test]
async fn test_grade_command_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = Arc::new(FakeGateway::new());
    let (app, _) = app_in(dir.path(), gateway.clone());

    let missing = dir.path().join("missing.txt");
    assert!(app.grade(&missing, SaveMeta::default()).await.is_err());
    assert_eq!(gateway.grade_calls(), 0);
}

#[tokio::test]
async fn test_import_rubric_and_ingest_commands() {
    let dir = tempfile::tempdir().unwrap();
    let rubric = dir.path().join("rubric.pdf");
    let notes = dir.path().join("notes.pdf");
    std::fs::write(&rubric, b"%PDF").unwrap();
    std::fs::write(&notes, b"%PDF").unwrap();

    let gateway = Arc::new(FakeGateway::new());
    let (app, store) = app_in(dir.path(), gateway.clone());

    let imported = app.import_rubric(&[rubric]).await.unwrap();
    assert_eq!(
        LibraryService::new(store.clone()).imported_rubric(),
        Some(imported)
    );

    app.ingest(&[notes]).await.unwrap();
    assert_eq!(LibraryService::new(store.clone()).materials(), vec!["notes.pdf"]);
    assert_eq!(gateway.ingest_calls(), 1);
}

#[tokio::test]
async fn test_history_command_with_stored_settings() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = Arc::new(FakeGateway::new());
    let (app, store) = app_in(dir.path(), gateway);

    SettingsService::new(store.clone())
        .save_education(&EducationSettings {
            require_rubric: false,
            ..EducationSettings::default()
        })
        .unwrap();
    let stored: Option<EducationSettings> = store.load_json(keys::EDUCATION_SETTINGS);
    assert!(!stored.unwrap().require_rubric);

    app.run(Command::History {
        term: String::new(),
    })
    .await
    .unwrap();
}
