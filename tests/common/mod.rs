#![allow(dead_code)]

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use twilu::api::error::AppError;
use twilu::config::AppConfig;
use twilu::entities::users;
use twilu::infrastructure::database;
use twilu::services::account_service::NewAccount;
use twilu::services::folder_service::NewFolder;
use twilu::services::item_service::NewItem;
use twilu::AppState;

pub const PASSWORD: &str = "Abc123!";

pub async fn setup_test_db() -> DatabaseConnection {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("twilu=debug")
        .with_test_writer()
        .try_init();

    // One connection: every connection to `sqlite::memory:` is its own database.
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opt).await.unwrap();
    database::run_migrations(&db).await.unwrap();
    db
}

pub async fn setup_state_with(config: AppConfig) -> AppState {
    let db = setup_test_db().await;
    AppState::new(db, config)
}

pub async fn setup_state() -> AppState {
    setup_state_with(AppConfig::development()).await
}

pub async fn create_user(state: &AppState, username: &str) -> users::Model {
    state
        .accounts
        .create_account(NewAccount {
            username: username.to_string(),
            email: format!("{}@example.com", username.to_lowercase()),
            password: PASSWORD.to_string(),
        })
        .await
        .unwrap()
}

pub fn new_folder(name: &str, private: bool) -> NewFolder {
    NewFolder {
        name: name.to_string(),
        private,
        cover_url: None,
    }
}

pub fn new_item(name: &str) -> NewItem {
    NewItem {
        name: name.to_string(),
        url: format!("https://example.com/{}", name),
    }
}

pub fn assert_not_found<T: std::fmt::Debug>(result: Result<T, AppError>) {
    match result {
        Err(AppError::NotFound(_)) => {}
        other => panic!("expected NotFound, got {:?}", other),
    }
}

pub fn assert_permission_denied<T: std::fmt::Debug>(result: Result<T, AppError>) {
    match result {
        Err(AppError::PermissionDenied(_)) => {}
        other => panic!("expected PermissionDenied, got {:?}", other),
    }
}
