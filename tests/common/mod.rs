// Common test utilities for integration tests

use std::path::PathBuf;
use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use secmon_backend::app_data::AppData;
use secmon_backend::config::BootstrapSettings;
use secmon_backend::services::FixedLocationResolver;
use secmon_backend::stores::{EventStore, UserStore};
use secmon_backend::types::db::user;
use secmon_backend::types::internal::{
    AccessAction, LoginStatus, NewFileAccess, NewLoginAttempt, NewUser, RiskLevel, UserRole,
};

pub const TEST_LOCATION: &str = "Testville, TS";

/// Creates a test database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Creates a fully wired pipeline over an in-memory database
///
/// `model_path` points the anomaly detector at an artifact; tests that
/// exercise the unavailable path pass a nonexistent location.
pub async fn setup_pipeline(model_path: impl Into<PathBuf>) -> AppData {
    let db = setup_test_db().await;
    let settings = BootstrapSettings::new("sqlite::memory:", model_path);

    AppData::init(
        db,
        &settings,
        Arc::new(FixedLocationResolver::new(TEST_LOCATION)),
    )
}

/// Creates a pipeline whose anomaly model is guaranteed absent.
pub async fn setup_pipeline_without_model() -> AppData {
    setup_pipeline("/nonexistent/anomaly_model.json").await
}

pub async fn create_user(
    db: &DatabaseConnection,
    username: &str,
    role: UserRole,
) -> user::Model {
    UserStore::new()
        .create_user(
            db,
            NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                role,
            },
        )
        .await
        .expect("Failed to create test user")
}

/// Append a login attempt with an explicit timestamp.
pub async fn insert_login(
    db: &DatabaseConnection,
    user_id: Option<&str>,
    username: &str,
    ip: &str,
    device: &str,
    status: LoginStatus,
    timestamp: i64,
) {
    EventStore::new()
        .insert_login_attempt(
            db,
            NewLoginAttempt {
                user_id: user_id.map(str::to_string),
                username: username.to_string(),
                ip_address: ip.to_string(),
                device_info: device.to_string(),
                location: TEST_LOCATION.to_string(),
                status,
                is_suspicious: status == LoginStatus::Suspicious,
                timestamp,
            },
        )
        .await
        .expect("Failed to insert login attempt");
}

/// Append a file access row with an explicit timestamp.
pub async fn insert_file_access(
    db: &DatabaseConnection,
    user_id: &str,
    username: &str,
    path: &str,
    authorized: bool,
    timestamp: i64,
) {
    EventStore::new()
        .insert_file_access(
            db,
            NewFileAccess {
                user_id: user_id.to_string(),
                username: username.to_string(),
                file_path: path.to_string(),
                action: if authorized {
                    AccessAction::Allowed
                } else {
                    AccessAction::Denied
                },
                risk_level: if authorized {
                    RiskLevel::Low
                } else {
                    RiskLevel::High
                },
                is_authorized: authorized,
                timestamp,
            },
        )
        .await
        .expect("Failed to insert file access");
}
