use std::env;
use std::path::PathBuf;

/// Bootstrap settings for infrastructure configuration
///
/// Everything the process needs before stores exist: where the database
/// lives and where the trained anomaly-model artifact is expected.
#[derive(Debug, Clone)]
pub struct BootstrapSettings {
    database_url: String,
    model_artifact_path: PathBuf,
}

impl BootstrapSettings {
    pub fn new(database_url: impl Into<String>, model_artifact_path: impl Into<PathBuf>) -> Self {
        Self {
            database_url: database_url.into(),
            model_artifact_path: model_artifact_path.into(),
        }
    }

    /// Load bootstrap settings from environment variables
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://security.db?mode=rwc".to_string());

        let model_artifact_path = env::var("ANOMALY_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("ml/anomaly_model.json"));

        Self {
            database_url,
            model_artifact_path,
        }
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn model_artifact_path(&self) -> &PathBuf {
        &self.model_artifact_path
    }
}
