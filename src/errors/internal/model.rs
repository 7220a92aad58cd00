use std::path::PathBuf;
use thiserror::Error;

/// Errors from anomaly-model training and artifact handling.
///
/// Artifact load failures are reported here but are not surfaced to
/// scoring callers; the detector degrades to an unavailable model instead.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model artifact unreadable at {path}: {source}")]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Model artifact at {path} is not a valid model: {source}")]
    ArtifactParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write model artifact to {path}: {source}")]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Training dataset unreadable at {path}: {source}")]
    DatasetRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Training dataset is missing required column: {0}")]
    MissingColumn(String),

    #[error("Training dataset contains no rows")]
    EmptyDataset,

    #[error("Training dataset line {line}: {message}")]
    BadValue { line: usize, message: String },
}
