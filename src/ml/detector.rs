use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use sea_orm::ConnectionTrait;

use crate::errors::InternalError;
use crate::ml::features::{FeatureExtractor, FEATURE_LEN};
use crate::ml::forest::IsolationForest;

/// Result of scoring a user against the trained model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnomalyScore {
    /// Continuous decision-function value; negative means outlier.
    pub score: f64,
    pub is_anomaly: bool,
}

impl AnomalyScore {
    /// Returned whenever no model artifact is available.
    pub fn unavailable() -> Self {
        Self {
            score: 0.0,
            is_anomaly: false,
        }
    }
}

/// Serving-time anomaly scorer over the trained isolation forest
///
/// The artifact is deserialized at most once per process; the `OnceLock`
/// makes racing first loads collapse into a single effective load. A
/// missing or unreadable artifact pins the cache to "unavailable" and
/// every score call then degrades to (0.0, false), never an error for
/// the caller.
pub struct AnomalyDetector {
    artifact_path: PathBuf,
    features: FeatureExtractor,
    model: OnceLock<Option<Arc<IsolationForest>>>,
}

impl AnomalyDetector {
    pub fn new(artifact_path: PathBuf, features: FeatureExtractor) -> Self {
        Self {
            artifact_path,
            features,
            model: OnceLock::new(),
        }
    }

    /// Score a user's all-time activity profile.
    ///
    /// Database errors from feature extraction still propagate; only model
    /// availability is degraded, per the error-handling contract.
    pub async fn score<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
    ) -> Result<AnomalyScore, InternalError> {
        let Some(model) = self.model() else {
            return Ok(AnomalyScore::unavailable());
        };

        let features = self.features.extract(conn, user_id).await?;
        let score = model.decision_function(&features);
        let is_anomaly = score < 0.0;

        tracing::debug!(user_id, score, is_anomaly, "anomaly check");

        Ok(AnomalyScore { score, is_anomaly })
    }

    /// Whether a model artifact was successfully loaded. Forces the load.
    pub fn is_loaded(&self) -> bool {
        self.model().is_some()
    }

    fn model(&self) -> Option<Arc<IsolationForest>> {
        self.model
            .get_or_init(|| match IsolationForest::load(&self.artifact_path) {
                // An artifact trained on a different feature shape is as
                // unusable as a corrupt one
                Ok(model) if model.n_features() != FEATURE_LEN => {
                    tracing::warn!(
                        path = %self.artifact_path.display(),
                        artifact_features = model.n_features(),
                        expected_features = FEATURE_LEN,
                        "anomaly model feature count mismatch; scoring disabled"
                    );
                    None
                }
                Ok(model) => {
                    tracing::info!(
                        path = %self.artifact_path.display(),
                        "anomaly model loaded"
                    );
                    Some(Arc::new(model))
                }
                Err(e) => {
                    tracing::warn!(
                        path = %self.artifact_path.display(),
                        error = %e,
                        "anomaly model unavailable; scoring disabled"
                    );
                    None
                }
            })
            .clone()
    }
}
