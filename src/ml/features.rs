use std::sync::Arc;

use sea_orm::ConnectionTrait;

use crate::errors::InternalError;
use crate::stores::EventStore;
use crate::types::internal::LoginStatus;

/// Length of the per-user feature vector. Order is significant.
pub const FEATURE_LEN: usize = 3;

/// Projects a user's event history into a fixed-size feature vector
///
/// Counts are all-time, unlike the hour-windowed risk scorer; the file
/// access count stands in as a coarse session-activity proxy. A user id
/// with no history (or no user at all) yields the zero vector.
pub struct FeatureExtractor {
    event_store: Arc<EventStore>,
}

impl FeatureExtractor {
    pub fn new(event_store: Arc<EventStore>) -> Self {
        Self { event_store }
    }

    /// Vector layout: [failed logins, all login attempts, file accesses].
    pub async fn extract<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
    ) -> Result<[f64; FEATURE_LEN], InternalError> {
        let failed_logins = self
            .event_store
            .count_login_attempts(conn, user_id, Some(LoginStatus::Failed), None)
            .await?;

        let login_attempts = self
            .event_store
            .count_login_attempts(conn, user_id, None, None)
            .await?;

        let file_accesses = self
            .event_store
            .count_file_accesses(conn, user_id, None, None)
            .await?;

        Ok([
            failed_logins as f64,
            login_attempts as f64,
            file_accesses as f64,
        ])
    }
}
