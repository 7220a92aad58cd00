use std::sync::Arc;

use sea_orm::ConnectionTrait;

use crate::errors::InternalError;
use crate::stores::{EventStore, UserStore};
use crate::types::internal::LoginStatus;

/// Trailing window over which events contribute to the score, in seconds.
pub const RISK_WINDOW_SECS: i64 = 3600;

const FAILED_LOGIN_WEIGHT: u64 = 10;
const UNAUTHORIZED_ACCESS_WEIGHT: u64 = 25;
const SUSPICIOUS_LOGIN_WEIGHT: u64 = 15;

pub const MAX_RISK_SCORE: i32 = 100;

/// Aggregates recent event counts into a bounded trust score
///
/// The score is recomputed from the event log on every call; it is
/// idempotent for a fixed window and event set. Only this component
/// writes the users.risk_score column.
pub struct RiskScorer {
    event_store: Arc<EventStore>,
    user_store: Arc<UserStore>,
}

impl RiskScorer {
    pub fn new(event_store: Arc<EventStore>, user_store: Arc<UserStore>) -> Self {
        Self {
            event_store,
            user_store,
        }
    }

    /// Compute the score over the hour ending at `now`, clamped to [0,100].
    ///
    /// Empty history yields 0; this never fails for a valid user id.
    pub async fn compute<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        now: i64,
    ) -> Result<i32, InternalError> {
        let window_start = now - RISK_WINDOW_SECS;

        let failed = self
            .event_store
            .count_login_attempts(conn, user_id, Some(LoginStatus::Failed), Some(window_start))
            .await?;

        let unauthorized = self
            .event_store
            .count_file_accesses(conn, user_id, Some(false), Some(window_start))
            .await?;

        let suspicious = self
            .event_store
            .count_suspicious_logins(conn, user_id, Some(window_start))
            .await?;

        let raw = failed * FAILED_LOGIN_WEIGHT
            + unauthorized * UNAUTHORIZED_ACCESS_WEIGHT
            + suspicious * SUSPICIOUS_LOGIN_WEIGHT;

        Ok(raw.min(MAX_RISK_SCORE as u64) as i32)
    }

    /// Compute and persist in one step, inside the caller's transaction.
    pub async fn recompute_and_store<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        now: i64,
    ) -> Result<i32, InternalError> {
        let score = self.compute(conn, user_id, now).await?;
        self.user_store
            .update_risk_score(conn, user_id, score)
            .await?;

        tracing::debug!(user_id, score, "risk score recomputed");

        Ok(score)
    }
}
