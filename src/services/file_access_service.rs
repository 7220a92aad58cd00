use std::sync::Arc;

use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::errors::internal::DatabaseError;
use crate::errors::InternalError;
use crate::services::{AccessPolicy, RiskScorer};
use crate::stores::EventStore;
use crate::types::db::user;
use crate::types::internal::{AccessAction, AccessDecision, NewFileAccess, UserRole};

/// Records file access checks and applies the restricted-path policy
///
/// Every check writes exactly one file_accesses row; an unauthorized
/// outcome also recomputes the user's risk score. Row insert and score
/// update share one transaction so a crash can never leave a stale score
/// next to a committed event.
pub struct FileAccessService {
    db: DatabaseConnection,
    event_store: Arc<EventStore>,
    risk_scorer: Arc<RiskScorer>,
}

impl FileAccessService {
    pub fn new(
        db: DatabaseConnection,
        event_store: Arc<EventStore>,
        risk_scorer: Arc<RiskScorer>,
    ) -> Self {
        Self {
            db,
            event_store,
            risk_scorer,
        }
    }

    /// Check `file_path` for `user`, record the outcome, and update risk
    /// when the access was denied.
    pub async fn check_access(
        &self,
        user: &user::Model,
        file_path: &str,
    ) -> Result<AccessDecision, InternalError> {
        let role = UserRole::from_db(&user.role);
        let decision = AccessPolicy::evaluate(role, file_path);
        let now = Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|source| DatabaseError::TransactionBegin { source })?;

        self.event_store
            .insert_file_access(
                &txn,
                NewFileAccess {
                    user_id: user.id.clone(),
                    username: user.username.clone(),
                    file_path: file_path.to_string(),
                    action: if decision.authorized {
                        AccessAction::Allowed
                    } else {
                        AccessAction::Denied
                    },
                    risk_level: decision.risk_level,
                    is_authorized: decision.authorized,
                    timestamp: now,
                },
            )
            .await?;

        if !decision.authorized {
            self.risk_scorer
                .recompute_and_store(&txn, &user.id, now)
                .await?;

            tracing::warn!(
                user = %user.username,
                path = file_path,
                level = decision.risk_level.as_str(),
                "unauthorized file access"
            );
        }

        txn.commit()
            .await
            .map_err(|source| DatabaseError::TransactionCommit { source })?;

        Ok(decision)
    }
}
