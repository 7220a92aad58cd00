use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::errors::internal::DatabaseError;
use crate::errors::InternalError;
use crate::services::geo::{LocationResolver, UNKNOWN_LOCATION};
use crate::services::{RiskScorer, SuspicionClassifier};
use crate::stores::{EventStore, UserStore};
use crate::types::internal::{LoginEvaluation, LoginStatus, NewLoginAttempt};

/// Budget for the external geolocation lookup. A slow or dead provider
/// degrades the recorded location, never the login itself.
const GEO_LOOKUP_TIMEOUT: Duration = Duration::from_secs(3);

/// Orchestrates login event recording
///
/// Credential verification and token issuance are external; this service
/// receives the authentication outcome and owns everything that follows:
/// suspicion classification, the append-only event row, last-login and
/// risk-score updates. Insert and score update run in one transaction.
pub struct LoginService {
    db: DatabaseConnection,
    user_store: Arc<UserStore>,
    event_store: Arc<EventStore>,
    suspicion: Arc<SuspicionClassifier>,
    risk_scorer: Arc<RiskScorer>,
    resolver: Arc<dyn LocationResolver>,
}

impl LoginService {
    pub fn new(
        db: DatabaseConnection,
        user_store: Arc<UserStore>,
        event_store: Arc<EventStore>,
        suspicion: Arc<SuspicionClassifier>,
        risk_scorer: Arc<RiskScorer>,
        resolver: Arc<dyn LocationResolver>,
    ) -> Self {
        Self {
            db,
            user_store,
            event_store,
            suspicion,
            risk_scorer,
            resolver,
        }
    }

    /// Record the outcome of a login call.
    ///
    /// `password_ok` is the verdict of the external credential check; it is
    /// ignored when the username matches no known user.
    pub async fn record_login(
        &self,
        username: &str,
        password_ok: bool,
        ip_address: &str,
        device_info: &str,
    ) -> Result<LoginEvaluation, InternalError> {
        let location = self.resolve_location(ip_address).await;
        let now = Utc::now().timestamp();

        let user = self.user_store.get_user_by_username(&self.db, username).await?;

        let user = match user {
            Some(u) if password_ok => u,
            matched => {
                let user_id = matched.map(|u| u.id);
                return self
                    .record_failed(user_id, username, ip_address, device_info, location, now)
                    .await;
            }
        };

        if !user.is_active {
            // Matches the recording policy for suspended accounts: a valid
            // password against an inactive account leaves no event row
            return Ok(LoginEvaluation::Suspended);
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|source| DatabaseError::TransactionBegin { source })?;

        let suspicious = self
            .suspicion
            .is_suspicious(&txn, &user.id, ip_address, device_info)
            .await?;

        let status = if suspicious {
            LoginStatus::Suspicious
        } else {
            LoginStatus::Success
        };

        self.event_store
            .insert_login_attempt(
                &txn,
                NewLoginAttempt {
                    user_id: Some(user.id.clone()),
                    username: user.username.clone(),
                    ip_address: ip_address.to_string(),
                    device_info: device_info.to_string(),
                    location: location.clone(),
                    status,
                    is_suspicious: suspicious,
                    timestamp: now,
                },
            )
            .await?;

        self.user_store.set_last_login(&txn, &user.id, now).await?;

        let risk_score = self
            .risk_scorer
            .recompute_and_store(&txn, &user.id, now)
            .await?;

        txn.commit()
            .await
            .map_err(|source| DatabaseError::TransactionCommit { source })?;

        if suspicious {
            tracing::warn!(user = %user.username, ip = ip_address, "suspicious login recorded");
        }

        Ok(LoginEvaluation::Accepted {
            suspicious,
            risk_score,
            location,
        })
    }

    /// Failed-credential path: log the attempt and, for a matched user,
    /// fold it into their risk score.
    async fn record_failed(
        &self,
        user_id: Option<String>,
        username: &str,
        ip_address: &str,
        device_info: &str,
        location: String,
        now: i64,
    ) -> Result<LoginEvaluation, InternalError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|source| DatabaseError::TransactionBegin { source })?;

        self.event_store
            .insert_login_attempt(
                &txn,
                NewLoginAttempt {
                    user_id: user_id.clone(),
                    username: username.to_string(),
                    ip_address: ip_address.to_string(),
                    device_info: device_info.to_string(),
                    location,
                    status: LoginStatus::Failed,
                    is_suspicious: false,
                    timestamp: now,
                },
            )
            .await?;

        // Unmatched usernames have no score to update
        let risk_score = match &user_id {
            Some(id) => Some(self.risk_scorer.recompute_and_store(&txn, id, now).await?),
            None => None,
        };

        txn.commit()
            .await
            .map_err(|source| DatabaseError::TransactionCommit { source })?;

        Ok(LoginEvaluation::Rejected { risk_score })
    }

    async fn resolve_location(&self, ip_address: &str) -> String {
        match tokio::time::timeout(GEO_LOOKUP_TIMEOUT, self.resolver.resolve(ip_address)).await {
            Ok(Some(location)) => location,
            Ok(None) => UNKNOWN_LOCATION.to_string(),
            Err(_) => {
                tracing::debug!(ip = ip_address, "geolocation lookup timed out");
                UNKNOWN_LOCATION.to_string()
            }
        }
    }
}
