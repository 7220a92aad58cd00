use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::errors::InternalError;
use crate::stores::{EventStore, UserStore};
use crate::types::db::{file_access, login_attempt, user};
use crate::types::internal::LoginStatus;

const ADMIN_VIEW_LIMIT: u64 = 50;
const ELEVATED_RISK_THRESHOLD: i32 = 50;

/// Aggregate counters for the monitoring overview.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_users: u64,
    pub active_users: u64,
    pub today_logins: u64,
    pub failed_logins: u64,
    pub blocked_files: u64,
    pub risk_users: u64,
}

/// One row of the elevated-risk user report.
#[derive(Debug, Serialize)]
pub struct RiskUserReport {
    pub id: String,
    pub username: String,
    pub email: String,
    pub risk_score: i32,
    pub status: &'static str,
    pub reasons: String,
    pub last_login: Option<i64>,
}

/// Read-only queries behind the admin views
pub struct ReportingService {
    db: DatabaseConnection,
    event_store: Arc<EventStore>,
    user_store: Arc<UserStore>,
}

impl ReportingService {
    pub fn new(
        db: DatabaseConnection,
        event_store: Arc<EventStore>,
        user_store: Arc<UserStore>,
    ) -> Self {
        Self {
            db,
            event_store,
            user_store,
        }
    }

    /// Counters since midnight UTC of the day containing `now`, plus
    /// user totals.
    pub async fn dashboard(&self, now: i64) -> Result<DashboardStats, InternalError> {
        let day_start = day_start_utc(now);

        let total_users = self.user_store.count_users(&self.db).await?;
        let active_users = self.user_store.count_active_users(&self.db).await?;

        let today_logins = self
            .event_store
            .count_all_login_attempts_since(&self.db, None, day_start)
            .await?;
        let failed_logins = self
            .event_store
            .count_all_login_attempts_since(&self.db, Some(LoginStatus::Failed), day_start)
            .await?;
        let blocked_files = self
            .event_store
            .count_all_blocked_accesses_since(&self.db, day_start)
            .await?;

        let risk_users = self
            .user_store
            .count_users_above_risk(&self.db, ELEVATED_RISK_THRESHOLD)
            .await?;

        Ok(DashboardStats {
            total_users,
            active_users,
            today_logins,
            failed_logins,
            blocked_files,
            risk_users,
        })
    }

    /// Users carrying any risk, highest score first, with all-time event
    /// counts behind a human-readable reasons string.
    pub async fn risk_users(&self) -> Result<Vec<RiskUserReport>, InternalError> {
        let users = self.user_store.users_with_risk(&self.db).await?;

        let mut report = Vec::with_capacity(users.len());
        for u in users {
            report.push(self.risk_user_entry(u).await?);
        }

        Ok(report)
    }

    async fn risk_user_entry(&self, u: user::Model) -> Result<RiskUserReport, InternalError> {
        let failed = self
            .event_store
            .count_login_attempts(&self.db, &u.id, Some(LoginStatus::Failed), None)
            .await?;
        let unauthorized = self
            .event_store
            .count_file_accesses(&self.db, &u.id, Some(false), None)
            .await?;

        let mut reasons = Vec::new();
        if failed > 0 {
            reasons.push(format!("{failed} failed login(s)"));
        }
        if unauthorized > 0 {
            reasons.push(format!("{unauthorized} unauthorized file access(es)"));
        }

        let status = if u.risk_score > 75 {
            "critical"
        } else if u.risk_score > 50 {
            "high"
        } else {
            "medium"
        };

        Ok(RiskUserReport {
            id: u.id,
            username: u.username,
            email: u.email,
            risk_score: u.risk_score,
            status,
            reasons: reasons.join(", "),
            last_login: u.last_login,
        })
    }

    pub async fn latest_login_attempts(
        &self,
    ) -> Result<Vec<login_attempt::Model>, InternalError> {
        self.event_store
            .latest_login_attempts(&self.db, ADMIN_VIEW_LIMIT)
            .await
    }

    pub async fn latest_file_accesses(&self) -> Result<Vec<file_access::Model>, InternalError> {
        self.event_store
            .latest_file_accesses(&self.db, ADMIN_VIEW_LIMIT)
            .await
    }

    /// Suspend an account (active=false). Users are never deleted.
    pub async fn suspend_user(&self, user_id: &str) -> Result<user::Model, InternalError> {
        let user = self.user_store.suspend(&self.db, user_id).await?;
        tracing::info!(user = %user.username, "user suspended");
        Ok(user)
    }
}

fn day_start_utc(now: i64) -> i64 {
    DateTime::<Utc>::from_timestamp(now, 0)
        .map(|dt| {
            dt.date_naive()
                .and_hms_opt(0, 0, 0)
                .map(|d| d.and_utc().timestamp())
                .unwrap_or(now)
        })
        .unwrap_or(now)
}
