use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::errors::InternalError;
use crate::types::db::{file_access, login_attempt};
use crate::types::internal::{LoginStatus, NewFileAccess, NewLoginAttempt};

/// Repository for the append-only login_attempts and file_accesses logs
///
/// Every method is generic over the connection so callers decide the
/// transaction boundary; reads through a transaction see that
/// transaction's uncommitted inserts.
pub struct EventStore;

impl EventStore {
    pub fn new() -> Self {
        Self
    }

    /// Append a login attempt. Rows are never mutated or deleted.
    pub async fn insert_login_attempt<C: ConnectionTrait>(
        &self,
        conn: &C,
        record: NewLoginAttempt,
    ) -> Result<(), InternalError> {
        let attempt = login_attempt::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            user_id: Set(record.user_id),
            username: Set(record.username),
            ip_address: Set(record.ip_address),
            device_info: Set(record.device_info),
            location: Set(record.location),
            status: Set(record.status.as_str().to_string()),
            is_suspicious: Set(record.is_suspicious),
            timestamp: Set(record.timestamp),
        };

        attempt
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_login_attempt", e))?;

        Ok(())
    }

    /// Append a file access row, one per access check.
    pub async fn insert_file_access<C: ConnectionTrait>(
        &self,
        conn: &C,
        record: NewFileAccess,
    ) -> Result<(), InternalError> {
        let access = file_access::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            user_id: Set(record.user_id),
            username: Set(record.username),
            file_path: Set(record.file_path),
            action: Set(record.action.as_str().to_string()),
            risk_level: Set(record.risk_level.as_str().to_string()),
            is_authorized: Set(record.is_authorized),
            timestamp: Set(record.timestamp),
        };

        access
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_file_access", e))?;

        Ok(())
    }

    /// Count a user's login attempts, optionally by status and strictly
    /// newer than `since`.
    pub async fn count_login_attempts<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        status: Option<LoginStatus>,
        since: Option<i64>,
    ) -> Result<u64, InternalError> {
        let mut query =
            login_attempt::Entity::find().filter(login_attempt::Column::UserId.eq(user_id));

        if let Some(status) = status {
            query = query.filter(login_attempt::Column::Status.eq(status.as_str()));
        }
        if let Some(since) = since {
            query = query.filter(login_attempt::Column::Timestamp.gt(since));
        }

        query
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_login_attempts", e))
    }

    /// Count a user's attempts carrying the suspicious flag, strictly
    /// newer than `since` when given.
    pub async fn count_suspicious_logins<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        since: Option<i64>,
    ) -> Result<u64, InternalError> {
        let mut query = login_attempt::Entity::find()
            .filter(login_attempt::Column::UserId.eq(user_id))
            .filter(login_attempt::Column::IsSuspicious.eq(true));

        if let Some(since) = since {
            query = query.filter(login_attempt::Column::Timestamp.gt(since));
        }

        query
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_suspicious_logins", e))
    }

    /// Count a user's file accesses, optionally by authorization outcome
    /// and strictly newer than `since`.
    pub async fn count_file_accesses<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        authorized: Option<bool>,
        since: Option<i64>,
    ) -> Result<u64, InternalError> {
        let mut query =
            file_access::Entity::find().filter(file_access::Column::UserId.eq(user_id));

        if let Some(authorized) = authorized {
            query = query.filter(file_access::Column::IsAuthorized.eq(authorized));
        }
        if let Some(since) = since {
            query = query.filter(file_access::Column::Timestamp.gt(since));
        }

        query
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_file_accesses", e))
    }

    /// Fetch a user's most recent attempts matching any of `statuses`,
    /// newest first. Timestamps are unix seconds, so insertion order
    /// breaks same-second ties.
    pub async fn recent_login_attempts<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        statuses: &[LoginStatus],
        limit: u64,
    ) -> Result<Vec<login_attempt::Model>, InternalError> {
        let status_values: Vec<&str> = statuses.iter().map(|s| s.as_str()).collect();

        login_attempt::Entity::find()
            .filter(login_attempt::Column::UserId.eq(user_id))
            .filter(login_attempt::Column::Status.is_in(status_values))
            .order_by_desc(login_attempt::Column::Timestamp)
            .order_by_desc(login_attempt::Column::Id)
            .limit(limit)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("recent_login_attempts", e))
    }

    /// Latest attempts across all users, newest first. Feeds the admin views.
    pub async fn latest_login_attempts<C: ConnectionTrait>(
        &self,
        conn: &C,
        limit: u64,
    ) -> Result<Vec<login_attempt::Model>, InternalError> {
        login_attempt::Entity::find()
            .order_by_desc(login_attempt::Column::Timestamp)
            .order_by_desc(login_attempt::Column::Id)
            .limit(limit)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("latest_login_attempts", e))
    }

    /// Latest file accesses across all users, newest first.
    pub async fn latest_file_accesses<C: ConnectionTrait>(
        &self,
        conn: &C,
        limit: u64,
    ) -> Result<Vec<file_access::Model>, InternalError> {
        file_access::Entity::find()
            .order_by_desc(file_access::Column::Timestamp)
            .order_by_desc(file_access::Column::Id)
            .limit(limit)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("latest_file_accesses", e))
    }

    /// Count login attempts across all users strictly newer than `since`,
    /// optionally restricted to one status.
    pub async fn count_all_login_attempts_since<C: ConnectionTrait>(
        &self,
        conn: &C,
        status: Option<LoginStatus>,
        since: i64,
    ) -> Result<u64, InternalError> {
        let mut query =
            login_attempt::Entity::find().filter(login_attempt::Column::Timestamp.gt(since));

        if let Some(status) = status {
            query = query.filter(login_attempt::Column::Status.eq(status.as_str()));
        }

        query
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_all_login_attempts_since", e))
    }

    /// Count denied file accesses across all users strictly newer than `since`.
    pub async fn count_all_blocked_accesses_since<C: ConnectionTrait>(
        &self,
        conn: &C,
        since: i64,
    ) -> Result<u64, InternalError> {
        file_access::Entity::find()
            .filter(file_access::Column::IsAuthorized.eq(false))
            .filter(file_access::Column::Timestamp.gt(since))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_all_blocked_accesses_since", e))
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}
