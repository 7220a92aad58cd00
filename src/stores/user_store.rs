use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::internal::UserError;
use crate::errors::InternalError;
use crate::types::db::user;
use crate::types::internal::NewUser;

/// Repository for user identity and trust state
///
/// The risk scorer is the only caller of `update_risk_score`; nothing else
/// writes that column.
pub struct UserStore;

impl UserStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn get_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find_by_id(user_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_user", e))
    }

    pub async fn get_user_by_username<C: ConnectionTrait>(
        &self,
        conn: &C,
        username: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_user_by_username", e))
    }

    /// Create a user with risk score 0 and active=true.
    ///
    /// # Errors
    ///
    /// `UserError::DuplicateUsername` / `DuplicateEmail` when either unique
    /// attribute is already taken.
    pub async fn create_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        new_user: NewUser,
    ) -> Result<user::Model, InternalError> {
        if self
            .get_user_by_username(conn, &new_user.username)
            .await?
            .is_some()
        {
            return Err(UserError::DuplicateUsername(new_user.username).into());
        }

        let existing_email = user::Entity::find()
            .filter(user::Column::Email.eq(&new_user.email))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("create_user", e))?;
        if existing_email.is_some() {
            return Err(UserError::DuplicateEmail(new_user.email).into());
        }

        let model = user::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            username: Set(new_user.username),
            email: Set(new_user.email),
            role: Set(new_user.role.as_str().to_string()),
            is_active: Set(true),
            last_login: Set(None),
            risk_score: Set(0),
            created_at: Set(Utc::now().timestamp()),
        };

        model
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("create_user", e))
    }

    /// Persist a recomputed risk score. Sole writer of the risk_score column.
    pub async fn update_risk_score<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        score: i32,
    ) -> Result<(), InternalError> {
        let update = user::ActiveModel {
            id: Set(user_id.to_string()),
            risk_score: Set(score),
            ..Default::default()
        };

        update
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_risk_score", e))?;

        Ok(())
    }

    pub async fn set_last_login<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        timestamp: i64,
    ) -> Result<(), InternalError> {
        let update = user::ActiveModel {
            id: Set(user_id.to_string()),
            last_login: Set(Some(timestamp)),
            ..Default::default()
        };

        update
            .update(conn)
            .await
            .map_err(|e| InternalError::database("set_last_login", e))?;

        Ok(())
    }

    /// Suspend an account. Sets is_active=false; users are never deleted.
    pub async fn suspend<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
    ) -> Result<user::Model, InternalError> {
        let user = self
            .get_user(conn, user_id)
            .await?
            .ok_or_else(|| UserError::UserNotFound(user_id.to_string()))?;

        let update = user::ActiveModel {
            id: Set(user.id.clone()),
            is_active: Set(false),
            ..Default::default()
        };

        update
            .update(conn)
            .await
            .map_err(|e| InternalError::database("suspend_user", e))
    }

    pub async fn count_users<C: ConnectionTrait>(&self, conn: &C) -> Result<u64, InternalError> {
        user::Entity::find()
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_users", e))
    }

    pub async fn count_active_users<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> Result<u64, InternalError> {
        user::Entity::find()
            .filter(user::Column::IsActive.eq(true))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_active_users", e))
    }

    pub async fn count_users_above_risk<C: ConnectionTrait>(
        &self,
        conn: &C,
        threshold: i32,
    ) -> Result<u64, InternalError> {
        user::Entity::find()
            .filter(user::Column::RiskScore.gt(threshold))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_users_above_risk", e))
    }

    /// Users carrying any risk, highest first. Feeds the risk report.
    pub async fn users_with_risk<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> Result<Vec<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::RiskScore.gt(0))
            .order_by_desc(user::Column::RiskScore)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("users_with_risk", e))
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
