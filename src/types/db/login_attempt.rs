use sea_orm::entity::prelude::*;

/// SeaORM entity for the append-only login_attempts log
///
/// `user_id` is null when the submitted username matched no known user.
/// `is_suspicious` is stored independently of `status` for query convenience;
/// it is always false for failed rows.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "login_attempts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: Option<String>,
    pub username: String,
    pub ip_address: String,
    pub device_info: String,
    pub location: String,
    pub status: String,
    pub is_suspicious: bool,
    pub timestamp: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
