use sea_orm::entity::prelude::*;

/// SeaORM entity for the append-only file_accesses log
///
/// Invariant: `action == "allowed"` exactly when `is_authorized` is true.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "file_accesses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: String,
    pub username: String,
    pub file_path: String,
    pub action: String,
    pub risk_level: String,
    pub is_authorized: bool,
    pub timestamp: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
