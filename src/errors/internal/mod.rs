use thiserror::Error;

pub mod database;
pub mod model;
pub mod user;

pub use database::DatabaseError;
pub use model::ModelError;
pub use user::UserError;

/// Internal error type for store and service operations
///
/// Infrastructure errors (database) are shared; domain errors live in
/// their own sub-enums. Outer layers decide what to surface to callers.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }
}
