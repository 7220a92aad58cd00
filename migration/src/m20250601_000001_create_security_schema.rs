use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Users table: identity plus mutable trust state
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Role)
                            .string()
                            .not_null()
                            .default("employee"),
                    )
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(
                        ColumnDef::new(Users::RiskScore)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_username")
                    .table(Users::Table)
                    .col(Users::Username)
                    .to_owned(),
            )
            .await?;

        // Login attempts: append-only event log
        manager
            .create_table(
                Table::create()
                    .table(LoginAttempts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LoginAttempts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LoginAttempts::UserId).string().null())
                    .col(
                        ColumnDef::new(LoginAttempts::Username)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LoginAttempts::IpAddress)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LoginAttempts::DeviceInfo)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LoginAttempts::Location)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LoginAttempts::Status)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LoginAttempts::IsSuspicious)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(LoginAttempts::Timestamp)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_login_attempts_user_ts")
                    .table(LoginAttempts::Table)
                    .col(LoginAttempts::UserId)
                    .col(LoginAttempts::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_login_attempts_status")
                    .table(LoginAttempts::Table)
                    .col(LoginAttempts::Status)
                    .to_owned(),
            )
            .await?;

        // File accesses: append-only, one row per access check
        manager
            .create_table(
                Table::create()
                    .table(FileAccesses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FileAccesses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FileAccesses::UserId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FileAccesses::Username)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FileAccesses::FilePath)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FileAccesses::Action)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FileAccesses::RiskLevel)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FileAccesses::IsAuthorized)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(FileAccesses::Timestamp)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_file_accesses_user_ts")
                    .table(FileAccesses::Table)
                    .col(FileAccesses::UserId)
                    .col(FileAccesses::Timestamp)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FileAccesses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(LoginAttempts::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    Role,
    IsActive,
    LastLogin,
    RiskScore,
    CreatedAt,
}

#[derive(DeriveIden)]
enum LoginAttempts {
    Table,
    Id,
    UserId,
    Username,
    IpAddress,
    DeviceInfo,
    Location,
    Status,
    IsSuspicious,
    Timestamp,
}

#[derive(DeriveIden)]
enum FileAccesses {
    Table,
    Id,
    UserId,
    Username,
    FilePath,
    Action,
    RiskLevel,
    IsAuthorized,
    Timestamp,
}
