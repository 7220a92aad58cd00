// CLI commands for bootstrap, offline training, and admin seeding

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;
use crate::config::{self, BootstrapSettings};
use crate::errors::internal::{ModelError, UserError};
use crate::errors::InternalError;
use crate::ml::{trainer, TrainConfig};
use crate::services::UnknownLocationResolver;
use crate::types::internal::{NewUser, UserRole};

#[derive(Parser)]
#[command(name = "secmon-backend", about = "Security monitoring backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Connect, migrate, and seed the bootstrap admin (default)
    Run,

    /// Train the anomaly model from a historical dataset
    Train {
        /// CSV file with failed_logins, unusual_time_access,
        /// ip_reputation_score columns
        #[arg(long)]
        data: PathBuf,

        /// Where to write the model artifact
        #[arg(long)]
        out: PathBuf,

        #[arg(long, default_value_t = 100)]
        trees: usize,

        #[arg(long, default_value_t = 0.15)]
        contamination: f64,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },

    /// Create an admin user
    SeedAdmin {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,
    },
}

pub async fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run().await?,
        Command::Train {
            data,
            out,
            trees,
            contamination,
            seed,
        } => {
            train(&data, &out, trees, contamination, seed)?;
        }
        Command::SeedAdmin { username, email } => seed_admin(username, email).await?,
    }

    Ok(())
}

async fn run() -> Result<(), InternalError> {
    let settings = BootstrapSettings::from_env();

    let db = config::database::connect(&settings).await?;
    config::database::migrate(&db).await?;

    let app_data = AppData::init(db, &settings, Arc::new(UnknownLocationResolver));

    seed_default_admin(&app_data).await?;

    if app_data.anomaly_detector.is_loaded() {
        tracing::info!("anomaly detection active");
    }

    tracing::info!("security monitoring core ready");

    Ok(())
}

fn train(
    data: &PathBuf,
    out: &PathBuf,
    trees: usize,
    contamination: f64,
    seed: u64,
) -> Result<(), ModelError> {
    let config = TrainConfig {
        trees,
        contamination,
        seed,
        ..TrainConfig::default()
    };

    trainer::train_from_csv(data, out, config)?;

    Ok(())
}

async fn seed_admin(username: String, email: String) -> Result<(), InternalError> {
    let settings = BootstrapSettings::from_env();

    let db = config::database::connect(&settings).await?;
    config::database::migrate(&db).await?;

    let app_data = AppData::init(db, &settings, Arc::new(UnknownLocationResolver));

    let user = app_data
        .user_store
        .create_user(
            &app_data.db,
            NewUser {
                username,
                email,
                role: UserRole::Admin,
            },
        )
        .await?;

    tracing::info!(user = %user.username, id = %user.id, "admin user created");

    Ok(())
}

/// Create the stock admin account on first run, matching the bootstrap
/// behavior of the deployment scripts. Existing installs are left alone.
async fn seed_default_admin(app_data: &AppData) -> Result<(), InternalError> {
    let result = app_data
        .user_store
        .create_user(
            &app_data.db,
            NewUser {
                username: "admin".to_string(),
                email: "admin@company.com".to_string(),
                role: UserRole::Admin,
            },
        )
        .await;

    match result {
        Ok(user) => {
            tracing::info!(id = %user.id, "bootstrap admin created");
            Ok(())
        }
        Err(InternalError::User(UserError::DuplicateUsername(_))) => Ok(()),
        Err(e) => Err(e),
    }
}
