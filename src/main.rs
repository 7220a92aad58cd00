use clap::Parser;

use secmon_backend::cli::{self, Cli};
use secmon_backend::config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    config::init_logging()?;

    let args = Cli::parse();
    cli::execute(args).await
}
