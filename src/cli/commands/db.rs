use anyhow::Context;
use clap::Subcommand;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::{DatabaseManager, PgStore, Store};

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Create enum types, tables and indexes (idempotent)")]
    Init,

    #[command(about = "Check database connectivity")]
    Ping,
}

pub async fn handle(cmd: DbCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect_lazy(&config.database).context("cannot build database pool")?;

    match cmd {
        DbCommands::Init => {
            DatabaseManager::apply_schema(&pool)
                .await
                .context("failed to apply schema")?;
            output_success(&output_format, "Database schema applied", None)
        }
        DbCommands::Ping => {
            PgStore::new(pool).ping().await.context("database unreachable")?;
            output_success(&output_format, "Database reachable", None)
        }
    }
}
