mod config;
mod db;
mod error;
mod hh;
mod menu;
mod models;
mod queries;
mod sync;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::{Command, Config};
use crate::hh::HhClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hhsync=info")),
        )
        .init();

    let config = Config::parse();

    match config.resolved_command() {
        Command::Sync { employer_ids } => {
            tracing::info!("Preparing database '{}'...", config.db_name);
            db::ensure_database(&config.admin_url(), &config.db_name).await?;
            let pool = db::create_pool(&config.database_url()).await?;
            db::create_schema(&pool).await?;

            let client = HhClient::new()?;
            tracing::info!("Fetching data from hh.ru for {} employers...", employer_ids.len());
            let stats = sync::run(&pool, &client, &employer_ids).await;
            tracing::info!(
                "Load complete: {} employers, {} vacancies, {} failed rows",
                stats.employers,
                stats.vacancies,
                stats.failed
            );
        }
        Command::Menu => {
            let pool = db::create_pool(&config.database_url()).await?;
            menu::run(&pool).await?;
        }
    }

    Ok(())
}
