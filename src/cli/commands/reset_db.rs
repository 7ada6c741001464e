use anyhow::Context;
use clap::Args;

use crate::config::AppConfig;
use crate::database::Database;

#[derive(Debug, Args)]
pub struct ResetDbArgs {
    #[arg(long, help = "SQLite database URL (overrides DATABASE_URL)")]
    pub database_url: Option<String>,

    #[arg(long, help = "Confirm that every stored drink will be deleted")]
    pub yes: bool,
}

pub async fn handle(args: ResetDbArgs, mut config: AppConfig) -> anyhow::Result<()> {
    if let Some(url) = args.database_url {
        config.database.url = url;
    }

    if !args.yes {
        anyhow::bail!(
            "reset-db deletes every drink in {}; re-run with --yes to confirm",
            config.database.url
        );
    }

    let db = Database::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    db.reset().await.context("failed to reset drink table")?;
    db.close().await;

    println!("Drink table reset in {}", config.database.url);
    Ok(())
}
