pub mod commands;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "coffee-shop-api")]
#[command(about = "Coffee shop drinks menu API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve(commands::serve::ServeArgs),

    #[command(about = "Drop and recreate the drink table, then insert the sample drink")]
    ResetDb(commands::reset_db::ResetDbArgs),
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    match cli.command {
        Some(Commands::Serve(args)) => commands::serve::handle(args, config).await,
        Some(Commands::ResetDb(args)) => commands::reset_db::handle(args, config).await,
        None => commands::serve::handle(commands::serve::ServeArgs::default(), config).await,
    }
}
