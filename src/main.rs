mod cli;
mod config;
mod pools;
mod projects;
mod schema;
mod storage;
mod types;

use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use tracing::{error, info};

use crate::cli::Cli;
use crate::config::app_context::AppContext;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    let context = AppContext::new(&cli.config).await?;
    let ranking = context.get_settings().await.ranking.clone();
    info!("Running {:?}", cli.command);

    let mut service = context.project_service().await?;
    let outcome = cli::run(cli.command, &mut service, &ranking).await;
    // the service holds the notification queue open
    drop(service);
    context.shutdown().await;

    match outcome? {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(e) if e.is_rejection() => {
            info!("Rejected: {e}");
            println!("{}", serde_json::to_string_pretty(&e)?);
            Ok(())
        }
        Err(e) => {
            error!("{e}");
            println!("{}", serde_json::to_string_pretty(&e)?);
            Err(e.into())
        }
    }
}
