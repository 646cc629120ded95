use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::constants::CONFIG_FILENAME;
use crate::config::settings::RankingConfig;
use crate::projects::service::{LaunchpadProjectRequest, MigratedProjectRequest, ProjectService};
use crate::types::errors::ProjectResult;
use crate::types::platform::Platform;
use crate::types::project::NewProjectConfig;
use crate::types::store::RecordStore;

#[derive(Parser, Debug)]
#[command(name = "pool-cascade")]
#[command(version, about = "Operator tooling for project pools: resolution, status cascades, holder migration")]
pub struct Cli {
    /// Config file name, without extension
    #[arg(long, default_value = CONFIG_FILENAME)]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a project with its effective pool, relations and profit
    Resolve {
        project_id: i32,
        /// Store the effective pool on the project if it migrated
        #[arg(long)]
        persist: bool,
    },

    /// Activate or deactivate a project, cascading to its pool and strategies
    SetActive {
        project_id: i32,
        #[arg(action = ArgAction::Set)]
        active: bool,
    },

    /// Set the status of one pool (and of the bonding curve behind an AMM pool)
    SetPoolStatus {
        platform: String,
        pool_id: i32,
        #[arg(action = ArgAction::Set)]
        active: bool,
    },

    /// Copy holders of a migrated bonding curve onto its AMM pool
    MigrateHolders { pool_address: String },

    /// Profit of a project against the previous one
    Profit { project_id: i32 },

    /// Projects ranked by profit, within the configured bounds
    Rank {
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Holder ledger of one pool
    Holders { platform: String, pool_address: String },

    /// Create a project on an existing pool and token
    CreateProject {
        #[arg(long)]
        name: String,
        #[arg(long)]
        platform: String,
        #[arg(long)]
        pool_id: i32,
        #[arg(long)]
        token_id: i32,
    },

    /// Provision a bonding curve project from a JSON request file
    CreateMigrated { request: PathBuf },

    /// Provision a launchpad project from a JSON request file
    CreateLaunchpad { request: PathBuf },

    DeleteProject { project_id: i32 },

    DeletePool { platform: String, pool_id: i32 },
}

fn read_request<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Malformed request in {}", path.display()))
}

fn to_json<T: Serialize>(result: ProjectResult<T>) -> ProjectResult<Value> {
    result.map(|value| serde_json::to_value(value).unwrap_or(Value::Null))
}

/// Runs one command. The outer error is plumbing (bad input file); the inner one is the
/// domain outcome the operator should see.
pub async fn run<S: RecordStore>(
    command: Commands,
    service: &mut ProjectService<S>,
    ranking: &RankingConfig,
) -> Result<ProjectResult<Value>> {
    let outcome = match command {
        Commands::Resolve {
            project_id,
            persist,
        } => {
            if persist {
                if let Err(e) = service.persist_redirect(project_id).await {
                    return Ok(Err(e));
                }
            }
            to_json(service.resolve_project(project_id).await)
        }
        Commands::SetActive { project_id, active } => {
            to_json(service.set_project_active(project_id, active).await)
        }
        Commands::SetPoolStatus {
            platform,
            pool_id,
            active,
        } => match Platform::from_str(&platform) {
            Ok(platform) => service
                .set_pool_status(platform, pool_id, active)
                .await
                .map(|()| json!({ "platform": platform, "pool_id": pool_id, "active": active })),
            Err(e) => Err(e),
        },
        Commands::MigrateHolders { pool_address } => {
            to_json(service.migrate_pool_holders(&pool_address).await)
        }
        Commands::Profit { project_id } => service
            .profit(project_id)
            .await
            .map(|profit| json!({ "project_id": project_id, "profit": profit })),
        Commands::Rank { page, page_size } => {
            let page_size = page_size.unwrap_or(ranking.page_size);
            to_json(service.rank_projects(ranking.range(), page, page_size).await)
        }
        Commands::Holders {
            platform,
            pool_address,
        } => match Platform::from_str(&platform) {
            Ok(platform) => to_json(service.list_holders(platform, &pool_address).await),
            Err(e) => Err(e),
        },
        Commands::CreateProject {
            name,
            platform,
            pool_id,
            token_id,
        } => match Platform::from_str(&platform) {
            Ok(platform) => to_json(
                service
                    .create_project(NewProjectConfig::new(&name, platform, pool_id, token_id))
                    .await,
            ),
            Err(e) => Err(e),
        },
        Commands::CreateMigrated { request } => {
            let request: MigratedProjectRequest = read_request(&request)?;
            to_json(service.create_migrated_project(request).await)
        }
        Commands::CreateLaunchpad { request } => {
            let request: LaunchpadProjectRequest = read_request(&request)?;
            to_json(service.create_launchpad_project(request).await)
        }
        Commands::DeleteProject { project_id } => service
            .delete_project(project_id)
            .await
            .map(|()| json!({ "deleted_project": project_id })),
        Commands::DeletePool { platform, pool_id } => match Platform::from_str(&platform) {
            Ok(platform) => service
                .delete_pool(platform, pool_id)
                .await
                .map(|()| json!({ "deleted_pool": pool_id, "platform": platform })),
            Err(e) => Err(e),
        },
    };
    Ok(outcome)
}
