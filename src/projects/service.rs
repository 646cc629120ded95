use serde_derive::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, info};

use crate::pools::augmenter::{augment, RelationBlob};
use crate::pools::cascade::{self, apply_pool_status, close_all_strategies};
use crate::pools::holder_migrator::{self, MigrationReport};
use crate::pools::profit::{self, ProfitRange, RankingPage};
use crate::pools::resolver::{resolve, Resolved};
use crate::projects::notifications::{MonitorTask, Notifier};
use crate::types::errors::{ProjectError, ProjectResult};
use crate::types::holder::HolderRow;
use crate::types::platform::Platform;
use crate::types::pool::{
    NewMeteoraCpmmPool, NewMeteoraDbcPool, NewRaydiumCpmmPool, NewRaydiumLaunchpadPool, PoolRecord,
};
use crate::types::project::{
    NewProjectConfig, NewProjectRole, NewTokenConfig, ProjectConfig, ProjectConfigChangeset,
    TokenConfig, Vesting,
};
use crate::types::relation::{NewRaydiumPoolRelation, RaydiumPoolRelation};
use crate::types::store::{finish, RecordStore};
use crate::types::strategy::{NewStrategyConfig, StrategyConfig};

fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

/// Everything a caller needs to present one project: the unmodified project row, where its
/// pool really lives, and the extras gathered around it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedProjectView {
    pub project: ProjectConfig,
    pub token: Option<TokenConfig>,
    pub resolved: Resolved,
    pub pool: PoolRecord,
    pub relations: RelationBlob,
    pub profit: f64,
    pub vesting: Option<Vesting>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyDraft {
    pub name: String,
    pub strategy_type: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
}

fn enabled_by_default() -> bool {
    true
}

/// A project on a Meteora bonding curve, provisioned together with its token and, when the
/// curve has already graduated, the AMM pool it migrated into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigratedProjectRequest {
    pub name: String,
    pub role_id: i32,
    pub token: NewTokenConfig,
    pub bonding_curve: NewMeteoraDbcPool,
    #[serde(default)]
    pub amm_pool: Option<NewMeteoraCpmmPool>,
    #[serde(default)]
    pub strategies: Vec<StrategyDraft>,
    #[serde(default)]
    pub vesting: Option<serde_json::Value>,
}

/// A project on a Raydium launchpad pool plus the CPMM pool it graduates into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchpadProjectRequest {
    pub name: String,
    pub role_id: i32,
    pub token: NewTokenConfig,
    pub launchpad_pool: NewRaydiumLaunchpadPool,
    pub cpmm_pool: NewRaydiumCpmmPool,
    #[serde(default)]
    pub vesting: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedProject {
    pub project: ProjectConfig,
    pub token: TokenConfig,
    pub pools: Vec<PoolRecord>,
    pub relation: Option<RaydiumPoolRelation>,
    pub strategies: Vec<StrategyConfig>,
}

/// Project-level flows over one record store. Compound writes are all-or-nothing.
pub struct ProjectService<S: RecordStore> {
    store: S,
    notifier: Notifier,
}

impl<S: RecordStore> ProjectService<S> {
    pub fn new(store: S, notifier: Notifier) -> Self {
        Self { store, notifier }
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    async fn load_project(&mut self, project_id: i32) -> ProjectResult<ProjectConfig> {
        load_project(&mut self.store, project_id).await
    }

    pub async fn resolve_project(&mut self, project_id: i32) -> ProjectResult<ResolvedProjectView> {
        let project = self.load_project(project_id).await?;
        let resolution = resolve(&mut self.store, project.platform()?, project.pool_id).await?;

        let token = self
            .store
            .find_token(project.token_id)
            .await
            .map_err(ProjectError::storage)?;
        if token.is_none() {
            debug!("token {} of project {} not found", project.token_id, project_id);
        }
        let relations = augment(&mut self.store, &resolution).await;
        let profit = profit::profit(&mut self.store, project_id).await?;
        let vesting = project.vesting();

        Ok(ResolvedProjectView {
            token,
            resolved: resolution.resolved,
            pool: resolution.pool,
            relations,
            profit,
            vesting,
            project,
        })
    }

    /// Stores the effective pool on the project when resolution redirected it.
    pub async fn persist_redirect(&mut self, project_id: i32) -> ProjectResult<Resolved> {
        let project = self.load_project(project_id).await?;
        let resolved = resolve(&mut self.store, project.platform()?, project.pool_id)
            .await?
            .resolved;
        if !resolved.is_redirected() {
            return Ok(resolved);
        }

        let changes = ProjectConfigChangeset {
            pool_platform: Some(resolved.effective_platform.as_str().to_string()),
            pool_id: Some(resolved.effective_pool_id),
            is_migrated: Some(true),
            updated_at: Some(now()),
            ..Default::default()
        };
        self.store.begin().await.map_err(ProjectError::update_failed)?;
        let result = write_project(&mut self.store, project_id, &changes).await;
        finish(&mut self.store, result, ProjectError::update_failed).await?;
        info!(
            "project {} now points at {} pool {} (was {} pool {})",
            project_id,
            resolved.effective_platform,
            resolved.effective_pool_id,
            resolved.original_platform,
            resolved.original_pool_id
        );
        Ok(resolved)
    }

    /// Partial update. A change of `is_active` drags the status of the pool that currently backs
    /// the project along and, on deactivation, closes its strategies; all of it commits or none
    /// of it does.
    pub async fn update_project(
        &mut self,
        project_id: i32,
        changes: ProjectConfigChangeset,
    ) -> ProjectResult<ProjectConfig> {
        self.store.begin().await.map_err(ProjectError::update_failed)?;
        let result = apply_project_update(&mut self.store, project_id, changes).await;
        finish(&mut self.store, result, ProjectError::update_failed).await
    }

    pub async fn set_project_active(&mut self, project_id: i32, active: bool) -> ProjectResult<ProjectConfig> {
        let changes = ProjectConfigChangeset {
            is_active: Some(active),
            ..Default::default()
        };
        self.update_project(project_id, changes).await
    }

    pub async fn set_pool_status(&mut self, platform: Platform, pool_id: i32, active: bool) -> ProjectResult<()> {
        cascade::set_pool_status(&mut self.store, platform, pool_id, active).await
    }

    pub async fn migrate_pool_holders(&mut self, pool_address: &str) -> ProjectResult<MigrationReport> {
        holder_migrator::migrate(&mut self.store, pool_address).await
    }

    pub async fn profit(&mut self, project_id: i32) -> ProjectResult<f64> {
        profit::profit(&mut self.store, project_id).await
    }

    pub async fn rank_projects(
        &mut self,
        range: ProfitRange,
        page: usize,
        page_size: usize,
    ) -> ProjectResult<RankingPage> {
        profit::rank_projects(&mut self.store, range, page, page_size).await
    }

    /// Creates a project on an existing pool and token.
    pub async fn create_project(&mut self, new_project: NewProjectConfig) -> ProjectResult<ProjectConfig> {
        let platform = Platform::from_str(&new_project.pool_platform)?;
        self.store.begin().await.map_err(ProjectError::create_failed)?;
        let result = insert_checked_project(&mut self.store, platform, new_project).await;
        let project = finish(&mut self.store, result, ProjectError::create_failed).await?;
        info!("created project {} ({}) on {} pool {}", project.id, project.name, platform, project.pool_id);
        Ok(project)
    }

    /// Provisions token, bonding curve, optional AMM successor, project, role link and
    /// strategies in one transaction, then asks for the new pool to be monitored.
    pub async fn create_migrated_project(&mut self, request: MigratedProjectRequest) -> ProjectResult<CreatedProject> {
        self.store.begin().await.map_err(ProjectError::create_failed)?;
        let result = insert_migrated_project(&mut self.store, request).await;
        let created = finish(&mut self.store, result, ProjectError::create_failed).await?;

        let bonding_curve = &created.pools[0];
        info!(
            "created project {} on meteora bonding curve {}",
            created.project.id,
            bonding_curve.pool_address()
        );
        self.notifier.submit(MonitorTask::new(
            created.project.id,
            bonding_curve.platform(),
            bonding_curve.pool_address(),
            bonding_curve.recorded_successor_address(),
        ));
        Ok(created)
    }

    pub async fn create_launchpad_project(&mut self, request: LaunchpadProjectRequest) -> ProjectResult<CreatedProject> {
        self.store.begin().await.map_err(ProjectError::create_failed)?;
        let result = insert_launchpad_project(&mut self.store, request).await;
        let created = finish(&mut self.store, result, ProjectError::create_failed).await?;
        info!(
            "created project {} on raydium launchpad pool {}",
            created.project.id,
            created.pools[0].pool_address()
        );
        Ok(created)
    }

    /// Refuses while strategies or role links still reference the project.
    pub async fn delete_project(&mut self, project_id: i32) -> ProjectResult<()> {
        self.store.begin().await.map_err(ProjectError::storage)?;
        let result = delete_unreferenced_project(&mut self.store, project_id).await;
        finish(&mut self.store, result, ProjectError::storage).await?;
        info!("deleted project {project_id}");
        Ok(())
    }

    /// Refuses while any project sits on the pool.
    pub async fn delete_pool(&mut self, platform: Platform, pool_id: i32) -> ProjectResult<()> {
        self.store.begin().await.map_err(ProjectError::storage)?;
        let result = delete_unreferenced_pool(&mut self.store, platform, pool_id).await;
        finish(&mut self.store, result, ProjectError::storage).await?;
        info!("deleted {platform} pool {pool_id}");
        Ok(())
    }

    pub async fn list_holders(&mut self, platform: Platform, pool_address: &str) -> ProjectResult<Vec<HolderRow>> {
        self.store
            .list_holders(platform.entry().holder_ledger, pool_address, None)
            .await
            .map_err(ProjectError::storage)
    }
}

async fn load_project(store: &mut dyn RecordStore, project_id: i32) -> ProjectResult<ProjectConfig> {
    store
        .find_project(project_id)
        .await
        .map_err(ProjectError::storage)?
        .ok_or(ProjectError::ProjectNotFound(project_id))
}

async fn write_project(
    store: &mut dyn RecordStore,
    project_id: i32,
    changes: &ProjectConfigChangeset,
) -> ProjectResult<()> {
    match store
        .update_project(project_id, changes)
        .await
        .map_err(ProjectError::update_failed)?
    {
        0 => Err(ProjectError::ProjectNotFound(project_id)),
        _ => Ok(()),
    }
}

async fn apply_project_update(
    store: &mut dyn RecordStore,
    project_id: i32,
    mut changes: ProjectConfigChangeset,
) -> ProjectResult<ProjectConfig> {
    let mut project = load_project(store, project_id).await?;
    let was_active = project.is_active;
    changes.updated_at = Some(now());
    changes.apply_to(&mut project);

    let platform = project.platform()?;
    if changes.pool_platform.is_some() || changes.pool_id.is_some() {
        store
            .find_pool(platform, project.pool_id)
            .await
            .map_err(ProjectError::storage)?
            .ok_or(ProjectError::PoolNotFound(platform, project.pool_id))?;
    }
    if changes.token_id.is_some() {
        store
            .find_token(project.token_id)
            .await
            .map_err(ProjectError::storage)?
            .ok_or(ProjectError::TokenNotFound(project.token_id))?;
    }
    write_project(store, project_id, &changes).await?;

    if project.is_active != was_active {
        // a migrated curve hands its status over to the AMM pool, which cascades back to it
        let resolved = resolve(store, platform, project.pool_id).await?.resolved;
        apply_pool_status(
            store,
            resolved.effective_platform,
            resolved.effective_pool_id,
            project.is_active,
        )
        .await?;
        if !project.is_active {
            close_all_strategies(store, project_id).await?;
        }
        info!(
            "project {} is now {}",
            project_id,
            if project.is_active { "active" } else { "inactive" }
        );
    }
    Ok(project)
}

async fn insert_checked_project(
    store: &mut dyn RecordStore,
    platform: Platform,
    new_project: NewProjectConfig,
) -> ProjectResult<ProjectConfig> {
    store
        .find_pool(platform, new_project.pool_id)
        .await
        .map_err(ProjectError::storage)?
        .ok_or(ProjectError::PoolNotFound(platform, new_project.pool_id))?;
    store
        .find_token(new_project.token_id)
        .await
        .map_err(ProjectError::storage)?
        .ok_or(ProjectError::TokenNotFound(new_project.token_id))?;
    store
        .insert_project(new_project)
        .await
        .map_err(ProjectError::create_failed)
}

async fn insert_project_with_role(
    store: &mut dyn RecordStore,
    new_project: NewProjectConfig,
    role_id: i32,
) -> ProjectResult<ProjectConfig> {
    let project = store
        .insert_project(new_project)
        .await
        .map_err(ProjectError::create_failed)?;
    store
        .insert_project_role(NewProjectRole {
            project_id: project.id,
            role_id,
        })
        .await
        .map_err(ProjectError::create_failed)?;
    Ok(project)
}

async fn insert_migrated_project(
    store: &mut dyn RecordStore,
    request: MigratedProjectRequest,
) -> ProjectResult<CreatedProject> {
    let token = store
        .insert_token(request.token)
        .await
        .map_err(ProjectError::create_failed)?;

    let mut bonding_curve = request.bonding_curve;
    if let Some(amm_pool) = &request.amm_pool {
        bonding_curve.is_migrated = true;
        bonding_curve.damm_v2_pool_address = amm_pool.pool_address.clone();
    }
    let bonding_curve = store
        .insert_meteora_dbc_pool(bonding_curve)
        .await
        .map_err(ProjectError::create_failed)?;

    let mut pools = vec![PoolRecord::MeteoraDbc(bonding_curve.clone())];
    if let Some(mut amm_pool) = request.amm_pool {
        amm_pool.dbc_pool_address = bonding_curve.pool_address.clone();
        let amm_pool = store
            .insert_meteora_cpmm_pool(amm_pool)
            .await
            .map_err(ProjectError::create_failed)?;
        pools.push(PoolRecord::MeteoraCpmm(amm_pool));
    }

    let mut new_project = NewProjectConfig::new(&request.name, Platform::MeteoraDbc, bonding_curve.id, token.id);
    new_project.vesting = request.vesting;
    let project = insert_project_with_role(store, new_project, request.role_id).await?;

    let mut strategies = Vec::with_capacity(request.strategies.len());
    for draft in request.strategies {
        let strategy = store
            .insert_strategy(NewStrategyConfig {
                project_id: project.id,
                role_id: request.role_id,
                name: draft.name,
                strategy_type: draft.strategy_type,
                enabled: draft.enabled,
                params: draft.params,
            })
            .await
            .map_err(ProjectError::create_failed)?;
        strategies.push(strategy);
    }

    Ok(CreatedProject {
        project,
        token,
        pools,
        relation: None,
        strategies,
    })
}

async fn insert_launchpad_project(
    store: &mut dyn RecordStore,
    request: LaunchpadProjectRequest,
) -> ProjectResult<CreatedProject> {
    let token = store
        .insert_token(request.token)
        .await
        .map_err(ProjectError::create_failed)?;
    let launchpad_pool = store
        .insert_raydium_launchpad_pool(request.launchpad_pool)
        .await
        .map_err(ProjectError::create_failed)?;
    let cpmm_pool = store
        .insert_raydium_cpmm_pool(request.cpmm_pool)
        .await
        .map_err(ProjectError::create_failed)?;
    let relation = store
        .insert_relation(NewRaydiumPoolRelation {
            launchpad_pool_address: launchpad_pool.pool_address.clone(),
            cpmm_pool_address: cpmm_pool.pool_address.clone(),
            launchpad_base_vault: launchpad_pool.base_vault.clone(),
            launchpad_quote_vault: launchpad_pool.quote_vault.clone(),
            cpmm_base_vault: cpmm_pool.base_vault.clone(),
            cpmm_quote_vault: cpmm_pool.quote_vault.clone(),
        })
        .await
        .map_err(ProjectError::create_failed)?;

    let mut new_project =
        NewProjectConfig::new(&request.name, Platform::RaydiumLaunchpad, launchpad_pool.id, token.id);
    new_project.vesting = request.vesting;
    let project = insert_project_with_role(store, new_project, request.role_id).await?;

    Ok(CreatedProject {
        project,
        token,
        pools: vec![
            PoolRecord::RaydiumLaunchpad(launchpad_pool),
            PoolRecord::RaydiumCpmm(cpmm_pool),
        ],
        relation: Some(relation),
        strategies: Vec::new(),
    })
}

async fn delete_unreferenced_project(store: &mut dyn RecordStore, project_id: i32) -> ProjectResult<()> {
    load_project(store, project_id).await?;

    let strategies = store
        .count_strategies(project_id)
        .await
        .map_err(ProjectError::storage)?;
    if strategies > 0 {
        return Err(ProjectError::DependencyExists {
            entity: "project",
            id: project_id,
            dependents: "strategies",
            count: strategies,
        });
    }
    let roles = store
        .count_project_roles(project_id)
        .await
        .map_err(ProjectError::storage)?;
    if roles > 0 {
        return Err(ProjectError::DependencyExists {
            entity: "project",
            id: project_id,
            dependents: "role links",
            count: roles,
        });
    }

    store
        .delete_project(project_id)
        .await
        .map_err(ProjectError::storage)?;
    Ok(())
}

async fn delete_unreferenced_pool(store: &mut dyn RecordStore, platform: Platform, pool_id: i32) -> ProjectResult<()> {
    store
        .find_pool(platform, pool_id)
        .await
        .map_err(ProjectError::storage)?
        .ok_or(ProjectError::PoolNotFound(platform, pool_id))?;

    let projects = store
        .count_pool_dependents(platform, pool_id)
        .await
        .map_err(ProjectError::storage)?;
    if projects > 0 {
        return Err(ProjectError::DependencyExists {
            entity: "pool",
            id: pool_id,
            dependents: "projects",
            count: projects,
        });
    }

    store
        .delete_pool(platform, pool_id)
        .await
        .map_err(ProjectError::storage)?;
    Ok(())
}
