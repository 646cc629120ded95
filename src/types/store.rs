use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

use crate::types::errors::{ProjectError, ProjectResult};
use crate::types::holder::{HolderLedger, HolderRow, HolderType, NewHolderRow};
use crate::types::platform::Platform;
use crate::types::pool::{
    MeteoraCpmmPool, MeteoraDbcPool, NewMeteoraCpmmPool, NewMeteoraDbcPool, NewRaydiumCpmmPool,
    NewRaydiumLaunchpadPool, PoolRecord, PoolStatus, RaydiumCpmmPool, RaydiumLaunchpadPool,
};
use crate::types::project::{
    NewProjectConfig, NewProjectRole, NewTokenConfig, ProjectConfig, ProjectConfigChangeset,
    ProjectRole, TokenConfig,
};
use crate::types::relation::{NewRaydiumPoolRelation, RaydiumPoolRelation};
use crate::types::strategy::{NewStrategyConfig, StrategyConfig};

/// Transactional access to the project, pool, strategy and holder tables.
///
/// Lookups return `Ok(None)` on a miss; `Err` is reserved for the backend failing.
/// `begin`/`commit`/`rollback` nest: an inner pair only commits or discards
/// the work done since its own `begin`.
#[async_trait]
pub trait RecordStore: Send {
    async fn begin(&mut self) -> Result<()>;
    async fn commit(&mut self) -> Result<()>;
    async fn rollback(&mut self) -> Result<()>;

    // pool variant tables, dispatched by platform
    async fn find_pool(&mut self, platform: Platform, pool_id: i32) -> Result<Option<PoolRecord>>;
    async fn find_pool_by_address(
        &mut self,
        platform: Platform,
        pool_address: &str,
    ) -> Result<Option<PoolRecord>>;
    async fn update_pool_status(
        &mut self,
        platform: Platform,
        pool_id: i32,
        status: PoolStatus,
    ) -> Result<usize>;
    async fn count_pool_dependents(&mut self, platform: Platform, pool_id: i32) -> Result<i64>;
    async fn delete_pool(&mut self, platform: Platform, pool_id: i32) -> Result<usize>;

    async fn insert_meteora_dbc_pool(&mut self, pool: NewMeteoraDbcPool) -> Result<MeteoraDbcPool>;
    async fn insert_meteora_cpmm_pool(&mut self, pool: NewMeteoraCpmmPool) -> Result<MeteoraCpmmPool>;
    async fn insert_raydium_launchpad_pool(
        &mut self,
        pool: NewRaydiumLaunchpadPool,
    ) -> Result<RaydiumLaunchpadPool>;
    async fn insert_raydium_cpmm_pool(&mut self, pool: NewRaydiumCpmmPool) -> Result<RaydiumCpmmPool>;

    async fn find_relation_by_launchpad(
        &mut self,
        launchpad_pool_address: &str,
    ) -> Result<Option<RaydiumPoolRelation>>;
    async fn insert_relation(&mut self, relation: NewRaydiumPoolRelation) -> Result<RaydiumPoolRelation>;

    async fn find_project(&mut self, project_id: i32) -> Result<Option<ProjectConfig>>;
    async fn list_projects(&mut self) -> Result<Vec<ProjectConfig>>;
    async fn insert_project(&mut self, project: NewProjectConfig) -> Result<ProjectConfig>;
    async fn update_project(
        &mut self,
        project_id: i32,
        changes: &ProjectConfigChangeset,
    ) -> Result<usize>;
    async fn delete_project(&mut self, project_id: i32) -> Result<usize>;

    async fn find_token(&mut self, token_id: i32) -> Result<Option<TokenConfig>>;
    async fn insert_token(&mut self, token: NewTokenConfig) -> Result<TokenConfig>;

    async fn insert_project_role(&mut self, role: NewProjectRole) -> Result<ProjectRole>;
    async fn count_project_roles(&mut self, project_id: i32) -> Result<i64>;

    async fn insert_strategy(&mut self, strategy: NewStrategyConfig) -> Result<StrategyConfig>;
    async fn count_strategies(&mut self, project_id: i32) -> Result<i64>;
    /// Switches off every still-enabled strategy of the project, returns rows affected.
    async fn disable_strategies(&mut self, project_id: i32) -> Result<usize>;

    async fn list_holders(
        &mut self,
        ledger: HolderLedger,
        pool_address: &str,
        excluded_type: Option<HolderType>,
    ) -> Result<Vec<HolderRow>>;
    async fn find_holder(
        &mut self,
        ledger: HolderLedger,
        address: &str,
        pool_address: &str,
        base_mint: &str,
        quote_mint: &str,
    ) -> Result<Option<HolderRow>>;
    async fn insert_holder(&mut self, ledger: HolderLedger, holder: NewHolderRow) -> Result<HolderRow>;
}

/// Outbound message queue.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, topic: &str, message: &str) -> Result<()>;
}

/// Ends a transaction opened with [`RecordStore::begin`]: commits on `Ok`, rolls back on `Err`.
/// A failed rollback is only logged; the caller still sees the error that caused it.
pub async fn finish<T>(
    store: &mut dyn RecordStore,
    result: ProjectResult<T>,
    on_commit_error: fn(anyhow::Error) -> ProjectError,
) -> ProjectResult<T> {
    match result {
        Ok(value) => {
            store.commit().await.map_err(on_commit_error)?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_error) = store.rollback().await {
                warn!("rollback after '{e}' failed: {rollback_error:#}");
            }
            Err(e)
        }
    }
}
