use crate::types::holder::{HolderLedger, HolderRow, HolderType, NewHolderRow};
use crate::types::platform::Platform;
use crate::types::pool::*;
use crate::types::project::{
    NewProjectConfig, NewProjectRole, NewTokenConfig, ProjectConfig, ProjectConfigChangeset,
    ProjectRole, TokenConfig,
};
use crate::types::relation::{NewRaydiumPoolRelation, RaydiumPoolRelation};
use crate::types::store::RecordStore;
use crate::types::strategy::{NewStrategyConfig, StrategyConfig};
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};

fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

fn next_id<T>(rows: &BTreeMap<i32, T>) -> i32 {
    rows.keys().next_back().map_or(1, |id| id + 1)
}

#[derive(Debug, Clone, Default)]
struct Tables {
    pools: HashMap<Platform, BTreeMap<i32, PoolRecord>>,
    relations: BTreeMap<i32, RaydiumPoolRelation>,
    projects: BTreeMap<i32, ProjectConfig>,
    tokens: BTreeMap<i32, TokenConfig>,
    roles: BTreeMap<i32, ProjectRole>,
    strategies: BTreeMap<i32, StrategyConfig>,
    holders: HashMap<HolderLedger, BTreeMap<i32, HolderRow>>,
}

/// Writes that should fail, to exercise rollback and per-row error paths.
#[derive(Debug, Clone, Default)]
pub struct Failures {
    pub pool_status_updates: HashSet<(Platform, i32)>,
    pub holder_inserts_for_address: HashSet<String>,
    pub project_updates: bool,
    pub project_inserts: bool,
    pub strategy_updates: bool,
}

/// In-memory [`RecordStore`] for tests. Transactions snapshot the tables on `begin`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Tables,
    snapshots: Vec<Tables>,
    pub failures: Failures,
    pub commits: usize,
    pub rollbacks: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_transaction(&self) -> bool {
        !self.snapshots.is_empty()
    }

    pub fn put_pool(&mut self, pool: PoolRecord) {
        self.tables
            .pools
            .entry(pool.platform())
            .or_default()
            .insert(pool.id(), pool);
    }

    pub fn pool(&self, platform: Platform, pool_id: i32) -> Option<&PoolRecord> {
        self.tables.pools.get(&platform).and_then(|rows| rows.get(&pool_id))
    }

    pub fn pool_count(&self, platform: Platform) -> usize {
        self.tables.pools.get(&platform).map_or(0, |rows| rows.len())
    }

    pub fn put_project(&mut self, project: ProjectConfig) {
        self.tables.projects.insert(project.id, project);
    }

    pub fn project(&self, project_id: i32) -> Option<&ProjectConfig> {
        self.tables.projects.get(&project_id)
    }

    pub fn project_count(&self) -> usize {
        self.tables.projects.len()
    }

    pub fn put_token(&mut self, token: TokenConfig) {
        self.tables.tokens.insert(token.id, token);
    }

    pub fn token_count(&self) -> usize {
        self.tables.tokens.len()
    }

    pub fn put_relation(&mut self, relation: RaydiumPoolRelation) {
        self.tables.relations.insert(relation.id, relation);
    }

    pub fn relation_count(&self) -> usize {
        self.tables.relations.len()
    }

    pub fn put_role(&mut self, role: ProjectRole) {
        self.tables.roles.insert(role.id, role);
    }

    pub fn put_strategy(&mut self, strategy: StrategyConfig) {
        self.tables.strategies.insert(strategy.id, strategy);
    }

    pub fn strategies(&self) -> Vec<&StrategyConfig> {
        self.tables.strategies.values().collect()
    }

    pub fn put_holder(&mut self, ledger: HolderLedger, holder: HolderRow) {
        self.tables
            .holders
            .entry(ledger)
            .or_default()
            .insert(holder.id, holder);
    }

    pub fn holders(&self, ledger: HolderLedger) -> Vec<&HolderRow> {
        self.tables
            .holders
            .get(&ledger)
            .map(|rows| rows.values().collect())
            .unwrap_or_default()
    }

    fn insert_pool(&mut self, platform: Platform, build: impl FnOnce(i32) -> PoolRecord) -> Result<PoolRecord> {
        let rows = self.tables.pools.entry(platform).or_default();
        let pool = build(next_id(rows));
        if rows.values().any(|row| row.pool_address() == pool.pool_address()) {
            bail!("duplicate key value violates unique constraint on {}.pool_address", platform.table());
        }
        rows.insert(pool.id(), pool.clone());
        Ok(pool)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn begin(&mut self) -> Result<()> {
        self.snapshots.push(self.tables.clone());
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        self.snapshots
            .pop()
            .ok_or_else(|| anyhow!("commit without an open transaction"))?;
        self.commits += 1;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        self.tables = self
            .snapshots
            .pop()
            .ok_or_else(|| anyhow!("rollback without an open transaction"))?;
        self.rollbacks += 1;
        Ok(())
    }

    async fn find_pool(&mut self, platform: Platform, pool_id: i32) -> Result<Option<PoolRecord>> {
        Ok(self.pool(platform, pool_id).cloned())
    }

    async fn find_pool_by_address(
        &mut self,
        platform: Platform,
        pool_address: &str,
    ) -> Result<Option<PoolRecord>> {
        Ok(self.tables.pools.get(&platform).and_then(|rows| {
            rows.values()
                .find(|pool| pool.pool_address() == pool_address)
                .cloned()
        }))
    }

    async fn update_pool_status(
        &mut self,
        platform: Platform,
        pool_id: i32,
        status: PoolStatus,
    ) -> Result<usize> {
        if self.failures.pool_status_updates.contains(&(platform, pool_id)) {
            bail!("injected failure updating {} {}", platform.table(), pool_id);
        }
        match self
            .tables
            .pools
            .get_mut(&platform)
            .and_then(|rows| rows.get_mut(&pool_id))
        {
            Some(pool) => {
                pool.set_status(status, now());
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn count_pool_dependents(&mut self, platform: Platform, pool_id: i32) -> Result<i64> {
        Ok(self
            .tables
            .projects
            .values()
            .filter(|project| project.pool_platform == platform.as_str() && project.pool_id == pool_id)
            .count() as i64)
    }

    async fn delete_pool(&mut self, platform: Platform, pool_id: i32) -> Result<usize> {
        Ok(self
            .tables
            .pools
            .get_mut(&platform)
            .and_then(|rows| rows.remove(&pool_id))
            .map_or(0, |_| 1))
    }

    async fn insert_meteora_dbc_pool(&mut self, pool: NewMeteoraDbcPool) -> Result<MeteoraDbcPool> {
        let record = self.insert_pool(Platform::MeteoraDbc, |id| {
            PoolRecord::MeteoraDbc(MeteoraDbcPool {
                id,
                pool_address: pool.pool_address,
                base_mint: pool.base_mint,
                quote_mint: pool.quote_mint,
                config: pool.config,
                base_vault: pool.base_vault,
                quote_vault: pool.quote_vault,
                creator: pool.creator,
                is_migrated: pool.is_migrated,
                damm_v2_pool_address: pool.damm_v2_pool_address,
                status: pool.status,
                created_at: now(),
                updated_at: now(),
            })
        })?;
        match record {
            PoolRecord::MeteoraDbc(pool) => Ok(pool),
            other => Err(anyhow!("unexpected record {other:?}")),
        }
    }

    async fn insert_meteora_cpmm_pool(&mut self, pool: NewMeteoraCpmmPool) -> Result<MeteoraCpmmPool> {
        let record = self.insert_pool(Platform::MeteoraCpmm, |id| {
            PoolRecord::MeteoraCpmm(MeteoraCpmmPool {
                id,
                pool_address: pool.pool_address,
                base_mint: pool.base_mint,
                quote_mint: pool.quote_mint,
                config: pool.config,
                token_a_vault: pool.token_a_vault,
                token_b_vault: pool.token_b_vault,
                dbc_pool_address: pool.dbc_pool_address,
                status: pool.status,
                created_at: now(),
                updated_at: now(),
            })
        })?;
        match record {
            PoolRecord::MeteoraCpmm(pool) => Ok(pool),
            other => Err(anyhow!("unexpected record {other:?}")),
        }
    }

    async fn insert_raydium_launchpad_pool(
        &mut self,
        pool: NewRaydiumLaunchpadPool,
    ) -> Result<RaydiumLaunchpadPool> {
        let record = self.insert_pool(Platform::RaydiumLaunchpad, |id| {
            PoolRecord::RaydiumLaunchpad(RaydiumLaunchpadPool {
                id,
                pool_address: pool.pool_address,
                base_mint: pool.base_mint,
                quote_mint: pool.quote_mint,
                base_vault: pool.base_vault,
                quote_vault: pool.quote_vault,
                global_config: pool.global_config,
                platform_config: pool.platform_config,
                status: pool.status,
                created_at: now(),
                updated_at: now(),
            })
        })?;
        match record {
            PoolRecord::RaydiumLaunchpad(pool) => Ok(pool),
            other => Err(anyhow!("unexpected record {other:?}")),
        }
    }

    async fn insert_raydium_cpmm_pool(&mut self, pool: NewRaydiumCpmmPool) -> Result<RaydiumCpmmPool> {
        let record = self.insert_pool(Platform::RaydiumCpmm, |id| {
            PoolRecord::RaydiumCpmm(RaydiumCpmmPool {
                id,
                pool_address: pool.pool_address,
                base_mint: pool.base_mint,
                quote_mint: pool.quote_mint,
                amm_config: pool.amm_config,
                base_vault: pool.base_vault,
                quote_vault: pool.quote_vault,
                lp_mint: pool.lp_mint,
                observation_state: pool.observation_state,
                status: pool.status,
                created_at: now(),
                updated_at: now(),
            })
        })?;
        match record {
            PoolRecord::RaydiumCpmm(pool) => Ok(pool),
            other => Err(anyhow!("unexpected record {other:?}")),
        }
    }

    async fn find_relation_by_launchpad(
        &mut self,
        launchpad_pool_address: &str,
    ) -> Result<Option<RaydiumPoolRelation>> {
        Ok(self
            .tables
            .relations
            .values()
            .find(|relation| relation.launchpad_pool_address == launchpad_pool_address)
            .cloned())
    }

    async fn insert_relation(&mut self, relation: NewRaydiumPoolRelation) -> Result<RaydiumPoolRelation> {
        if self.find_relation_by_launchpad(&relation.launchpad_pool_address).await?.is_some() {
            bail!("duplicate key value violates unique constraint on raydium_pool_relations");
        }
        let row = RaydiumPoolRelation {
            id: next_id(&self.tables.relations),
            launchpad_pool_address: relation.launchpad_pool_address,
            cpmm_pool_address: relation.cpmm_pool_address,
            launchpad_base_vault: relation.launchpad_base_vault,
            launchpad_quote_vault: relation.launchpad_quote_vault,
            cpmm_base_vault: relation.cpmm_base_vault,
            cpmm_quote_vault: relation.cpmm_quote_vault,
            is_completed: false,
            completed_signature: None,
            created_at: now(),
            updated_at: now(),
        };
        self.tables.relations.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_project(&mut self, project_id: i32) -> Result<Option<ProjectConfig>> {
        Ok(self.tables.projects.get(&project_id).cloned())
    }

    async fn list_projects(&mut self) -> Result<Vec<ProjectConfig>> {
        Ok(self.tables.projects.values().cloned().collect())
    }

    async fn insert_project(&mut self, project: NewProjectConfig) -> Result<ProjectConfig> {
        if self.failures.project_inserts {
            bail!("injected failure inserting project {}", project.name);
        }
        let row = ProjectConfig {
            id: next_id(&self.tables.projects),
            name: project.name,
            pool_platform: project.pool_platform,
            pool_id: project.pool_id,
            token_id: project.token_id,
            is_active: project.is_active,
            is_migrated: project.is_migrated,
            is_locked: project.is_locked,
            update_stat_enabled: project.update_stat_enabled,
            snapshot_enabled: project.snapshot_enabled,
            assets_balance: project.assets_balance,
            retail_sol_amount: project.retail_sol_amount,
            event: project.event,
            vesting: project.vesting,
            created_at: now(),
            updated_at: now(),
        };
        self.tables.projects.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_project(
        &mut self,
        project_id: i32,
        changes: &ProjectConfigChangeset,
    ) -> Result<usize> {
        if self.failures.project_updates {
            bail!("injected failure updating project {project_id}");
        }
        match self.tables.projects.get_mut(&project_id) {
            Some(project) => {
                changes.apply_to(project);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_project(&mut self, project_id: i32) -> Result<usize> {
        Ok(self.tables.projects.remove(&project_id).map_or(0, |_| 1))
    }

    async fn find_token(&mut self, token_id: i32) -> Result<Option<TokenConfig>> {
        Ok(self.tables.tokens.get(&token_id).cloned())
    }

    async fn insert_token(&mut self, token: NewTokenConfig) -> Result<TokenConfig> {
        let row = TokenConfig {
            id: next_id(&self.tables.tokens),
            mint: token.mint,
            name: token.name,
            symbol: token.symbol,
            decimals: token.decimals,
            total_supply: token.total_supply,
            created_at: now(),
        };
        self.tables.tokens.insert(row.id, row.clone());
        Ok(row)
    }

    async fn insert_project_role(&mut self, role: NewProjectRole) -> Result<ProjectRole> {
        let row = ProjectRole {
            id: next_id(&self.tables.roles),
            project_id: role.project_id,
            role_id: role.role_id,
            created_at: now(),
        };
        self.tables.roles.insert(row.id, row.clone());
        Ok(row)
    }

    async fn count_project_roles(&mut self, project_id: i32) -> Result<i64> {
        Ok(self
            .tables
            .roles
            .values()
            .filter(|role| role.project_id == project_id)
            .count() as i64)
    }

    async fn insert_strategy(&mut self, strategy: NewStrategyConfig) -> Result<StrategyConfig> {
        let row = StrategyConfig {
            id: next_id(&self.tables.strategies),
            project_id: strategy.project_id,
            role_id: strategy.role_id,
            name: strategy.name,
            strategy_type: strategy.strategy_type,
            enabled: strategy.enabled,
            params: strategy.params,
            created_at: now(),
            updated_at: now(),
        };
        self.tables.strategies.insert(row.id, row.clone());
        Ok(row)
    }

    async fn count_strategies(&mut self, project_id: i32) -> Result<i64> {
        Ok(self
            .tables
            .strategies
            .values()
            .filter(|strategy| strategy.project_id == project_id)
            .count() as i64)
    }

    async fn disable_strategies(&mut self, project_id: i32) -> Result<usize> {
        if self.failures.strategy_updates {
            bail!("injected failure disabling strategies of project {project_id}");
        }
        let mut affected = 0;
        for strategy in self.tables.strategies.values_mut() {
            if strategy.project_id == project_id && strategy.enabled {
                strategy.enabled = false;
                strategy.updated_at = now();
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn list_holders(
        &mut self,
        ledger: HolderLedger,
        pool_address: &str,
        excluded_type: Option<HolderType>,
    ) -> Result<Vec<HolderRow>> {
        Ok(self
            .holders(ledger)
            .into_iter()
            .filter(|row| row.pool_address == pool_address)
            .filter(|row| excluded_type.map_or(true, |excluded| row.holder_type != excluded.as_str()))
            .cloned()
            .collect())
    }

    async fn find_holder(
        &mut self,
        ledger: HolderLedger,
        address: &str,
        pool_address: &str,
        base_mint: &str,
        quote_mint: &str,
    ) -> Result<Option<HolderRow>> {
        Ok(self
            .holders(ledger)
            .into_iter()
            .find(|row| {
                row.address == address
                    && row.pool_address == pool_address
                    && row.base_mint == base_mint
                    && row.quote_mint == quote_mint
            })
            .cloned())
    }

    async fn insert_holder(&mut self, ledger: HolderLedger, holder: NewHolderRow) -> Result<HolderRow> {
        if self.failures.holder_inserts_for_address.contains(&holder.address) {
            bail!("injected failure inserting holder {} into {}", holder.address, ledger);
        }
        let rows = self.tables.holders.entry(ledger).or_default();
        let row = HolderRow {
            id: next_id(rows),
            address: holder.address,
            pool_address: holder.pool_address,
            base_mint: holder.base_mint,
            quote_mint: holder.quote_mint,
            holder_type: holder.holder_type,
            base_change: holder.base_change,
            quote_change: holder.quote_change,
            sol_change: holder.sol_change,
            base_volume: holder.base_volume,
            quote_volume: holder.quote_volume,
            tx_count: holder.tx_count,
            first_slot: holder.first_slot,
            last_slot: holder.last_slot,
            first_timestamp: holder.first_timestamp,
            last_timestamp: holder.last_timestamp,
            first_signature: holder.first_signature,
            last_signature: holder.last_signature,
            created_at: now(),
            updated_at: now(),
        };
        rows.insert(row.id, row.clone());
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::pool::fixtures::{cpmm_pool, dbc_pool};

    #[tokio::test]
    async fn test_rollback_restores_snapshot() {
        let mut store = MemoryStore::new();
        store.put_pool(PoolRecord::MeteoraDbc(dbc_pool(7, "DBC1", None)));

        store.begin().await.unwrap();
        store
            .update_pool_status(Platform::MeteoraDbc, 7, PoolStatus::Inactive)
            .await
            .unwrap();
        assert!(!store.pool(Platform::MeteoraDbc, 7).unwrap().is_active());
        store.rollback().await.unwrap();

        assert!(store.pool(Platform::MeteoraDbc, 7).unwrap().is_active());
        assert!(!store.in_transaction());
    }

    #[tokio::test]
    async fn test_nested_commit_keeps_outer_rollback() {
        let mut store = MemoryStore::new();
        store.put_pool(PoolRecord::MeteoraCpmm(cpmm_pool(42, "AMM1", "DBC1")));

        store.begin().await.unwrap();
        store.begin().await.unwrap();
        store
            .update_pool_status(Platform::MeteoraCpmm, 42, PoolStatus::Inactive)
            .await
            .unwrap();
        store.commit().await.unwrap();
        store.rollback().await.unwrap();

        assert!(store.pool(Platform::MeteoraCpmm, 42).unwrap().is_active());
    }

    #[tokio::test]
    async fn test_duplicate_pool_address_is_rejected() {
        let mut store = MemoryStore::new();
        store.put_pool(PoolRecord::MeteoraCpmm(cpmm_pool(42, "AMM1", "DBC1")));
        let result = store
            .insert_meteora_cpmm_pool(NewMeteoraCpmmPool {
                pool_address: "AMM1".to_string(),
                base_mint: "M".to_string(),
                quote_mint: "N".to_string(),
                config: "c".to_string(),
                token_a_vault: "a".to_string(),
                token_b_vault: "b".to_string(),
                dbc_pool_address: String::new(),
                status: "active".to_string(),
            })
            .await;
        assert!(result.is_err());
        assert_eq!(store.pool_count(Platform::MeteoraCpmm), 1);
    }
}
