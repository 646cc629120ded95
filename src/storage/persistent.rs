use crate::schema::meteora_cpmm_pools::dsl::meteora_cpmm_pools;
use crate::schema::meteora_dbc_pools::dsl::meteora_dbc_pools;
use crate::schema::project_configs::dsl::project_configs;
use crate::schema::project_roles::dsl::project_roles;
use crate::schema::raydium_cpmm_pools::dsl::raydium_cpmm_pools;
use crate::schema::raydium_launchpad_pools::dsl::raydium_launchpad_pools;
use crate::schema::raydium_pool_relations::dsl::raydium_pool_relations;
use crate::schema::strategy_configs::dsl::strategy_configs;
use crate::schema::token_configs::dsl::token_configs;
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
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::QueryResult;
use diesel_async::pooled_connection::deadpool::{Object, Pool};
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::{AnsiTransactionManager, AsyncPgConnection, RunQueryDsl, TransactionManager};
use futures::future::BoxFuture;
use futures::FutureExt;
use maplit::hashmap;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

pub type DbPool = Arc<Pool<AsyncPgConnection>>;

pub fn connect(database_url: &str) -> Result<DbPool> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    let pool = Pool::builder(manager)
        .build()
        .map_err(|e| anyhow!("Failed to create pool: {e}"))?;
    Ok(Arc::new(pool))
}

fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

type QueryFuture<'a, T> = BoxFuture<'a, QueryResult<T>>;

/// Per-platform access to one pool variant table. Built once per platform by
/// `pool_table_ops!` so the seven-way dispatch lives in [`POOL_TABLES`] only.
#[derive(Clone, Copy)]
struct PoolTableOps {
    load: for<'a> fn(&'a mut AsyncPgConnection, i32) -> QueryFuture<'a, Option<PoolRecord>>,
    load_by_address:
        for<'a> fn(&'a mut AsyncPgConnection, String) -> QueryFuture<'a, Option<PoolRecord>>,
    update_status: for<'a> fn(&'a mut AsyncPgConnection, i32, PoolStatus) -> QueryFuture<'a, usize>,
    count_dependents: for<'a> fn(&'a mut AsyncPgConnection, i32) -> QueryFuture<'a, i64>,
    delete: for<'a> fn(&'a mut AsyncPgConnection, i32) -> QueryFuture<'a, usize>,
}

macro_rules! pool_table_ops {
    ($ops:ident, $table:ident, $model:ident, $variant:ident) => {
        mod $ops {
            use super::*;
            use crate::schema::$table::dsl;

            fn load(conn: &mut AsyncPgConnection, pool_id: i32) -> QueryFuture<'_, Option<PoolRecord>> {
                async move {
                    dsl::$table
                        .find(pool_id)
                        .select($model::as_select())
                        .first::<$model>(conn)
                        .await
                        .optional()
                        .map(|pool| pool.map(PoolRecord::$variant))
                }
                .boxed()
            }

            fn load_by_address(
                conn: &mut AsyncPgConnection,
                address: String,
            ) -> QueryFuture<'_, Option<PoolRecord>> {
                async move {
                    dsl::$table
                        .filter(dsl::pool_address.eq(address))
                        .select($model::as_select())
                        .first::<$model>(conn)
                        .await
                        .optional()
                        .map(|pool| pool.map(PoolRecord::$variant))
                }
                .boxed()
            }

            fn update_status(
                conn: &mut AsyncPgConnection,
                pool_id: i32,
                status: PoolStatus,
            ) -> QueryFuture<'_, usize> {
                async move {
                    diesel::update(dsl::$table.find(pool_id))
                        .set((dsl::status.eq(status.as_str()), dsl::updated_at.eq(now())))
                        .execute(conn)
                        .await
                }
                .boxed()
            }

            // projects pointing at this pool
            fn count_dependents(conn: &mut AsyncPgConnection, pool_id: i32) -> QueryFuture<'_, i64> {
                use crate::schema::project_configs::dsl as projects;
                async move {
                    projects::project_configs
                        .filter(projects::pool_platform.eq(Platform::$variant.as_str()))
                        .filter(projects::pool_id.eq(pool_id))
                        .count()
                        .get_result::<i64>(conn)
                        .await
                }
                .boxed()
            }

            fn delete(conn: &mut AsyncPgConnection, pool_id: i32) -> QueryFuture<'_, usize> {
                async move { diesel::delete(dsl::$table.find(pool_id)).execute(conn).await }.boxed()
            }

            pub(super) const OPS: PoolTableOps = PoolTableOps {
                load,
                load_by_address,
                update_status,
                count_dependents,
                delete,
            };
        }
    };
}

pool_table_ops!(raydium_ops, raydium_pools, RaydiumPool, Raydium);
pool_table_ops!(raydium_launchpad_ops, raydium_launchpad_pools, RaydiumLaunchpadPool, RaydiumLaunchpad);
pool_table_ops!(raydium_cpmm_ops, raydium_cpmm_pools, RaydiumCpmmPool, RaydiumCpmm);
pool_table_ops!(pumpfun_internal_ops, pumpfun_internal_pools, PumpfunInternalPool, PumpfunInternal);
pool_table_ops!(pumpfun_amm_ops, pumpfun_amm_pools, PumpfunAmmPool, PumpfunAmm);
pool_table_ops!(meteora_dbc_ops, meteora_dbc_pools, MeteoraDbcPool, MeteoraDbc);
pool_table_ops!(meteora_cpmm_ops, meteora_cpmm_pools, MeteoraCpmmPool, MeteoraCpmm);

static POOL_TABLES: Lazy<HashMap<Platform, PoolTableOps>> = Lazy::new(|| {
    hashmap! {
        Platform::Raydium => raydium_ops::OPS,
        Platform::RaydiumLaunchpad => raydium_launchpad_ops::OPS,
        Platform::RaydiumCpmm => raydium_cpmm_ops::OPS,
        Platform::PumpfunInternal => pumpfun_internal_ops::OPS,
        Platform::PumpfunAmm => pumpfun_amm_ops::OPS,
        Platform::MeteoraDbc => meteora_dbc_ops::OPS,
        Platform::MeteoraCpmm => meteora_cpmm_ops::OPS,
    }
});

fn pool_table(platform: Platform) -> Result<&'static PoolTableOps> {
    POOL_TABLES
        .get(&platform)
        .ok_or_else(|| anyhow!("no table registered for platform {platform}"))
}

#[derive(Debug, Clone)]
struct HolderKey {
    address: String,
    pool_address: String,
    base_mint: String,
    quote_mint: String,
}

#[derive(Clone, Copy)]
struct HolderTableOps {
    list: for<'a> fn(
        &'a mut AsyncPgConnection,
        String,
        Option<HolderType>,
    ) -> QueryFuture<'a, Vec<HolderRow>>,
    find: for<'a> fn(&'a mut AsyncPgConnection, HolderKey) -> QueryFuture<'a, Option<HolderRow>>,
    insert: for<'a> fn(&'a mut AsyncPgConnection, NewHolderRow) -> QueryFuture<'a, HolderRow>,
}

macro_rules! holder_table_ops {
    ($ops:ident, $table:ident) => {
        mod $ops {
            use super::*;
            use crate::schema::$table::dsl;

            fn list(
                conn: &mut AsyncPgConnection,
                pool_address: String,
                excluded_type: Option<HolderType>,
            ) -> QueryFuture<'_, Vec<HolderRow>> {
                async move {
                    let rows = dsl::$table.filter(dsl::pool_address.eq(pool_address));
                    match excluded_type {
                        Some(excluded) => {
                            rows.filter(dsl::holder_type.ne(excluded.as_str()))
                                .order(dsl::id.asc())
                                .load::<HolderRow>(conn)
                                .await
                        }
                        None => rows.order(dsl::id.asc()).load::<HolderRow>(conn).await,
                    }
                }
                .boxed()
            }

            fn find(conn: &mut AsyncPgConnection, key: HolderKey) -> QueryFuture<'_, Option<HolderRow>> {
                async move {
                    dsl::$table
                        .filter(dsl::address.eq(key.address))
                        .filter(dsl::pool_address.eq(key.pool_address))
                        .filter(dsl::base_mint.eq(key.base_mint))
                        .filter(dsl::quote_mint.eq(key.quote_mint))
                        .first::<HolderRow>(conn)
                        .await
                        .optional()
                }
                .boxed()
            }

            fn insert(conn: &mut AsyncPgConnection, holder: NewHolderRow) -> QueryFuture<'_, HolderRow> {
                async move {
                    diesel::insert_into(dsl::$table)
                        .values((
                            dsl::address.eq(holder.address),
                            dsl::pool_address.eq(holder.pool_address),
                            dsl::base_mint.eq(holder.base_mint),
                            dsl::quote_mint.eq(holder.quote_mint),
                            dsl::holder_type.eq(holder.holder_type),
                            dsl::base_change.eq(holder.base_change),
                            dsl::quote_change.eq(holder.quote_change),
                            dsl::sol_change.eq(holder.sol_change),
                            dsl::base_volume.eq(holder.base_volume),
                            dsl::quote_volume.eq(holder.quote_volume),
                            dsl::tx_count.eq(holder.tx_count),
                            dsl::first_slot.eq(holder.first_slot),
                            dsl::last_slot.eq(holder.last_slot),
                            dsl::first_timestamp.eq(holder.first_timestamp),
                            dsl::last_timestamp.eq(holder.last_timestamp),
                            dsl::first_signature.eq(holder.first_signature),
                            dsl::last_signature.eq(holder.last_signature),
                        ))
                        .get_result::<HolderRow>(conn)
                        .await
                }
                .boxed()
            }

            pub(super) const OPS: HolderTableOps = HolderTableOps { list, find, insert };
        }
    };
}

holder_table_ops!(pumpfuninternal_holder_ops, pumpfuninternal_holders);
holder_table_ops!(pumpfun_ammpool_holder_ops, pumpfun_ammpool_holders);
holder_table_ops!(raydium_pool_holder_ops, raydium_pool_holders);
holder_table_ops!(meteoradbc_holder_ops, meteoradbc_holders);
holder_table_ops!(meteoracpmm_holder_ops, meteoracpmm_holders);

static HOLDER_TABLES: Lazy<HashMap<HolderLedger, HolderTableOps>> = Lazy::new(|| {
    hashmap! {
        HolderLedger::PumpfunInternal => pumpfuninternal_holder_ops::OPS,
        HolderLedger::PumpfunAmmPool => pumpfun_ammpool_holder_ops::OPS,
        HolderLedger::RaydiumPool => raydium_pool_holder_ops::OPS,
        HolderLedger::MeteoraDbc => meteoradbc_holder_ops::OPS,
        HolderLedger::MeteoraCpmm => meteoracpmm_holder_ops::OPS,
    }
});

fn holder_table(ledger: HolderLedger) -> Result<&'static HolderTableOps> {
    HOLDER_TABLES
        .get(&ledger)
        .ok_or_else(|| anyhow!("no table registered for holder ledger {ledger}"))
}

/// [`RecordStore`] over one pooled Postgres connection.
pub struct PgStore {
    conn: Object<AsyncPgConnection>,
}

impl PgStore {
    pub async fn checkout(db_pool: &DbPool) -> Result<Self> {
        let conn = db_pool.get().await?;
        Ok(Self { conn })
    }

    fn conn(&mut self) -> &mut AsyncPgConnection {
        &mut self.conn
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn begin(&mut self) -> Result<()> {
        trace!("begin transaction");
        AnsiTransactionManager::begin_transaction(self.conn()).await?;
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        trace!("commit transaction");
        AnsiTransactionManager::commit_transaction(self.conn()).await?;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        debug!("rolling back transaction");
        AnsiTransactionManager::rollback_transaction(self.conn()).await?;
        Ok(())
    }

    async fn find_pool(&mut self, platform: Platform, pool_id: i32) -> Result<Option<PoolRecord>> {
        let ops = pool_table(platform)?;
        Ok((ops.load)(self.conn(), pool_id).await?)
    }

    async fn find_pool_by_address(
        &mut self,
        platform: Platform,
        pool_address: &str,
    ) -> Result<Option<PoolRecord>> {
        let ops = pool_table(platform)?;
        Ok((ops.load_by_address)(self.conn(), pool_address.to_string()).await?)
    }

    async fn update_pool_status(
        &mut self,
        platform: Platform,
        pool_id: i32,
        status: PoolStatus,
    ) -> Result<usize> {
        let ops = pool_table(platform)?;
        Ok((ops.update_status)(self.conn(), pool_id, status).await?)
    }

    async fn count_pool_dependents(&mut self, platform: Platform, pool_id: i32) -> Result<i64> {
        let ops = pool_table(platform)?;
        Ok((ops.count_dependents)(self.conn(), pool_id).await?)
    }

    async fn delete_pool(&mut self, platform: Platform, pool_id: i32) -> Result<usize> {
        let ops = pool_table(platform)?;
        Ok((ops.delete)(self.conn(), pool_id).await?)
    }

    async fn insert_meteora_dbc_pool(&mut self, pool: NewMeteoraDbcPool) -> Result<MeteoraDbcPool> {
        Ok(diesel::insert_into(meteora_dbc_pools)
            .values(pool)
            .get_result::<MeteoraDbcPool>(self.conn())
            .await?)
    }

    async fn insert_meteora_cpmm_pool(&mut self, pool: NewMeteoraCpmmPool) -> Result<MeteoraCpmmPool> {
        Ok(diesel::insert_into(meteora_cpmm_pools)
            .values(pool)
            .get_result::<MeteoraCpmmPool>(self.conn())
            .await?)
    }

    async fn insert_raydium_launchpad_pool(
        &mut self,
        pool: NewRaydiumLaunchpadPool,
    ) -> Result<RaydiumLaunchpadPool> {
        Ok(diesel::insert_into(raydium_launchpad_pools)
            .values(pool)
            .get_result::<RaydiumLaunchpadPool>(self.conn())
            .await?)
    }

    async fn insert_raydium_cpmm_pool(&mut self, pool: NewRaydiumCpmmPool) -> Result<RaydiumCpmmPool> {
        Ok(diesel::insert_into(raydium_cpmm_pools)
            .values(pool)
            .get_result::<RaydiumCpmmPool>(self.conn())
            .await?)
    }

    async fn find_relation_by_launchpad(
        &mut self,
        launchpad_pool_address: &str,
    ) -> Result<Option<RaydiumPoolRelation>> {
        use crate::schema::raydium_pool_relations::dsl::launchpad_pool_address as launchpad;
        Ok(raydium_pool_relations
            .filter(launchpad.eq(launchpad_pool_address))
            .first::<RaydiumPoolRelation>(self.conn())
            .await
            .optional()?)
    }

    async fn insert_relation(&mut self, relation: NewRaydiumPoolRelation) -> Result<RaydiumPoolRelation> {
        Ok(diesel::insert_into(raydium_pool_relations)
            .values(relation)
            .get_result::<RaydiumPoolRelation>(self.conn())
            .await?)
    }

    async fn find_project(&mut self, project_id: i32) -> Result<Option<ProjectConfig>> {
        Ok(project_configs
            .find(project_id)
            .first::<ProjectConfig>(self.conn())
            .await
            .optional()?)
    }

    async fn list_projects(&mut self) -> Result<Vec<ProjectConfig>> {
        use crate::schema::project_configs::dsl::id;
        Ok(project_configs
            .order(id.asc())
            .load::<ProjectConfig>(self.conn())
            .await?)
    }

    async fn insert_project(&mut self, project: NewProjectConfig) -> Result<ProjectConfig> {
        Ok(diesel::insert_into(project_configs)
            .values(project)
            .get_result::<ProjectConfig>(self.conn())
            .await?)
    }

    async fn update_project(
        &mut self,
        project_id: i32,
        changes: &ProjectConfigChangeset,
    ) -> Result<usize> {
        Ok(diesel::update(project_configs.find(project_id))
            .set(changes)
            .execute(self.conn())
            .await?)
    }

    async fn delete_project(&mut self, project_id: i32) -> Result<usize> {
        Ok(diesel::delete(project_configs.find(project_id))
            .execute(self.conn())
            .await?)
    }

    async fn find_token(&mut self, token_id: i32) -> Result<Option<TokenConfig>> {
        Ok(token_configs
            .find(token_id)
            .first::<TokenConfig>(self.conn())
            .await
            .optional()?)
    }

    async fn insert_token(&mut self, token: NewTokenConfig) -> Result<TokenConfig> {
        Ok(diesel::insert_into(token_configs)
            .values(token)
            .get_result::<TokenConfig>(self.conn())
            .await?)
    }

    async fn insert_project_role(&mut self, role: NewProjectRole) -> Result<ProjectRole> {
        Ok(diesel::insert_into(project_roles)
            .values(role)
            .get_result::<ProjectRole>(self.conn())
            .await?)
    }

    async fn count_project_roles(&mut self, pid: i32) -> Result<i64> {
        use crate::schema::project_roles::dsl::project_id;
        Ok(project_roles
            .filter(project_id.eq(pid))
            .count()
            .get_result::<i64>(self.conn())
            .await?)
    }

    async fn insert_strategy(&mut self, strategy: NewStrategyConfig) -> Result<StrategyConfig> {
        Ok(diesel::insert_into(strategy_configs)
            .values(strategy)
            .get_result::<StrategyConfig>(self.conn())
            .await?)
    }

    async fn count_strategies(&mut self, pid: i32) -> Result<i64> {
        use crate::schema::strategy_configs::dsl::project_id;
        Ok(strategy_configs
            .filter(project_id.eq(pid))
            .count()
            .get_result::<i64>(self.conn())
            .await?)
    }

    async fn disable_strategies(&mut self, pid: i32) -> Result<usize> {
        use crate::schema::strategy_configs::dsl::{enabled, project_id, updated_at};
        Ok(diesel::update(
            strategy_configs
                .filter(project_id.eq(pid))
                .filter(enabled.eq(true)),
        )
        .set((enabled.eq(false), updated_at.eq(now())))
        .execute(self.conn())
        .await?)
    }

    async fn list_holders(
        &mut self,
        ledger: HolderLedger,
        pool_address: &str,
        excluded_type: Option<HolderType>,
    ) -> Result<Vec<HolderRow>> {
        let ops = holder_table(ledger)?;
        Ok((ops.list)(self.conn(), pool_address.to_string(), excluded_type).await?)
    }

    async fn find_holder(
        &mut self,
        ledger: HolderLedger,
        address: &str,
        pool_address: &str,
        base_mint: &str,
        quote_mint: &str,
    ) -> Result<Option<HolderRow>> {
        let ops = holder_table(ledger)?;
        let key = HolderKey {
            address: address.to_string(),
            pool_address: pool_address.to_string(),
            base_mint: base_mint.to_string(),
            quote_mint: quote_mint.to_string(),
        };
        Ok((ops.find)(self.conn(), key).await?)
    }

    async fn insert_holder(&mut self, ledger: HolderLedger, holder: NewHolderRow) -> Result<HolderRow> {
        let ops = holder_table(ledger)?;
        Ok((ops.insert)(self.conn(), holder).await?)
    }
}
