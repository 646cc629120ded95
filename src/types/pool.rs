use chrono::NaiveDateTime;
use diesel::pg::Pg;
use diesel_derives::{Identifiable, Insertable, Queryable, Selectable};
use serde_derive::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::Display;

use crate::schema::*;
use crate::types::errors::ProjectError;
use crate::types::platform::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum PoolStatus {
    #[strum(serialize = "active")]
    Active,
    #[strum(serialize = "inactive")]
    Inactive,
}

impl PoolStatus {
    pub fn from_active(active: bool) -> Self {
        if active {
            PoolStatus::Active
        } else {
            PoolStatus::Inactive
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PoolStatus::Active => "active",
            PoolStatus::Inactive => "inactive",
        }
    }
}

impl FromStr for PoolStatus {
    type Err = ProjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(PoolStatus::Active),
            "inactive" => Ok(PoolStatus::Inactive),
            other => Err(ProjectError::Storage(format!("unknown pool status {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(check_for_backend(Pg))]
#[diesel(table_name = raydium_pools)]
pub struct RaydiumPool {
    pub id: i32,
    pub pool_address: String,
    pub base_mint: String,
    pub quote_mint: String,
    pub lp_mint: String,
    pub base_vault: String,
    pub quote_vault: String,
    pub open_orders: String,
    pub market_id: String,
    pub fee_rate: f64,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(check_for_backend(Pg))]
#[diesel(table_name = raydium_launchpad_pools)]
pub struct RaydiumLaunchpadPool {
    pub id: i32,
    pub pool_address: String,
    pub base_mint: String,
    pub quote_mint: String,
    pub base_vault: String,
    pub quote_vault: String,
    pub global_config: String,
    pub platform_config: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(check_for_backend(Pg))]
#[diesel(table_name = raydium_launchpad_pools)]
pub struct NewRaydiumLaunchpadPool {
    pub pool_address: String,
    pub base_mint: String,
    pub quote_mint: String,
    pub base_vault: String,
    pub quote_vault: String,
    pub global_config: String,
    pub platform_config: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(check_for_backend(Pg))]
#[diesel(table_name = raydium_cpmm_pools)]
pub struct RaydiumCpmmPool {
    pub id: i32,
    pub pool_address: String,
    pub base_mint: String,
    pub quote_mint: String,
    pub amm_config: String,
    pub base_vault: String,
    pub quote_vault: String,
    pub lp_mint: String,
    pub observation_state: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(check_for_backend(Pg))]
#[diesel(table_name = raydium_cpmm_pools)]
pub struct NewRaydiumCpmmPool {
    pub pool_address: String,
    pub base_mint: String,
    pub quote_mint: String,
    pub amm_config: String,
    pub base_vault: String,
    pub quote_vault: String,
    pub lp_mint: String,
    pub observation_state: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(check_for_backend(Pg))]
#[diesel(table_name = pumpfun_internal_pools)]
pub struct PumpfunInternalPool {
    pub id: i32,
    pub pool_address: String,
    pub base_mint: String,
    pub quote_mint: String,
    pub associated_bonding_curve: String,
    pub creator: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(check_for_backend(Pg))]
#[diesel(table_name = pumpfun_amm_pools)]
pub struct PumpfunAmmPool {
    pub id: i32,
    pub pool_address: String,
    pub base_mint: String,
    pub quote_mint: String,
    pub pool_base_token_account: String,
    pub pool_quote_token_account: String,
    pub lp_mint: String,
    pub coin_creator: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Bonding curve pool. Once the curve completes it is migrated into a
/// [`MeteoraCpmmPool`] whose address is recorded in `damm_v2_pool_address`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(check_for_backend(Pg))]
#[diesel(table_name = meteora_dbc_pools)]
pub struct MeteoraDbcPool {
    pub id: i32,
    pub pool_address: String,
    pub base_mint: String,
    pub quote_mint: String,
    pub config: String,
    pub base_vault: String,
    pub quote_vault: String,
    pub creator: String,
    pub is_migrated: bool,
    pub damm_v2_pool_address: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(check_for_backend(Pg))]
#[diesel(table_name = meteora_dbc_pools)]
pub struct NewMeteoraDbcPool {
    pub pool_address: String,
    pub base_mint: String,
    pub quote_mint: String,
    pub config: String,
    pub base_vault: String,
    pub quote_vault: String,
    pub creator: String,
    pub is_migrated: bool,
    pub damm_v2_pool_address: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(check_for_backend(Pg))]
#[diesel(table_name = meteora_cpmm_pools)]
pub struct MeteoraCpmmPool {
    pub id: i32,
    pub pool_address: String,
    pub base_mint: String,
    pub quote_mint: String,
    pub config: String,
    pub token_a_vault: String,
    pub token_b_vault: String,
    // back pointer to the bonding curve this pool was migrated from, empty if none
    pub dbc_pool_address: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(check_for_backend(Pg))]
#[diesel(table_name = meteora_cpmm_pools)]
pub struct NewMeteoraCpmmPool {
    pub pool_address: String,
    pub base_mint: String,
    pub quote_mint: String,
    pub config: String,
    pub token_a_vault: String,
    pub token_b_vault: String,
    pub dbc_pool_address: String,
    pub status: String,
}

/// A loaded row from whichever variant table a platform maps to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PoolRecord {
    Raydium(RaydiumPool),
    RaydiumLaunchpad(RaydiumLaunchpadPool),
    RaydiumCpmm(RaydiumCpmmPool),
    PumpfunInternal(PumpfunInternalPool),
    PumpfunAmm(PumpfunAmmPool),
    MeteoraDbc(MeteoraDbcPool),
    MeteoraCpmm(MeteoraCpmmPool),
}

macro_rules! each_pool {
    ($record:expr, $pool:ident => $body:expr) => {
        match $record {
            PoolRecord::Raydium($pool) => $body,
            PoolRecord::RaydiumLaunchpad($pool) => $body,
            PoolRecord::RaydiumCpmm($pool) => $body,
            PoolRecord::PumpfunInternal($pool) => $body,
            PoolRecord::PumpfunAmm($pool) => $body,
            PoolRecord::MeteoraDbc($pool) => $body,
            PoolRecord::MeteoraCpmm($pool) => $body,
        }
    };
}

impl PoolRecord {
    pub fn platform(&self) -> Platform {
        match self {
            PoolRecord::Raydium(_) => Platform::Raydium,
            PoolRecord::RaydiumLaunchpad(_) => Platform::RaydiumLaunchpad,
            PoolRecord::RaydiumCpmm(_) => Platform::RaydiumCpmm,
            PoolRecord::PumpfunInternal(_) => Platform::PumpfunInternal,
            PoolRecord::PumpfunAmm(_) => Platform::PumpfunAmm,
            PoolRecord::MeteoraDbc(_) => Platform::MeteoraDbc,
            PoolRecord::MeteoraCpmm(_) => Platform::MeteoraCpmm,
        }
    }

    pub fn id(&self) -> i32 {
        each_pool!(self, pool => pool.id)
    }

    pub fn pool_address(&self) -> &str {
        each_pool!(self, pool => &pool.pool_address)
    }

    #[cfg(test)]
    pub fn status(&self) -> &str {
        each_pool!(self, pool => &pool.status)
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.status() == PoolStatus::Active.as_str()
    }

    #[cfg(test)]
    pub fn set_status(&mut self, status: PoolStatus, now: NaiveDateTime) {
        each_pool!(self, pool => {
            pool.status = status.as_str().to_string();
            pool.updated_at = now;
        })
    }

    /// Address of the pool this one migrated into, if the migration has happened.
    pub fn successor_address(&self) -> Option<&str> {
        match self {
            PoolRecord::MeteoraDbc(pool)
                if pool.is_migrated && !pool.damm_v2_pool_address.is_empty() =>
            {
                Some(&pool.damm_v2_pool_address)
            }
            _ => None,
        }
    }

    /// Successor address regardless of the migrated flag, used for annotation only.
    pub fn recorded_successor_address(&self) -> Option<&str> {
        match self {
            PoolRecord::MeteoraDbc(pool) if !pool.damm_v2_pool_address.is_empty() => {
                Some(&pool.damm_v2_pool_address)
            }
            _ => None,
        }
    }

    /// Address of the pool this one was migrated from.
    pub fn predecessor_address(&self) -> Option<&str> {
        match self {
            PoolRecord::MeteoraCpmm(pool) if !pool.dbc_pool_address.is_empty() => {
                Some(&pool.dbc_pool_address)
            }
            _ => None,
        }
    }
}
