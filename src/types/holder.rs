use chrono::NaiveDateTime;
use diesel_derives::Queryable;
use serde_derive::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::Display;

use crate::types::errors::ProjectError;

/// The per-platform holder tables. They share one column layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum HolderLedger {
    #[strum(serialize = "pumpfuninternal_holders")]
    PumpfunInternal,
    #[strum(serialize = "pumpfun_ammpool_holders")]
    PumpfunAmmPool,
    #[strum(serialize = "raydium_pool_holders")]
    RaydiumPool,
    #[strum(serialize = "meteoradbc_holders")]
    MeteoraDbc,
    #[strum(serialize = "meteoracpmm_holders")]
    MeteoraCpmm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum HolderType {
    #[strum(serialize = "pool")]
    Pool,
    #[strum(serialize = "project")]
    Project,
    #[strum(serialize = "retail_investors")]
    RetailInvestors,
}

impl HolderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HolderType::Pool => "pool",
            HolderType::Project => "project",
            HolderType::RetailInvestors => "retail_investors",
        }
    }
}

impl FromStr for HolderType {
    type Err = ProjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pool" => Ok(HolderType::Pool),
            "project" => Ok(HolderType::Project),
            "retail_investors" => Ok(HolderType::RetailInvestors),
            other => Err(ProjectError::Storage(format!("unknown holder type {other}"))),
        }
    }
}

/// Running balance and volume counters for one address in one pool.
/// Rows are keyed by (address, pool_address, base_mint, quote_mint, holder_type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
pub struct HolderRow {
    pub id: i32,
    pub address: String,
    pub pool_address: String,
    pub base_mint: String,
    pub quote_mint: String,
    pub holder_type: String,
    pub base_change: f64,
    pub quote_change: f64,
    pub sol_change: f64,
    pub base_volume: f64,
    pub quote_volume: f64,
    pub tx_count: i64,
    pub first_slot: i64,
    pub last_slot: i64,
    pub first_timestamp: i64,
    pub last_timestamp: i64,
    pub first_signature: String,
    pub last_signature: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewHolderRow {
    pub address: String,
    pub pool_address: String,
    pub base_mint: String,
    pub quote_mint: String,
    pub holder_type: String,
    pub base_change: f64,
    pub quote_change: f64,
    pub sol_change: f64,
    pub base_volume: f64,
    pub quote_volume: f64,
    pub tx_count: i64,
    pub first_slot: i64,
    pub last_slot: i64,
    pub first_timestamp: i64,
    pub last_timestamp: i64,
    pub first_signature: String,
    pub last_signature: String,
}

impl NewHolderRow {
    /// Copies every accumulated counter and marker of `row` onto `pool_address`.
    pub fn carried_over(row: &HolderRow, pool_address: &str) -> Self {
        NewHolderRow {
            address: row.address.clone(),
            pool_address: pool_address.to_string(),
            base_mint: row.base_mint.clone(),
            quote_mint: row.quote_mint.clone(),
            holder_type: row.holder_type.clone(),
            base_change: row.base_change,
            quote_change: row.quote_change,
            sol_change: row.sol_change,
            base_volume: row.base_volume,
            quote_volume: row.quote_volume,
            tx_count: row.tx_count,
            first_slot: row.first_slot,
            last_slot: row.last_slot,
            first_timestamp: row.first_timestamp,
            last_timestamp: row.last_timestamp,
            first_signature: row.first_signature.clone(),
            last_signature: row.last_signature.clone(),
        }
    }
}
