use chrono::NaiveDateTime;
use diesel::pg::Pg;
use diesel_derives::{AsChangeset, Identifiable, Insertable, Queryable, Selectable};
use serde_derive::{Deserialize, Serialize};
use std::str::FromStr;

use crate::schema::*;
use crate::types::errors::ProjectResult;
use crate::types::platform::Platform;

/// The aggregate root: one trading project sitting on one pool of one platform.
/// `(pool_platform, pool_id)` points into the variant table named by `pool_platform`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(check_for_backend(Pg))]
#[diesel(table_name = project_configs)]
pub struct ProjectConfig {
    pub id: i32,
    pub name: String,
    pub pool_platform: String,
    pub pool_id: i32,
    pub token_id: i32,
    pub is_active: bool,
    pub is_migrated: bool,
    pub is_locked: bool,
    pub update_stat_enabled: bool,
    pub snapshot_enabled: bool,
    pub assets_balance: f64,
    pub retail_sol_amount: f64,
    pub event: Option<serde_json::Value>,
    pub vesting: Option<serde_json::Value>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ProjectConfig {
    pub fn platform(&self) -> ProjectResult<Platform> {
        Platform::from_str(&self.pool_platform)
    }

    /// The vesting blob, if present and shaped as expected.
    pub fn vesting(&self) -> Option<Vesting> {
        self.vesting
            .as_ref()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(check_for_backend(Pg))]
#[diesel(table_name = project_configs)]
pub struct NewProjectConfig {
    pub name: String,
    pub pool_platform: String,
    pub pool_id: i32,
    pub token_id: i32,
    pub is_active: bool,
    pub is_migrated: bool,
    pub is_locked: bool,
    pub update_stat_enabled: bool,
    pub snapshot_enabled: bool,
    pub assets_balance: f64,
    pub retail_sol_amount: f64,
    pub event: Option<serde_json::Value>,
    pub vesting: Option<serde_json::Value>,
}

impl NewProjectConfig {
    pub fn new(name: &str, platform: Platform, pool_id: i32, token_id: i32) -> Self {
        NewProjectConfig {
            name: name.to_string(),
            pool_platform: platform.as_str().to_string(),
            pool_id,
            token_id,
            is_active: true,
            is_migrated: false,
            is_locked: false,
            update_stat_enabled: true,
            snapshot_enabled: true,
            assets_balance: 0.0,
            retail_sol_amount: 0.0,
            event: None,
            vesting: None,
        }
    }
}

/// Partial update of a project. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, AsChangeset)]
#[diesel(table_name = project_configs)]
pub struct ProjectConfigChangeset {
    pub name: Option<String>,
    pub pool_platform: Option<String>,
    pub pool_id: Option<i32>,
    pub token_id: Option<i32>,
    pub is_active: Option<bool>,
    pub is_migrated: Option<bool>,
    pub is_locked: Option<bool>,
    pub update_stat_enabled: Option<bool>,
    pub snapshot_enabled: Option<bool>,
    pub assets_balance: Option<f64>,
    pub retail_sol_amount: Option<f64>,
    pub event: Option<serde_json::Value>,
    pub vesting: Option<serde_json::Value>,
    pub updated_at: Option<NaiveDateTime>,
}

impl ProjectConfigChangeset {
    pub fn apply_to(&self, project: &mut ProjectConfig) {
        if let Some(name) = &self.name {
            project.name = name.clone();
        }
        if let Some(pool_platform) = &self.pool_platform {
            project.pool_platform = pool_platform.clone();
        }
        if let Some(pool_id) = self.pool_id {
            project.pool_id = pool_id;
        }
        if let Some(token_id) = self.token_id {
            project.token_id = token_id;
        }
        if let Some(is_active) = self.is_active {
            project.is_active = is_active;
        }
        if let Some(is_migrated) = self.is_migrated {
            project.is_migrated = is_migrated;
        }
        if let Some(is_locked) = self.is_locked {
            project.is_locked = is_locked;
        }
        if let Some(update_stat_enabled) = self.update_stat_enabled {
            project.update_stat_enabled = update_stat_enabled;
        }
        if let Some(snapshot_enabled) = self.snapshot_enabled {
            project.snapshot_enabled = snapshot_enabled;
        }
        if let Some(assets_balance) = self.assets_balance {
            project.assets_balance = assets_balance;
        }
        if let Some(retail_sol_amount) = self.retail_sol_amount {
            project.retail_sol_amount = retail_sol_amount;
        }
        if let Some(event) = &self.event {
            project.event = Some(event.clone());
        }
        if let Some(vesting) = &self.vesting {
            project.vesting = Some(vesting.clone());
        }
        if let Some(updated_at) = self.updated_at {
            project.updated_at = updated_at;
        }
    }
}

/// Shape of the `vesting` blob read by audit tooling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vesting {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub pool_quote_balance: f64,
    #[serde(default)]
    pub pool_remove_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(check_for_backend(Pg))]
#[diesel(table_name = token_configs)]
pub struct TokenConfig {
    pub id: i32,
    pub mint: String,
    pub name: String,
    pub symbol: String,
    pub decimals: i32,
    pub total_supply: f64,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(check_for_backend(Pg))]
#[diesel(table_name = token_configs)]
pub struct NewTokenConfig {
    pub mint: String,
    pub name: String,
    pub symbol: String,
    pub decimals: i32,
    pub total_supply: f64,
}

/// Links a project to the operator role that manages it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(check_for_backend(Pg))]
#[diesel(table_name = project_roles)]
pub struct ProjectRole {
    pub id: i32,
    pub project_id: i32,
    pub role_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(check_for_backend(Pg))]
#[diesel(table_name = project_roles)]
pub struct NewProjectRole {
    pub project_id: i32,
    pub role_id: i32,
}
