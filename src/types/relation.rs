use chrono::NaiveDateTime;
use diesel::pg::Pg;
use diesel_derives::{Identifiable, Insertable, Queryable, Selectable};
use serde_derive::{Deserialize, Serialize};

use crate::schema::*;

/// Pairs a launchpad pool with the CPMM pool it graduates into. Written once when the
/// launchpad pool is provisioned; only the completion fields change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(check_for_backend(Pg))]
#[diesel(table_name = raydium_pool_relations)]
pub struct RaydiumPoolRelation {
    pub id: i32,
    pub launchpad_pool_address: String,
    pub cpmm_pool_address: String,
    pub launchpad_base_vault: String,
    pub launchpad_quote_vault: String,
    pub cpmm_base_vault: String,
    pub cpmm_quote_vault: String,
    pub is_completed: bool,
    pub completed_signature: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(check_for_backend(Pg))]
#[diesel(table_name = raydium_pool_relations)]
pub struct NewRaydiumPoolRelation {
    pub launchpad_pool_address: String,
    pub cpmm_pool_address: String,
    pub launchpad_base_vault: String,
    pub launchpad_quote_vault: String,
    pub cpmm_base_vault: String,
    pub cpmm_quote_vault: String,
}
