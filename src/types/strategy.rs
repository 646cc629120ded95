use chrono::NaiveDateTime;
use diesel::pg::Pg;
use diesel_derives::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde_derive::{Deserialize, Serialize};

use crate::schema::*;
use crate::types::project::ProjectConfig;

/// A trading strategy attached to one project and one role. Cascades may switch
/// `enabled` off, never on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations)]
#[diesel(check_for_backend(Pg))]
#[diesel(belongs_to(ProjectConfig, foreign_key = project_id))]
#[diesel(table_name = strategy_configs)]
pub struct StrategyConfig {
    pub id: i32,
    pub project_id: i32,
    pub role_id: i32,
    pub name: String,
    pub strategy_type: String,
    pub enabled: bool,
    pub params: Option<serde_json::Value>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(check_for_backend(Pg))]
#[diesel(table_name = strategy_configs)]
pub struct NewStrategyConfig {
    pub project_id: i32,
    pub role_id: i32,
    pub name: String,
    pub strategy_type: String,
    pub enabled: bool,
    pub params: Option<serde_json::Value>,
}
