use serde_derive::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::errors::{ProjectError, ProjectResult};
use crate::types::project::ProjectConfig;
use crate::types::store::RecordStore;

/// Profit is the difference in assets balance against the project with the previous id.
/// The first project, and any project whose predecessor id is missing, earns 0.0. The project
/// itself must exist, whatever its id.
pub async fn profit(store: &mut dyn RecordStore, project_id: i32) -> ProjectResult<f64> {
    let project = store
        .find_project(project_id)
        .await
        .map_err(ProjectError::storage)?
        .ok_or(ProjectError::ProjectNotFound(project_id))?;
    if project_id <= 1 {
        return Ok(0.0);
    }
    let previous = store
        .find_project(project_id - 1)
        .await
        .map_err(ProjectError::storage)?;
    Ok(previous.map_or(0.0, |previous| project.assets_balance - previous.assets_balance))
}

fn sequential_profit(project: &ProjectConfig, balances: &HashMap<i32, f64>) -> f64 {
    if project.id <= 1 {
        return 0.0;
    }
    balances
        .get(&(project.id - 1))
        .map_or(0.0, |previous| project.assets_balance - previous)
}

/// Inclusive bounds; an open side accepts everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfitRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ProfitRange {
    pub fn contains(&self, profit: f64) -> bool {
        self.min.map_or(true, |min| profit >= min) && self.max.map_or(true, |max| profit <= max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedProject {
    pub project_id: i32,
    pub name: String,
    pub pool_platform: String,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingPage {
    /// Projects left after filtering, across all pages.
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub projects: Vec<RankedProject>,
}

/// Filters on the computed profit, then sorts best first (ties by id), then cuts the
/// 1-based page out of the result.
pub fn rank(projects: &[ProjectConfig], range: ProfitRange, page: usize, page_size: usize) -> RankingPage {
    let balances: HashMap<i32, f64> = projects
        .iter()
        .map(|project| (project.id, project.assets_balance))
        .collect();

    let mut ranked: Vec<RankedProject> = projects
        .iter()
        .map(|project| RankedProject {
            project_id: project.id,
            name: project.name.clone(),
            pool_platform: project.pool_platform.clone(),
            profit: sequential_profit(project, &balances),
        })
        .filter(|ranked| range.contains(ranked.profit))
        .collect();
    ranked.sort_by(|a, b| b.profit.total_cmp(&a.profit).then(a.project_id.cmp(&b.project_id)));

    let page = page.max(1);
    let page_size = page_size.max(1);
    let total = ranked.len();
    let projects = ranked
        .into_iter()
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .collect();

    RankingPage {
        total,
        page,
        page_size,
        projects,
    }
}

pub async fn rank_projects(
    store: &mut dyn RecordStore,
    range: ProfitRange,
    page: usize,
    page_size: usize,
) -> ProjectResult<RankingPage> {
    let projects = store.list_projects().await.map_err(ProjectError::storage)?;
    Ok(rank(&projects, range, page, page_size))
}
