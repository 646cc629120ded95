use serde::Serialize;
use thiserror::Error;

use crate::types::platform::Platform;

/// Errors surfaced by pool resolution, cascades and the project flows built on them.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum ProjectError {
    #[error("Unknown pool platform: {0}")]
    InvalidPlatform(String),
    #[error("Pool {1} not found on platform {0}")]
    PoolNotFound(Platform, i32),
    #[error("Project {0} not found")]
    ProjectNotFound(i32),
    #[error("Token {0} not found")]
    TokenNotFound(i32),
    #[error("Pool {0} has no successor pool to migrate holders to")]
    NotMigratable(String),
    #[error("Update failed: {0}")]
    UpdateFailed(String),
    #[error("Create failed: {0}")]
    CreateFailed(String),
    #[error("{entity} {id} is still referenced by {count} {dependents}")]
    DependencyExists {
        entity: &'static str,
        id: i32,
        dependents: &'static str,
        count: i64,
    },
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ProjectError {
    pub fn update_failed(e: anyhow::Error) -> Self {
        ProjectError::UpdateFailed(format!("{e:#}"))
    }

    pub fn create_failed(e: anyhow::Error) -> Self {
        ProjectError::CreateFailed(format!("{e:#}"))
    }

    pub fn storage(e: anyhow::Error) -> Self {
        ProjectError::Storage(format!("{e:#}"))
    }

    /// Rejections are expected outcomes (delete guards), not failures.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ProjectError::DependencyExists { .. })
    }
}

pub type ProjectResult<T> = Result<T, ProjectError>;
