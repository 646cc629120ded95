use tracing::{debug, info};

use crate::types::errors::{ProjectError, ProjectResult};
use crate::types::platform::Platform;
use crate::types::pool::{PoolRecord, PoolStatus};
use crate::types::store::{finish, RecordStore};

/// Sets the status of exactly the named pool, in its own transaction.
pub async fn set_pool_status(
    store: &mut dyn RecordStore,
    platform: Platform,
    pool_id: i32,
    active: bool,
) -> ProjectResult<()> {
    store.begin().await.map_err(ProjectError::update_failed)?;
    let result = apply_pool_status(store, platform, pool_id, active).await;
    finish(store, result, ProjectError::update_failed).await
}

/// Writes the status onto the named pool and then onto its predecessor, if the platform has
/// one. Never follows a successor: an AMM pool drags its bonding curve along, not the reverse.
///
/// Runs inside whatever transaction the caller holds.
pub async fn apply_pool_status(
    store: &mut dyn RecordStore,
    platform: Platform,
    pool_id: i32,
    active: bool,
) -> ProjectResult<()> {
    let status = PoolStatus::from_active(active);
    let pool = store
        .find_pool(platform, pool_id)
        .await
        .map_err(ProjectError::update_failed)?
        .ok_or(ProjectError::PoolNotFound(platform, pool_id))?;
    write_status(store, &pool, status).await?;

    let (Some(predecessor_platform), Some(predecessor_address)) =
        (platform.predecessor(), pool.predecessor_address())
    else {
        return Ok(());
    };
    match store
        .find_pool_by_address(predecessor_platform, predecessor_address)
        .await
        .map_err(ProjectError::update_failed)?
    {
        Some(predecessor) => write_status(store, &predecessor, status).await,
        None => {
            debug!(
                "{} pool {} has no {} pool {} to cascade to",
                platform, pool_id, predecessor_platform, predecessor_address
            );
            Ok(())
        }
    }
}

async fn write_status(
    store: &mut dyn RecordStore,
    pool: &PoolRecord,
    status: PoolStatus,
) -> ProjectResult<()> {
    let platform = pool.platform();
    let updated = store
        .update_pool_status(platform, pool.id(), status)
        .await
        .map_err(ProjectError::update_failed)?;
    if updated == 0 {
        return Err(ProjectError::UpdateFailed(format!(
            "{} pool {} vanished before its status could be set",
            platform,
            pool.id()
        )));
    }
    info!("{} pool {} ({}) is now {}", platform, pool.id(), pool.pool_address(), status.as_str());
    Ok(())
}

/// Disables every enabled strategy of the project. Safe to repeat; returns rows changed.
pub async fn close_all_strategies(store: &mut dyn RecordStore, project_id: i32) -> ProjectResult<usize> {
    let closed = store
        .disable_strategies(project_id)
        .await
        .map_err(ProjectError::update_failed)?;
    if closed > 0 {
        info!("closed {closed} strategies of project {project_id}");
    }
    Ok(closed)
}
