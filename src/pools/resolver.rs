use serde_derive::Serialize;
use tracing::{debug, warn};

use crate::types::errors::{ProjectError, ProjectResult};
use crate::types::platform::Platform;
use crate::types::pool::PoolRecord;
use crate::types::store::RecordStore;

/// Where a project's declared pool actually lives. The project row itself is never
/// rewritten here; persisting a redirect is a separate, deliberate write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub original_platform: Platform,
    pub original_pool_id: i32,
    pub effective_platform: Platform,
    pub effective_pool_id: i32,
}

impl Resolved {
    pub fn is_redirected(&self) -> bool {
        self.original_platform != self.effective_platform
            || self.original_pool_id != self.effective_pool_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolResolution {
    pub resolved: Resolved,
    /// The row the caller named.
    pub original: PoolRecord,
    /// The row that backs the project now; equal to `original` unless migrated.
    pub pool: PoolRecord,
}

pub async fn resolve(
    store: &mut dyn RecordStore,
    platform: Platform,
    pool_id: i32,
) -> ProjectResult<PoolResolution> {
    if pool_id <= 0 {
        return Err(ProjectError::PoolNotFound(platform, pool_id));
    }
    let original = store
        .find_pool(platform, pool_id)
        .await
        .map_err(ProjectError::storage)?
        .ok_or(ProjectError::PoolNotFound(platform, pool_id))?;

    let pool = match successor_of(store, &original).await {
        Some(successor) => {
            debug!(
                "{} pool {} migrated, redirecting to {} pool {}",
                platform,
                pool_id,
                successor.platform(),
                successor.id()
            );
            successor
        }
        None => original.clone(),
    };

    Ok(PoolResolution {
        resolved: Resolved {
            original_platform: platform,
            original_pool_id: pool_id,
            effective_platform: pool.platform(),
            effective_pool_id: pool.id(),
        },
        original,
        pool,
    })
}

/// Best effort: a missing or unreadable successor leaves the original pool in place.
async fn successor_of(store: &mut dyn RecordStore, pool: &PoolRecord) -> Option<PoolRecord> {
    let successor_platform = pool.platform().successor()?;
    let address = pool.successor_address()?;
    match store.find_pool_by_address(successor_platform, address).await {
        Ok(Some(successor)) => Some(successor),
        Ok(None) => {
            debug!(
                "successor {} pool {} of {} not found, keeping original",
                successor_platform,
                address,
                pool.pool_address()
            );
            None
        }
        Err(e) => {
            warn!("successor lookup for {} failed: {:#}", pool.pool_address(), e);
            None
        }
    }
}
