use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::pools::resolver::PoolResolution;
use crate::types::platform::Platform;
use crate::types::store::RecordStore;

pub type RelationBlob = Map<String, Value>;

pub const RELATION_KEY: &str = "relation";
pub const CPMM_POOL_CONFIG_KEY: &str = "cpmm_pool_config";
pub const METEORA_CPMM_CONFIG_KEY: &str = "meteoracpmm_config";

/// Collects cross-pool relation data for presentation. Never fails: every miss or
/// storage error simply leaves its key out.
pub async fn augment(store: &mut dyn RecordStore, resolution: &PoolResolution) -> RelationBlob {
    let mut blob = RelationBlob::new();

    if resolution.resolved.effective_platform == Platform::RaydiumLaunchpad {
        add_launchpad_relation(store, resolution.pool.pool_address(), &mut blob).await;
    }

    // keyed on the declared platform: callers may want the raw curve view annotated
    // with its successor even when the resolver already redirected to it
    if resolution.resolved.original_platform == Platform::MeteoraDbc {
        if let Some(successor) = resolution.original.recorded_successor_address() {
            match store.find_pool_by_address(Platform::MeteoraCpmm, successor).await {
                Ok(Some(cpmm)) => insert(&mut blob, METEORA_CPMM_CONFIG_KEY, &cpmm),
                Ok(None) => debug!("meteora cpmm pool {successor} not found"),
                Err(e) => warn!("meteora cpmm lookup for {successor} failed: {e:#}"),
            }
        }
    }

    blob
}

async fn add_launchpad_relation(
    store: &mut dyn RecordStore,
    launchpad_address: &str,
    blob: &mut RelationBlob,
) {
    let relation = match store.find_relation_by_launchpad(launchpad_address).await {
        Ok(Some(relation)) => relation,
        Ok(None) => {
            debug!("no relation recorded for launchpad pool {launchpad_address}");
            return;
        }
        Err(e) => {
            warn!("relation lookup for {launchpad_address} failed: {e:#}");
            return;
        }
    };
    insert(blob, RELATION_KEY, &relation);

    match store
        .find_pool_by_address(Platform::RaydiumCpmm, &relation.cpmm_pool_address)
        .await
    {
        Ok(Some(cpmm)) => insert(blob, CPMM_POOL_CONFIG_KEY, &cpmm),
        Ok(None) => debug!("companion cpmm pool {} not found", relation.cpmm_pool_address),
        Err(e) => warn!("companion cpmm lookup for {} failed: {e:#}", relation.cpmm_pool_address),
    }
}

fn insert<T: Serialize>(blob: &mut RelationBlob, key: &str, value: &T) {
    match serde_json::to_value(value) {
        Ok(value) => {
            blob.insert(key.to_string(), value);
        }
        Err(e) => warn!("could not serialize {key}: {e}"),
    }
}
