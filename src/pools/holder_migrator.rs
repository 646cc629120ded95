use serde_derive::Serialize;
use tracing::{debug, error, info};

use crate::types::errors::{ProjectError, ProjectResult};
use crate::types::holder::{HolderType, NewHolderRow};
use crate::types::platform::Platform;
use crate::types::store::RecordStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub migrated: usize,
    pub skipped: usize,
    pub errored: usize,
}

/// Copies the non-pool holder rows of a bonding curve onto its successor AMM pool.
///
/// Rows already present on the successor are skipped, so the call can be rerun after a
/// partial failure. The bonding curve rows are left in place.
pub async fn migrate(
    store: &mut dyn RecordStore,
    bonding_curve_address: &str,
) -> ProjectResult<MigrationReport> {
    let source = Platform::MeteoraDbc;
    let target = source
        .successor()
        .ok_or_else(|| ProjectError::NotMigratable(bonding_curve_address.to_string()))?;

    let pool = store
        .find_pool_by_address(source, bonding_curve_address)
        .await
        .map_err(ProjectError::storage)?
        .ok_or_else(|| ProjectError::NotMigratable(bonding_curve_address.to_string()))?;
    let successor_address = pool
        .recorded_successor_address()
        .ok_or_else(|| ProjectError::NotMigratable(bonding_curve_address.to_string()))?
        .to_string();

    let source_ledger = source.entry().holder_ledger;
    let target_ledger = target.entry().holder_ledger;
    let holders = store
        .list_holders(source_ledger, bonding_curve_address, Some(HolderType::Pool))
        .await
        .map_err(ProjectError::storage)?;
    debug!(
        "migrating {} holders from {} to {}",
        holders.len(),
        bonding_curve_address,
        successor_address
    );

    let mut report = MigrationReport::default();
    for holder in holders {
        let existing = store
            .find_holder(
                target_ledger,
                &holder.address,
                &successor_address,
                &holder.base_mint,
                &holder.quote_mint,
            )
            .await;
        match existing {
            Ok(Some(_)) => {
                report.skipped += 1;
                continue;
            }
            Ok(None) => {}
            Err(e) => {
                error!("lookup of holder {} on {} failed: {e:#}", holder.address, successor_address);
                report.errored += 1;
                continue;
            }
        }

        match store
            .insert_holder(target_ledger, NewHolderRow::carried_over(&holder, &successor_address))
            .await
        {
            Ok(_) => report.migrated += 1,
            Err(e) => {
                error!("failed to migrate holder {} to {}: {e:#}", holder.address, successor_address);
                report.errored += 1;
            }
        }
    }

    info!(
        "holder migration {} -> {}: {} migrated, {} skipped, {} errored",
        bonding_curve_address, successor_address, report.migrated, report.skipped, report.errored
    );
    Ok(report)
}
