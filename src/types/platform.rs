use std::collections::HashMap;
use std::str::FromStr;

use maplit::hashmap;
use once_cell::sync::Lazy;
use serde_derive::{Deserialize, Serialize};
use strum_macros::Display;

use crate::types::errors::ProjectError;
use crate::types::holder::HolderLedger;

/// The closed set of pool integrations a project can sit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    #[strum(serialize = "raydium")]
    Raydium,
    #[strum(serialize = "raydium_launchpad")]
    RaydiumLaunchpad,
    #[strum(serialize = "raydium_cpmm")]
    RaydiumCpmm,
    #[strum(serialize = "pumpfun_internal")]
    PumpfunInternal,
    #[strum(serialize = "pumpfun_amm")]
    PumpfunAmm,
    #[strum(serialize = "meteora_dbc")]
    MeteoraDbc,
    #[strum(serialize = "meteora_cpmm")]
    MeteoraCpmm,
}

#[cfg(test)]
pub const ALL_PLATFORMS: [Platform; 7] = [
    Platform::Raydium,
    Platform::RaydiumLaunchpad,
    Platform::RaydiumCpmm,
    Platform::PumpfunInternal,
    Platform::PumpfunAmm,
    Platform::MeteoraDbc,
    Platform::MeteoraCpmm,
];

/// Static facts about a platform: which table backs it, which ledger its holders live in,
/// and how it links to the pool it migrates into or out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformEntry {
    pub platform: Platform,
    pub tag: &'static str,
    pub table: &'static str,
    pub holder_ledger: HolderLedger,
    // bonding curve -> the AMM platform it migrates into
    pub successor: Option<Platform>,
    // AMM -> the bonding curve platform it was migrated from, status changes flow back to it
    pub predecessor: Option<Platform>,
}

static REGISTRY: Lazy<HashMap<Platform, PlatformEntry>> = Lazy::new(|| {
    hashmap! {
        Platform::Raydium => PlatformEntry {
            platform: Platform::Raydium,
            tag: "raydium",
            table: "raydium_pools",
            holder_ledger: HolderLedger::RaydiumPool,
            successor: None,
            predecessor: None,
        },
        Platform::RaydiumLaunchpad => PlatformEntry {
            platform: Platform::RaydiumLaunchpad,
            tag: "raydium_launchpad",
            table: "raydium_launchpad_pools",
            holder_ledger: HolderLedger::RaydiumPool,
            successor: None,
            predecessor: None,
        },
        Platform::RaydiumCpmm => PlatformEntry {
            platform: Platform::RaydiumCpmm,
            tag: "raydium_cpmm",
            table: "raydium_cpmm_pools",
            holder_ledger: HolderLedger::RaydiumPool,
            successor: None,
            predecessor: None,
        },
        Platform::PumpfunInternal => PlatformEntry {
            platform: Platform::PumpfunInternal,
            tag: "pumpfun_internal",
            table: "pumpfun_internal_pools",
            holder_ledger: HolderLedger::PumpfunInternal,
            successor: None,
            predecessor: None,
        },
        Platform::PumpfunAmm => PlatformEntry {
            platform: Platform::PumpfunAmm,
            tag: "pumpfun_amm",
            table: "pumpfun_amm_pools",
            holder_ledger: HolderLedger::PumpfunAmmPool,
            successor: None,
            predecessor: None,
        },
        Platform::MeteoraDbc => PlatformEntry {
            platform: Platform::MeteoraDbc,
            tag: "meteora_dbc",
            table: "meteora_dbc_pools",
            holder_ledger: HolderLedger::MeteoraDbc,
            successor: Some(Platform::MeteoraCpmm),
            predecessor: None,
        },
        Platform::MeteoraCpmm => PlatformEntry {
            platform: Platform::MeteoraCpmm,
            tag: "meteora_cpmm",
            table: "meteora_cpmm_pools",
            holder_ledger: HolderLedger::MeteoraCpmm,
            successor: None,
            predecessor: Some(Platform::MeteoraDbc),
        },
    }
});

impl Platform {
    pub fn entry(&self) -> &'static PlatformEntry {
        // every variant is registered above
        &REGISTRY[self]
    }

    pub fn as_str(&self) -> &'static str {
        self.entry().tag
    }

    pub fn table(&self) -> &'static str {
        self.entry().table
    }

    pub fn successor(&self) -> Option<Platform> {
        self.entry().successor
    }

    pub fn predecessor(&self) -> Option<Platform> {
        self.entry().predecessor
    }
}

impl FromStr for Platform {
    type Err = ProjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        REGISTRY
            .values()
            .find(|entry| entry.tag == s)
            .map(|entry| entry.platform)
            .ok_or_else(|| ProjectError::InvalidPlatform(s.to_string()))
    }
}
