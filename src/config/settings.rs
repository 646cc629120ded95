use config::{Config, ConfigError, Environment, File};
use serde_derive::Deserialize;

use crate::config::constants::{DEFAULT_MONITOR_TOPIC, DEFAULT_PAGE_SIZE};
use crate::pools::profit::ProfitRange;

#[derive(Debug, Clone, Deserialize)]
#[allow(unused)]
pub struct LoggerConfig {
    pub(crate) level: String,
}

#[derive(Clone, Deserialize)]
#[allow(unused)]
pub struct StorageConfig {
    pub database_uri: String,
    pub redis_uri: String,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(unused)]
pub struct NotificationsConfig {
    pub(crate) enabled: bool,
    #[serde(default = "default_monitor_topic")]
    pub(crate) monitor_topic: String,
}

fn default_monitor_topic() -> String {
    DEFAULT_MONITOR_TOPIC.to_string()
}

// outliers outside the bounds are left out of the ranking
#[derive(Debug, Clone, Deserialize)]
#[allow(unused)]
pub struct RankingConfig {
    pub(crate) min_profit: Option<f64>,
    pub(crate) max_profit: Option<f64>,
    #[serde(default = "default_page_size")]
    pub(crate) page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl RankingConfig {
    pub fn range(&self) -> ProfitRange {
        ProfitRange {
            min: self.min_profit,
            max: self.max_profit,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[allow(unused)]
pub struct Settings {
    pub logger: LoggerConfig,
    pub storage: StorageConfig,
    pub notifications: NotificationsConfig,
    pub ranking: RankingConfig,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("database_uri", &"<hidden>")
            .field("redis_uri", &"<hidden>")
            .finish()
    }
}

impl Settings {
    /// Reads the config file, then lets `APP__SECTION__KEY` variables override it.
    pub fn new(config_filename: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(config_filename))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;
        s.try_deserialize()
    }
}
