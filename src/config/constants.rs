// Redis list the monitoring service pops new pool tasks from
pub const DEFAULT_MONITOR_TOPIC: &str = "pool_monitor_tasks";

pub const DEFAULT_PAGE_SIZE: usize = 20;

pub const CONFIG_FILENAME: &str = "config";
