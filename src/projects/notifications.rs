use chrono::NaiveDateTime;
use serde_derive::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::types::platform::Platform;
use crate::types::store::Publisher;

/// Asks the monitoring service to start watching a freshly created project's pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorTask {
    pub task_id: Uuid,
    pub project_id: i32,
    pub pool_platform: Platform,
    pub pool_address: String,
    pub successor_pool_address: Option<String>,
    pub created_at: NaiveDateTime,
}

impl MonitorTask {
    pub fn new(
        project_id: i32,
        pool_platform: Platform,
        pool_address: &str,
        successor_pool_address: Option<&str>,
    ) -> Self {
        Self {
            task_id: Uuid::new_v4(),
            project_id,
            pool_platform,
            pool_address: pool_address.to_string(),
            successor_pool_address: successor_pool_address.map(str::to_string),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

/// Hands monitor tasks to a background worker. `submit` returns immediately and never
/// reports delivery; publish failures only show up in the log.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: Option<mpsc::UnboundedSender<MonitorTask>>,
}

impl Notifier {
    /// Spawns the publishing worker. It stops once every `Notifier` clone is dropped.
    pub fn spawn(publisher: Arc<dyn Publisher>, topic: &str) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<MonitorTask>();
        let topic = topic.to_string();
        let worker = tokio::spawn(async move {
            while let Some(task) = rx.recv().await {
                let message = match serde_json::to_string(&task) {
                    Ok(message) => message,
                    Err(e) => {
                        warn!("dropping monitor task {}: {e}", task.task_id);
                        continue;
                    }
                };
                match publisher.publish(&topic, &message).await {
                    Ok(()) => info!(
                        "monitor task {} for project {} published to {}",
                        task.task_id, task.project_id, topic
                    ),
                    Err(e) => warn!(
                        "failed to publish monitor task {} for project {}: {e:#}",
                        task.task_id, task.project_id
                    ),
                }
            }
            debug!("monitor task worker for {topic} stopped");
        });
        (Self { tx: Some(tx) }, worker)
    }

    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn submit(&self, task: MonitorTask) {
        match &self.tx {
            Some(tx) => {
                if let Err(e) = tx.send(task) {
                    warn!("monitor task {} not queued, worker is gone", e.0.task_id);
                }
            }
            None => debug!(
                "notifications disabled, dropping monitor task for project {}",
                task.project_id
            ),
        }
    }
}
