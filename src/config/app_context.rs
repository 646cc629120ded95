use crate::config::settings::Settings;
use crate::projects::notifications::Notifier;
use crate::projects::service::ProjectService;
use crate::storage;
use crate::storage::cache::{RedisPool, RedisPublisher};
use crate::storage::persistent::{DbPool, PgStore};
use anyhow::{Context, Result};
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// app context we're going to pass around; connections are pooled, a service borrows one per call
pub struct AppContext {
    pub(crate) settings: Arc<RwLock<Settings>>,
    pub(crate) db_pool: DbPool,
    pub(crate) redis_pool: Option<RedisPool>,
    pub(crate) notifier: Notifier,
    notifier_worker: Option<JoinHandle<()>>,
}

impl Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("notifications", &self.redis_pool.is_some())
            .field("notifier", &self.notifier)
            .finish()
    }
}

impl AppContext {
    pub(crate) async fn new(config_filename: &str) -> Result<Self> {
        // loading settings
        let settings = Settings::new(config_filename).context("Failed to load settings")?;

        // setting up logging
        let filter = tracing_subscriber::EnvFilter::new(&settings.logger.level)
            .add_directive("tokio_postgres=info".parse()?)
            .add_directive("diesel_async=info".parse()?)
            .add_directive("r2d2=info".parse()?);
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(true)
            .with_thread_ids(true)
            .with_writer(std::io::stderr);
        tracing_subscriber::registry()
            .with(fmt_layer)
            .with(filter)
            .init();

        // Set up storage: postgres pool and, when notifications are on, the redis queue
        let db_pool = storage::persistent::connect(&settings.storage.database_uri)?;
        let (redis_pool, notifier, notifier_worker) = if settings.notifications.enabled {
            let redis_pool = storage::cache::connect(&settings.storage.redis_uri)?;
            let publisher = Arc::new(RedisPublisher::new(redis_pool.clone()));
            let (notifier, worker) =
                Notifier::spawn(publisher, &settings.notifications.monitor_topic);
            info!(
                "publishing monitor tasks to {}",
                settings.notifications.monitor_topic
            );
            (Some(redis_pool), notifier, Some(worker))
        } else {
            debug!("notifications disabled");
            (None, Notifier::disabled(), None)
        };

        Ok(Self {
            settings: Arc::new(RwLock::new(settings)),
            db_pool,
            redis_pool,
            notifier,
            notifier_worker,
        })
    }

    pub async fn get_settings(&self) -> RwLockReadGuard<'_, Settings> {
        self.settings.read().await
    }

    /// A service bound to one pooled connection.
    pub async fn project_service(&self) -> Result<ProjectService<PgStore>> {
        let store = PgStore::checkout(&self.db_pool).await?;
        Ok(ProjectService::new(store, self.notifier.clone()))
    }

    /// Waits for queued notifications to go out. Services handed out earlier must be dropped
    /// first, they keep the queue open.
    pub async fn shutdown(self) {
        let Self {
            notifier,
            notifier_worker,
            ..
        } = self;
        drop(notifier);
        if let Some(worker) = notifier_worker {
            if let Err(e) = worker.await {
                warn!("notification worker ended abnormally: {e}");
            }
        }
    }
}
