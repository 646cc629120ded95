use crate::types::store::Publisher;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use r2d2_redis::redis::Commands;
use tracing::trace;

pub type RedisPool = r2d2_redis::r2d2::Pool<r2d2_redis::RedisConnectionManager>;

pub fn connect(redis_uri: &str) -> Result<RedisPool> {
    let manager = r2d2_redis::RedisConnectionManager::new(redis_uri)?;
    r2d2_redis::r2d2::Pool::builder()
        .build(manager)
        .map_err(|e| anyhow!("Failed to create redis connection pool: {e}"))
}

/// Publishes onto a redis list named after the topic; consumers pop from the other end.
#[derive(Clone)]
pub struct RedisPublisher {
    redis: RedisPool,
}

impl RedisPublisher {
    pub fn new(redis: RedisPool) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl Publisher for RedisPublisher {
    async fn publish(&self, topic: &str, message: &str) -> Result<()> {
        let redis = self.redis.clone();
        let topic = topic.to_string();
        let message = message.to_string();
        // r2d2 connections are blocking
        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut conn = redis.get()?;
            let queued: usize = conn.lpush(&topic, &message)?;
            trace!("queued message on {topic}, {queued} pending");
            Ok(())
        })
        .await?
    }
}
