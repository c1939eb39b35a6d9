use std::sync::Arc;

use redis::aio::ConnectionManager;
use redis::{cmd, Client, RedisError};
use tokio::sync::RwLock;

const SET_IF_MATCHES: &str = r"
local current = redis.call('GET', KEYS[2]) or '0'
if current == ARGV[2] then
    redis.call('SET', KEYS[1], ARGV[1], 'EX', ARGV[3])
    return 1
end
return 0
";

#[derive(Clone)]
pub(crate) struct RedisHandle {
    url: String,
    manager: Arc<RwLock<Option<ConnectionManager>>>,
}

#[derive(Debug, Clone)]
pub(crate) enum RedisHealth {
    Healthy,
    Disconnected,
    Unhealthy(String),
}

impl RedisHandle {
    pub(crate) fn new(url: String) -> Self {
        Self { url, manager: Arc::new(RwLock::new(None)) }
    }

    pub(crate) async fn connect(&self) -> Result<(), RedisError> {
        let client = Client::open(self.url.clone())?;
        let manager = ConnectionManager::new(client).await?;
        let mut guard = self.manager.write().await;
        *guard = Some(manager);
        Ok(())
    }

    pub(crate) async fn disconnect(&self) {
        let mut guard = self.manager.write().await;
        *guard = None;
    }

    pub(crate) async fn is_connected(&self) -> bool {
        self.manager.read().await.is_some()
    }

    pub(crate) async fn health(&self) -> RedisHealth {
        let manager = { self.manager.read().await.clone() };
        let Some(mut manager) = manager else {
            return RedisHealth::Disconnected;
        };

        match cmd("PING").query_async::<_, String>(&mut manager).await {
            Ok(_) => RedisHealth::Healthy,
            Err(err) => RedisHealth::Unhealthy(err.to_string()),
        }
    }

    /// Returns `Ok(None)` both for a missing key and for a disconnected handle.
    pub(crate) async fn get(&self, key: &str) -> Result<Option<String>, RedisError> {
        let manager = { self.manager.read().await.clone() };
        let Some(mut manager) = manager else {
            return Ok(None);
        };

        cmd("GET").arg(key).query_async::<_, Option<String>>(&mut manager).await
    }

    /// Sets `key` only while `guard_key` still holds `expected`; a missing guard reads as "0".
    /// Returns whether the value was written.
    pub(crate) async fn set_ex_if_matches(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: u64,
        guard_key: &str,
        expected: &str,
    ) -> Result<bool, RedisError> {
        let manager = { self.manager.read().await.clone() };
        let Some(mut manager) = manager else {
            return Ok(false);
        };

        let written = cmd("EVAL")
            .arg(SET_IF_MATCHES)
            .arg(2)
            .arg(key)
            .arg(guard_key)
            .arg(value)
            .arg(expected)
            .arg(ttl_seconds)
            .query_async::<_, i64>(&mut manager)
            .await?;
        Ok(written == 1)
    }

    /// Returns 0 without touching anything when disconnected.
    pub(crate) async fn incr(&self, key: &str) -> Result<i64, RedisError> {
        let manager = { self.manager.read().await.clone() };
        let Some(mut manager) = manager else {
            return Ok(0);
        };

        cmd("INCR").arg(key).query_async::<_, i64>(&mut manager).await
    }

    pub(crate) async fn delete(&self, key: &str) -> Result<(), RedisError> {
        let manager = { self.manager.read().await.clone() };
        let Some(mut manager) = manager else {
            return Ok(());
        };

        cmd("DEL").arg(key).query_async::<_, i64>(&mut manager).await?;
        Ok(())
    }
}
