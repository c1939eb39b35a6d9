use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::core::config::Settings;

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store operation `{operation}` exceeded {seconds}s deadline")]
    Timeout { operation: &'static str, seconds: u64 },
}

/// Read and write deadlines wrapped around every store round-trip.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StoreDeadlines {
    read: Duration,
    write: Duration,
}

impl StoreDeadlines {
    pub(crate) fn from_settings(settings: &Settings) -> Self {
        Self::new(
            Duration::from_secs(settings.store().read_timeout_seconds),
            Duration::from_secs(settings.store().write_timeout_seconds),
        )
    }

    pub(crate) fn new(read: Duration, write: Duration) -> Self {
        Self { read, write }
    }

    pub(crate) async fn read<T, F>(&self, operation: &'static str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        bounded(operation, self.read, fut).await
    }

    pub(crate) async fn write<T, F>(&self, operation: &'static str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        bounded(operation, self.write, fut).await
    }
}

async fn bounded<T, F>(operation: &'static str, limit: Duration, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(StoreError::from),
        Err(_) => {
            tracing::warn!(operation, seconds = limit.as_secs(), "Store deadline exceeded");
            Err(StoreError::Timeout { operation, seconds: limit.as_secs() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_passes_through_result() {
        let deadlines = StoreDeadlines::new(Duration::from_secs(1), Duration::from_secs(1));
        let value = deadlines.read("noop", async { Ok::<_, sqlx::Error>(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn write_maps_driver_errors() {
        let deadlines = StoreDeadlines::new(Duration::from_secs(1), Duration::from_secs(1));
        let err = deadlines
            .write("insert", async { Err::<(), _>(sqlx::Error::RowNotFound) })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Database(sqlx::Error::RowNotFound)));
    }

    #[tokio::test]
    async fn read_times_out() {
        let deadlines = StoreDeadlines::new(Duration::from_millis(20), Duration::from_secs(10));
        let err = deadlines
            .read("slow", async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok::<_, sqlx::Error>(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Timeout { operation: "slow", .. }));
    }
}
