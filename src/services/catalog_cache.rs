use crate::core::metrics;
use crate::core::redis::RedisHandle;
use crate::schemas::assessment::AssessmentPage;

pub(crate) const CATALOG_CACHE_KEY: &str = "assessments_list";
pub(crate) const CATALOG_GENERATION_KEY: &str = "assessments_list:generation";

/// Read-through cache for the first page of the default assessment listing.
///
/// Stores the authoring projection; callers strip answer keys for candidates.
/// Redis problems degrade to a miss and never fail the request.
///
/// Every invalidation bumps a generation counter. A reader captures the
/// generation before querying the store and the write only lands if the
/// counter is unchanged, so a page read before an invalidation is never cached
/// after it.
#[derive(Clone)]
pub(crate) struct CatalogCache {
    redis: RedisHandle,
    ttl_seconds: u64,
}

impl CatalogCache {
    pub(crate) fn new(redis: RedisHandle, ttl_seconds: u64) -> Self {
        Self { redis, ttl_seconds }
    }

    pub(crate) async fn get(&self) -> Option<AssessmentPage> {
        let raw = match self.redis.get(CATALOG_CACHE_KEY).await {
            Ok(raw) => raw,
            Err(err) => {
                metrics::record_cache_lookup("error");
                tracing::warn!(error = %err, key = CATALOG_CACHE_KEY, "Catalog cache read failed");
                return None;
            }
        };

        let Some(raw) = raw else {
            metrics::record_cache_lookup("miss");
            return None;
        };

        match serde_json::from_str::<AssessmentPage>(&raw) {
            Ok(page) => {
                metrics::record_cache_lookup("hit");
                Some(page)
            }
            Err(err) => {
                metrics::record_cache_lookup("error");
                tracing::warn!(error = %err, key = CATALOG_CACHE_KEY, "Discarding unreadable catalog cache entry");
                None
            }
        }
    }

    /// Generation to hand back to [`CatalogCache::put`]. `None` disables the write.
    pub(crate) async fn generation(&self) -> Option<String> {
        if !self.redis.is_connected().await {
            return None;
        }

        match self.redis.get(CATALOG_GENERATION_KEY).await {
            Ok(value) => Some(value.unwrap_or_else(|| "0".to_string())),
            Err(err) => {
                tracing::warn!(error = %err, key = CATALOG_GENERATION_KEY, "Catalog generation read failed");
                None
            }
        }
    }

    pub(crate) async fn put(&self, page: &AssessmentPage, generation: Option<String>) {
        let Some(generation) = generation else {
            return;
        };

        let payload = match serde_json::to_string(page) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to serialize catalog page for cache");
                return;
            }
        };

        match self
            .redis
            .set_ex_if_matches(
                CATALOG_CACHE_KEY,
                &payload,
                self.ttl_seconds,
                CATALOG_GENERATION_KEY,
                &generation,
            )
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(generation = %generation, "Skipped caching catalog page read before an invalidation");
            }
            Err(err) => {
                tracing::warn!(error = %err, key = CATALOG_CACHE_KEY, "Catalog cache write failed");
            }
        }
    }

    /// Awaited by every catalog write before it responds.
    pub(crate) async fn invalidate(&self) {
        if let Err(err) = self.redis.incr(CATALOG_GENERATION_KEY).await {
            tracing::warn!(error = %err, key = CATALOG_GENERATION_KEY, "Catalog generation bump failed");
        }
        if let Err(err) = self.redis.delete(CATALOG_CACHE_KEY).await {
            tracing::warn!(error = %err, key = CATALOG_CACHE_KEY, "Catalog cache invalidation failed");
        }
    }
}
