use std::sync::Arc;

use sqlx::PgPool;

use crate::core::deadline::StoreDeadlines;
use crate::core::{config::Settings, redis::RedisHandle};
use crate::services::catalog_cache::CatalogCache;

#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    db: PgPool,
    redis: RedisHandle,
    deadlines: StoreDeadlines,
    catalog_cache: CatalogCache,
}

impl AppState {
    pub(crate) fn new(settings: Settings, db: PgPool, redis: RedisHandle) -> Self {
        let deadlines = StoreDeadlines::from_settings(&settings);
        let catalog_cache = CatalogCache::new(redis.clone(), settings.catalog().cache_ttl_seconds);
        Self { inner: Arc::new(InnerState { settings, db, redis, deadlines, catalog_cache }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn db(&self) -> &PgPool {
        &self.inner.db
    }

    pub(crate) fn redis(&self) -> &RedisHandle {
        &self.inner.redis
    }

    pub(crate) fn deadlines(&self) -> &StoreDeadlines {
        &self.inner.deadlines
    }

    pub(crate) fn catalog_cache(&self) -> &CatalogCache {
        &self.inner.catalog_cache
    }
}
