use serde::Deserialize;

pub(crate) const DEFAULT_LIMIT: i64 = 50;
pub(crate) const MAX_LIMIT: i64 = 100;

const fn default_page() -> i64 {
    1
}

const fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// 1-based page query; out-of-range values are clamped rather than rejected.
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct PageQuery {
    #[serde(default = "default_page")]
    page: i64,
    #[serde(default = "default_limit")]
    limit: i64,
}

impl PageQuery {
    pub(crate) fn page(&self) -> i64 {
        self.page.max(1)
    }

    pub(crate) fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_LIMIT)
    }

    pub(crate) fn skip(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }

    /// Only this page of the listing is served from the catalog cache.
    pub(crate) fn is_default_first_page(&self) -> bool {
        self.page() == 1 && self.limit() == DEFAULT_LIMIT
    }
}
