//! No-op cache implementation.

use async_trait::async_trait;
use statements_core::{Cik, CompanyFacts, FactsCache, Result};
use std::time::Duration;
use tracing::trace;

/// A no-op cache that doesn't store anything.
///
/// Every lookup misses and every store succeeds without effect.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl NoopCache {
    /// Create a new no-op cache.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FactsCache for NoopCache {
    async fn get_company_facts(&self, _cik: &Cik) -> Result<Option<CompanyFacts>> {
        trace!("NoopCache: get_company_facts called, returning None");
        Ok(None)
    }

    async fn put_company_facts(&self, _cik: &Cik, _facts: &CompanyFacts) -> Result<()> {
        trace!("NoopCache: put_company_facts called, doing nothing");
        Ok(())
    }

    async fn invalidate_stale(&self, _ttl: Duration) -> Result<usize> {
        trace!("NoopCache: invalidate_stale called, returning 0");
        Ok(0)
    }

    async fn clear(&self) -> Result<()> {
        trace!("NoopCache: clear called, doing nothing");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_cache_never_hits() {
        let cache = NoopCache::new();
        let cik = Cik::from_number(320_193);
        let facts = CompanyFacts {
            entity_name: Some("Example Corp".to_string()),
            ..Default::default()
        };

        cache.put_company_facts(&cik, &facts).await.unwrap();
        assert!(cache.get_company_facts(&cik).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_noop_cache_management() {
        let cache = NoopCache::new();

        let removed = cache
            .invalidate_stale(Duration::from_secs(3600))
            .await
            .unwrap();
        assert_eq!(removed, 0);
        assert!(cache.clear().await.is_ok());
    }
}
