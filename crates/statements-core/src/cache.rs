//! Cache trait for raw company facts payloads.
//!
//! This module defines the [`FactsCache`] trait. Company facts payloads are
//! large and rate limited upstream, so repeated extractions for the same
//! company can be served from a cache keyed by CIK.

use async_trait::async_trait;
use std::time::Duration;

use crate::{error::Result, payload::CompanyFacts, types::Cik};

/// Trait for caching raw company facts payloads.
///
/// Implementations can store data in various backends (SQLite, in-memory, etc.).
#[async_trait]
pub trait FactsCache: Send + Sync {
    /// Retrieves the cached payload for a company.
    ///
    /// Returns `Ok(Some(facts))` if cached, `Ok(None)` if not cached.
    async fn get_company_facts(&self, cik: &Cik) -> Result<Option<CompanyFacts>>;

    /// Stores a payload, replacing any previous entry for the company.
    async fn put_company_facts(&self, cik: &Cik, facts: &CompanyFacts) -> Result<()>;

    /// Removes cache entries older than the specified TTL.
    ///
    /// Returns the number of entries invalidated.
    async fn invalidate_stale(&self, ttl: Duration) -> Result<usize>;

    /// Clears all cached data.
    async fn clear(&self) -> Result<()>;
}
