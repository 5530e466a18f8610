//! SQLite-based cache implementation.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use statements_core::{Cik, CompanyFacts, FactsCache, Result, StatementError};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, instrument};

fn cache_error(e: impl std::fmt::Display) -> StatementError {
    StatementError::Cache(e.to_string())
}

/// Timestamps are fixed-width UTC so they compare correctly as text.
fn timestamp(at: chrono::DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// SQLite-based cache for company facts payloads.
///
/// Stores one JSON document per CIK, providing persistence across runs.
#[derive(Debug)]
pub struct SqliteCache {
    conn: Mutex<Connection>,
}

impl SqliteCache {
    /// Create a new SQLite cache at the given path.
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or schema creation fails.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(cache_error)?;
        Self::with_connection(conn)
    }

    /// Create an in-memory SQLite cache.
    ///
    /// Useful for testing; data is lost when the cache is dropped.
    ///
    /// # Errors
    /// Returns an error if schema creation fails.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(cache_error)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let cache = Self {
            conn: Mutex::new(conn),
        };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Initialize the database schema.
    fn initialize_schema(&self) -> Result<()> {
        let conn = self.conn.lock().map_err(cache_error)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS company_facts_cache (
                cik TEXT PRIMARY KEY,
                entity_name TEXT,
                data_json TEXT NOT NULL,
                cached_at TEXT NOT NULL
            )",
            [],
        )
        .map_err(cache_error)?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_company_facts_cached_at
             ON company_facts_cache(cached_at)",
            [],
        )
        .map_err(cache_error)?;

        debug!("SQLite cache schema initialized");
        Ok(())
    }

    /// Number of cached payloads.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn len(&self) -> Result<usize> {
        let conn = self.conn.lock().map_err(cache_error)?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM company_facts_cache", [], |row| {
                row.get(0)
            })
            .map_err(cache_error)?;
        usize::try_from(count).map_err(cache_error)
    }

    /// Returns true if nothing is cached.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl FactsCache for SqliteCache {
    #[instrument(skip(self), fields(cik = %cik))]
    async fn get_company_facts(&self, cik: &Cik) -> Result<Option<CompanyFacts>> {
        let conn = self.conn.lock().map_err(cache_error)?;

        let result = conn
            .query_row(
                "SELECT data_json FROM company_facts_cache WHERE cik = ?1",
                params![cik.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(cache_error)?;

        match result {
            Some(json) => {
                let facts = CompanyFacts::from_json(&json)?;
                debug!("Found cached company facts");
                Ok(Some(facts))
            }
            None => {
                debug!("No cached company facts found");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, facts), fields(cik = %cik))]
    async fn put_company_facts(&self, cik: &Cik, facts: &CompanyFacts) -> Result<()> {
        let cached_at = timestamp(Utc::now());
        let data_json =
            serde_json::to_string(facts).map_err(|e| StatementError::Parse(e.to_string()))?;

        let conn = self.conn.lock().map_err(cache_error)?;
        conn.execute(
            "INSERT OR REPLACE INTO company_facts_cache
             (cik, entity_name, data_json, cached_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![cik.as_str(), facts.entity_name, data_json, cached_at],
        )
        .map_err(cache_error)?;

        debug!(bytes = data_json.len(), "Cached company facts");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn invalidate_stale(&self, ttl: Duration) -> Result<usize> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| StatementError::Cache(format!("Invalid TTL duration: {e}")))?;
        let cutoff = Utc::now()
            .checked_sub_signed(ttl)
            .map_or_else(String::new, timestamp);

        let conn = self.conn.lock().map_err(cache_error)?;
        let deleted = conn
            .execute(
                "DELETE FROM company_facts_cache WHERE cached_at < ?1",
                params![cutoff],
            )
            .map_err(cache_error)?;

        if deleted > 0 {
            debug!("Invalidated {} stale cache entries", deleted);
        }
        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        let conn = self.conn.lock().map_err(cache_error)?;
        conn.execute("DELETE FROM company_facts_cache", [])
            .map_err(cache_error)?;
        debug!("Cleared all cache entries");
        Ok(())
    }
}
