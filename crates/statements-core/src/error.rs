//! Error types for extraction operations.
//!
//! This module defines [`StatementError`] which covers the run-level failures
//! that can occur when looking up a company, selecting a filing, fetching or
//! caching facts, and exporting statements. Field-level and item-level
//! problems never reach this type; they degrade to omission.

use thiserror::Error;

/// Errors that can occur during extraction.
#[derive(Error, Debug)]
pub enum StatementError {
    /// Network-related errors (connection failures, timeouts, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limit exceeded by the upstream service.
    #[error("Rate limited by {provider}: retry after {retry_after:?}")]
    RateLimited {
        /// The service that rate limited the request.
        provider: String,
        /// Suggested time to wait before retrying.
        retry_after: Option<std::time::Duration>,
    },

    /// No company is registered under the requested ticker.
    #[error("Company not found: {0}")]
    CompanyNotFound(String),

    /// No filing of the requested form matches the requested period.
    #[error("No {form} filing found for {ticker}{}", year_suffix(.fiscal_year))]
    FilingNotFound {
        /// Ticker or CIK the filings were listed for.
        ticker: String,
        /// Requested form type.
        form: String,
        /// Requested fiscal year, if any.
        fiscal_year: Option<i32>,
    },

    /// The company has no taxonomy data at all.
    #[error("No XBRL facts available for CIK {0}")]
    NoFacts(String),

    /// Error parsing data from the upstream service.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error interacting with the cache.
    #[error("Cache error: {0}")]
    Cache(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error writing exported statements.
    #[error("Export error: {0}")]
    Export(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl StatementError {
    /// Returns true if the requested company, filing or data does not exist.
    ///
    /// Callers can present these as actionable messages; everything else is
    /// an unexpected failure worth logging as a defect.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CompanyNotFound(_) | Self::FilingNotFound { .. } | Self::NoFacts(_)
        )
    }
}

fn year_suffix(fiscal_year: &Option<i32>) -> String {
    fiscal_year.map(|y| format!(" in {y}")).unwrap_or_default()
}

/// Result type alias using [`StatementError`].
pub type Result<T> = std::result::Result<T, StatementError>;
