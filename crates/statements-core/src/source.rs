//! Retrieval trait for identifiers, filings and facts.
//!
//! The extraction engine never performs I/O itself. Everything it consumes
//! comes through a [`FactSource`]: the network-backed EDGAR client in
//! production, or an in-memory stub in tests.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    form::FormType,
    payload::CompanyFacts,
    types::{Cik, FilingDescriptor},
};

/// Source of company identifiers, filing lists and raw taxonomy payloads.
#[async_trait]
pub trait FactSource: Send + Sync + Debug {
    /// Returns the name of this source (e.g. "SEC EDGAR").
    fn name(&self) -> &str;

    /// Resolves a ticker to the company's CIK.
    ///
    /// Returns [`StatementError::CompanyNotFound`](crate::StatementError::CompanyNotFound)
    /// if no company is registered under the ticker.
    async fn lookup_cik(&self, ticker: &str) -> Result<Cik>;

    /// Fetches the full company facts payload.
    ///
    /// Returns [`StatementError::NoFacts`](crate::StatementError::NoFacts)
    /// if the company has no taxonomy data.
    async fn company_facts(&self, cik: &Cik) -> Result<CompanyFacts>;

    /// Lists filings of one form type, most recent first.
    ///
    /// # Arguments
    ///
    /// * `cik` - Company CIK
    /// * `form` - Form type to keep
    /// * `limit` - Maximum number of descriptors to return
    async fn filings(&self, cik: &Cik, form: FormType, limit: usize)
    -> Result<Vec<FilingDescriptor>>;
}
