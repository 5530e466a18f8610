#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/statements/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and traits for SEC financial statement extraction.
//!
//! - [`CompanyFacts`](payload::CompanyFacts) - Raw taxonomy payload
//! - [`Observation`](types::Observation) - One validated, disclosed numeric fact
//! - [`FinancialStatement`](types::FinancialStatement) - Ordered line items for one period
//! - [`FactSource`](source::FactSource) - Retrieval of identifiers, filings and facts
//! - [`FactsCache`](cache::FactsCache) - Caching abstraction for raw payloads

/// Cache trait for raw company facts payloads.
pub mod cache;
/// Error types for extraction operations.
pub mod error;
/// Filing form types.
pub mod form;
/// Raw SEC company facts payload.
pub mod payload;
/// Retrieval trait for identifiers, filings and facts.
pub mod source;
/// Core data types (Cik, Observation, LineItem, FinancialStatement, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use cache::FactsCache;
pub use error::{Result, StatementError};
pub use form::FormType;
pub use payload::{CompanyFacts, ConceptFacts, RawObservation};
pub use source::FactSource;
pub use types::{
    Cik, FilingDescriptor, FilingMetadata, FinancialStatement, LineItem, Observation,
    ObservationError, ParsedFiling, Segment, SegmentData, SegmentType, StatementKind,
};
