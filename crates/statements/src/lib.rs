#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/statements/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Core types and traits
pub use statements_core::*;

// Engine
pub use statements_engine::{
    AMOUNTS_NOTE, DEFAULT_TOLERANCE_DAYS, ExtractionOptions, FactIndex, FilingExtractor,
    PeriodQuery, StatementAssembler, StatementPeriod, TagResolver, display_value, display_values,
    export_value, export_values,
};

// Cache implementations
#[cfg(feature = "cache-sqlite")]
pub use statements_cache::SqliteCache;
pub use statements_cache::{InMemoryCache, NoopCache};

// Retrieval
pub use statements_edgar::EdgarClient;

// Export
pub use statements_export::{ExportFormat, Exporter};

mod pipeline;
pub use pipeline::{DEFAULT_FILING_LIMIT, StatementPipeline};
