#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/statements/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Fact resolution and statement assembly.
//!
//! - [`FactIndex`](index::FactIndex) - Observations grouped by concept, most recent first
//! - [`TagResolver`](resolver::TagResolver) - Priority-ordered concept resolution
//! - [`StatementAssembler`](assembler::StatementAssembler) - Builds the three statements
//! - [`normalize`] - Sign and scale conventions for presentation
//! - [`FilingExtractor`](extract::FilingExtractor) - One filing end to end

/// Statement assembly.
pub mod assembler;
/// Filing extraction.
pub mod extract;
/// Fact index.
pub mod index;
/// Static line item tables.
pub mod mappings;
/// Presentation sign and scale conventions.
pub mod normalize;
/// Tag resolution.
pub mod resolver;

pub use assembler::{StatementAssembler, StatementPeriod};
pub use extract::{
    ExtractionOptions, FilingExtractor, extract_segments, filing_metadata, period_start,
    select_filing,
};
pub use index::FactIndex;
pub use mappings::{ItemMapping, is_negated, items_for, label, tag_candidates};
pub use normalize::{
    AMOUNTS_NOTE, ScaleClass, THOUSANDS, display_value, display_values, export_value,
    export_values, item_display_value, item_export_value,
};
pub use resolver::{DEFAULT_TOLERANCE_DAYS, PeriodQuery, Resolution, TagResolver};
