#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/statements/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Statement to `DataFrame` conversion.
pub mod frame;
/// Writing statements to disk.
pub mod writer;

pub use frame::{segments_frame, statement_frame};
pub use writer::{ExportFormat, Exporter, FILING_JSON, SEGMENTS_SHEET};
