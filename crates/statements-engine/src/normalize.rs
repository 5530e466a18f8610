//! Presentation rules for resolved values.
//!
//! Every surfaced value goes through the same two steps, both pure functions
//! of the logical item key:
//!
//! 1. negation: items in [`NEGATED_ITEMS`](crate::mappings::NEGATED_ITEMS)
//!    are sign-flipped ([`display_value`])
//! 2. scaling: amounts are presented in thousands, per-share items are left
//!    as is ([`export_value`])

use statements_core::{FinancialStatement, LineItem};

use crate::mappings::is_negated;

/// Divisor for amounts presented in thousands.
pub const THOUSANDS: f64 = 1_000.0;

/// Note describing the units of exported amounts.
pub const AMOUNTS_NOTE: &str = "(Amounts in thousands, except per share data)";

/// How an item is scaled for presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScaleClass {
    /// Per-share amount (EPS); never divided.
    PerShare,
    /// Share count; presented in thousands.
    ShareCount,
    /// Currency amount; presented in thousands.
    Monetary,
}

impl ScaleClass {
    /// Classify a logical item key.
    #[must_use]
    pub fn for_key(key: &str) -> Self {
        if key.contains("eps") {
            Self::PerShare
        } else if key.starts_with("shares_") {
            Self::ShareCount
        } else {
            Self::Monetary
        }
    }

    /// Divisor applied when exporting.
    #[must_use]
    pub const fn divisor(&self) -> f64 {
        match self {
            Self::PerShare => 1.0,
            Self::ShareCount | Self::Monetary => THOUSANDS,
        }
    }
}

/// Signed value shown for an item: the raw value, negated for expense-type items.
#[must_use]
pub fn display_value(key: &str, raw: f64) -> f64 {
    if is_negated(key) { -raw } else { raw }
}

/// Value written on export: negation first, then scaling.
#[must_use]
pub fn export_value(key: &str, raw: f64) -> f64 {
    display_value(key, raw) / ScaleClass::for_key(key).divisor()
}

/// Display value of a resolved line item.
#[must_use]
pub fn item_display_value(item: &LineItem) -> f64 {
    if item.negated { -item.value } else { item.value }
}

/// Export value of a resolved line item.
#[must_use]
pub fn item_export_value(item: &LineItem) -> f64 {
    item_display_value(item) / ScaleClass::for_key(&item.key).divisor()
}

/// Display values of a statement, in declared order.
#[must_use]
pub fn display_values(statement: &FinancialStatement) -> Vec<(&str, f64)> {
    statement
        .iter()
        .map(|item| (item.key.as_str(), item_display_value(item)))
        .collect()
}

/// Export values of a statement, in declared order.
#[must_use]
pub fn export_values(statement: &FinancialStatement) -> Vec<(&str, f64)> {
    statement
        .iter()
        .map(|item| (item.key.as_str(), item_export_value(item)))
        .collect()
}
