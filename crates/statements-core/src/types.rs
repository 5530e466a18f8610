//! Core data types for statement extraction.
//!
//! This module defines the fundamental data structures:
//!
//! - [`Cik`] - SEC Central Index Key
//! - [`Observation`] - One validated, disclosed numeric fact
//! - [`LineItem`] - A resolved statement row
//! - [`FinancialStatement`] - Ordered line items plus period metadata
//! - [`FilingDescriptor`] - One entry of a company's filing list
//! - [`FilingMetadata`] - Identity and period of the extracted filing
//! - [`SegmentData`] - Segment breakdown (currently always empty)
//! - [`ParsedFiling`] - Everything extracted from one filing

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::{Result, StatementError};
use crate::form::FormType;
use crate::payload::RawObservation;

/// Parse an EDGAR date, looking only at the leading `YYYY-MM-DD`.
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    s.get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

/// An SEC Central Index Key.
///
/// Always stored zero-padded to 10 digits.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cik(String);

impl Cik {
    /// Creates a CIK from its textual form, accepting an optional `CIK` prefix.
    ///
    /// # Errors
    /// Returns [`StatementError::InvalidParameter`] unless the input is 1 to 10
    /// ASCII digits.
    pub fn new(s: impl AsRef<str>) -> Result<Self> {
        let raw = s.as_ref().trim();
        let digits = raw
            .strip_prefix("CIK")
            .or_else(|| raw.strip_prefix("cik"))
            .unwrap_or(raw);
        if digits.is_empty() || digits.len() > 10 || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(StatementError::InvalidParameter(format!("Invalid CIK: {raw}")));
        }
        Ok(Self(format!("{digits:0>10}")))
    }

    /// Creates a CIK from its numeric form.
    #[must_use]
    pub fn from_number(cik: u64) -> Self {
        Self(format!("{cik:0>10}"))
    }

    /// Returns the zero-padded CIK.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cik {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Cik {
    type Err = StatementError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// Reason a raw observation was rejected during validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObservationError {
    /// The observation has no end date.
    #[error("missing end date")]
    MissingEndDate,
    /// The end date is not a `YYYY-MM-DD` date.
    #[error("invalid end date: {0}")]
    InvalidEndDate(String),
    /// The observation has no value.
    #[error("missing value")]
    MissingValue,
    /// The value is not a finite number.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// One disclosed numeric fact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Concept name (e.g. "NetIncomeLoss").
    pub concept: String,
    /// Numeric value in the unit below.
    pub value: f64,
    /// End of the reporting period (or the instant for point-in-time facts).
    pub period_end: NaiveDate,
    /// Start of the reporting period; `None` for instant facts.
    pub period_start: Option<NaiveDate>,
    /// Fiscal year of the source filing.
    pub fiscal_year: Option<i32>,
    /// Fiscal period code of the source filing (FY, Q1, ...).
    pub fiscal_period: Option<String>,
    /// Form type of the source filing (10-K, 10-Q, ...).
    pub form: Option<String>,
    /// Date the source filing was filed.
    pub filed: Option<NaiveDate>,
    /// Accession number of the source filing.
    pub accession: Option<String>,
    /// Calendar frame assigned by EDGAR, if any.
    pub frame: Option<String>,
    /// Unit of measure (USD, shares, USD/shares, ...).
    pub unit: String,
}

impl Observation {
    /// Validate a raw observation.
    ///
    /// The end date and the value are required; every other field that is
    /// missing or malformed is simply left empty.
    ///
    /// # Errors
    /// Returns the [`ObservationError`] describing the rejected required field.
    pub fn from_raw(
        concept: &str,
        unit: &str,
        raw: &RawObservation,
    ) -> std::result::Result<Self, ObservationError> {
        let end = raw.end.as_deref().ok_or(ObservationError::MissingEndDate)?;
        let period_end =
            parse_date(end).ok_or_else(|| ObservationError::InvalidEndDate(end.to_string()))?;
        let value = parse_value(raw.val.as_ref().ok_or(ObservationError::MissingValue)?)?;

        Ok(Self {
            concept: concept.to_string(),
            value,
            period_end,
            period_start: raw.start.as_deref().and_then(parse_date),
            fiscal_year: raw.fy,
            fiscal_period: raw.fp.clone(),
            form: raw.form.clone(),
            filed: raw.filed.as_deref().and_then(parse_date),
            accession: raw.accn.clone(),
            frame: raw.frame.clone(),
            unit: unit.to_string(),
        })
    }

    /// Returns true if this is a point-in-time fact.
    #[must_use]
    pub const fn is_instant(&self) -> bool {
        self.period_start.is_none()
    }

    /// Returns the duration in days if this is a duration fact.
    #[must_use]
    pub fn duration_days(&self) -> Option<i64> {
        self.period_start
            .map(|start| self.period_end.signed_duration_since(start).num_days())
    }
}

fn parse_value(val: &Value) -> std::result::Result<f64, ObservationError> {
    let parsed = match val {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Null => return Err(ObservationError::MissingValue),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| ObservationError::InvalidValue(val.to_string()))
}

/// The three statement types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// Income statement (duration).
    IncomeStatement,
    /// Balance sheet (instant).
    BalanceSheet,
    /// Cash flow statement (duration).
    CashFlow,
}

impl StatementKind {
    /// All statement kinds in presentation order.
    pub const ALL: [Self; 3] = [Self::IncomeStatement, Self::BalanceSheet, Self::CashFlow];

    /// Returns true if items of this statement span a period and must match
    /// a period start.
    #[must_use]
    pub const fn is_duration(&self) -> bool {
        !matches!(self, Self::BalanceSheet)
    }

    /// Sheet name used when exporting this statement.
    #[must_use]
    pub const fn sheet_name(&self) -> &'static str {
        match self {
            Self::IncomeStatement => "Income Statement",
            Self::BalanceSheet => "Balance Sheet",
            Self::CashFlow => "Cash Flow",
        }
    }

    /// Report title for this statement.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::IncomeStatement => "Consolidated Statement of Operations",
            Self::BalanceSheet => "Consolidated Balance Sheet",
            Self::CashFlow => "Consolidated Statement of Cash Flows",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sheet_name())
    }
}

/// One resolved statement row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Logical item key (e.g. "net_income").
    pub key: String,
    /// Display label.
    pub label: String,
    /// Concept name the value was taken from.
    pub concept: String,
    /// Raw value as disclosed.
    pub value: f64,
    /// End of the statement period.
    pub period_end: NaiveDate,
    /// Start of the statement period; `None` for instant items.
    pub period_start: Option<NaiveDate>,
    /// Whether the value is sign-flipped for display.
    pub negated: bool,
    /// Accession number of the filing that disclosed the value.
    pub accession: Option<String>,
}

/// A financial statement: resolved line items in declared order plus period metadata.
///
/// Only resolved items are present; an undisclosed item has no entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatement {
    /// Statement type.
    pub kind: StatementKind,
    /// End of the statement period.
    pub period_end: NaiveDate,
    /// Start of the statement period; `None` for the balance sheet.
    pub period_start: Option<NaiveDate>,
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Fiscal period code (FY, Q, Q1, ...).
    pub fiscal_period: String,
    line_items: Vec<LineItem>,
}

impl FinancialStatement {
    /// Creates an empty statement.
    #[must_use]
    pub fn new(
        kind: StatementKind,
        period_end: NaiveDate,
        period_start: Option<NaiveDate>,
        fiscal_year: i32,
        fiscal_period: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            period_end,
            period_start,
            fiscal_year,
            fiscal_period: fiscal_period.into(),
            line_items: Vec::new(),
        }
    }

    /// Adds a line item, replacing any existing item with the same key in place.
    pub fn insert(&mut self, item: LineItem) {
        match self.line_items.iter_mut().find(|i| i.key == item.key) {
            Some(existing) => *existing = item,
            None => self.line_items.push(item),
        }
    }

    /// Returns the line item for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&LineItem> {
        self.line_items.iter().find(|i| i.key == key)
    }

    /// Returns the raw value for a key.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<f64> {
        self.get(key).map(|i| i.value)
    }

    /// Returns true if the key was resolved.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of resolved line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.line_items.len()
    }

    /// Returns true if nothing was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    /// Iterates line items in declared order.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.line_items.iter()
    }

    /// Iterates resolved keys in declared order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.line_items.iter().map(|i| i.key.as_str())
    }
}

impl<'a> IntoIterator for &'a FinancialStatement {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.line_items.iter()
    }
}

/// One entry of a company's filing list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingDescriptor {
    /// Company CIK.
    pub cik: Cik,
    /// Company name as registered.
    pub company_name: String,
    /// Primary ticker, if any.
    pub ticker: Option<String>,
    /// Form type.
    pub form: FormType,
    /// Accession number.
    pub accession_number: String,
    /// Date the filing was filed.
    pub filing_date: Option<NaiveDate>,
    /// Period end date the filing reports on.
    pub report_date: Option<NaiveDate>,
    /// Primary document file name.
    pub primary_document: Option<String>,
}

/// Identity and period of an extracted filing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingMetadata {
    /// Company CIK.
    pub cik: Cik,
    /// Company name.
    pub company_name: String,
    /// Primary ticker, if any.
    pub ticker: Option<String>,
    /// Form type.
    pub form: FormType,
    /// Date the filing was filed.
    pub filing_date: Option<NaiveDate>,
    /// Period end date.
    pub period_end: NaiveDate,
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Fiscal period code (FY or Q).
    pub fiscal_period: String,
    /// Accession number.
    pub accession_number: String,
}

/// Kind of segment breakdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentType {
    /// Business (operating) segment.
    Business,
    /// Geographic segment.
    Geographic,
}

impl SegmentType {
    /// Returns the lowercase name of this segment type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Geographic => "geographic",
        }
    }
}

/// A business or geographic segment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment name.
    pub name: String,
    /// Segment type.
    pub segment_type: SegmentType,
    /// Segment revenue.
    pub revenue: Option<f64>,
    /// Segment operating income.
    pub operating_income: Option<f64>,
    /// Segment assets.
    pub assets: Option<f64>,
}

/// Segment breakdown for a filing period.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentData {
    /// End of the period.
    pub period_end: NaiveDate,
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Fiscal period code.
    pub fiscal_period: String,
    /// Business segments.
    pub business_segments: Vec<Segment>,
    /// Geographic segments.
    pub geographic_segments: Vec<Segment>,
}

impl SegmentData {
    /// Creates an empty segment breakdown.
    #[must_use]
    pub fn empty(period_end: NaiveDate, fiscal_year: i32, fiscal_period: impl Into<String>) -> Self {
        Self {
            period_end,
            fiscal_year,
            fiscal_period: fiscal_period.into(),
            business_segments: Vec::new(),
            geographic_segments: Vec::new(),
        }
    }

    /// Iterates all segments, business first.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.business_segments
            .iter()
            .chain(self.geographic_segments.iter())
    }
}

/// Everything extracted from one filing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParsedFiling {
    /// Filing metadata.
    pub metadata: FilingMetadata,
    /// Income statement.
    pub income_statement: FinancialStatement,
    /// Balance sheet.
    pub balance_sheet: FinancialStatement,
    /// Cash flow statement.
    pub cash_flow: FinancialStatement,
    /// Segment breakdown.
    pub segments: Option<SegmentData>,
}

impl ParsedFiling {
    /// Returns the statement of the given kind.
    #[must_use]
    pub const fn statement(&self, kind: StatementKind) -> &FinancialStatement {
        match kind {
            StatementKind::IncomeStatement => &self.income_statement,
            StatementKind::BalanceSheet => &self.balance_sheet,
            StatementKind::CashFlow => &self.cash_flow,
        }
    }

    /// Iterates the three statements in presentation order.
    pub fn statements(&self) -> impl Iterator<Item = &FinancialStatement> {
        StatementKind::ALL.into_iter().map(|kind| self.statement(kind))
    }
}
