//! Filing extraction.
//!
//! Turns a company facts payload plus one filing descriptor into a
//! [`ParsedFiling`]: metadata, derived statement period, the three assembled
//! statements and the (empty) segment breakdown.

use chrono::{Datelike, Days, NaiveDate};
use statements_core::{
    Cik, CompanyFacts, FilingDescriptor, FilingMetadata, FormType, ParsedFiling, Result,
    SegmentData, StatementError,
};
use tracing::{debug, info};

use crate::assembler::{StatementAssembler, StatementPeriod};
use crate::index::FactIndex;
use crate::resolver::DEFAULT_TOLERANCE_DAYS;

/// Quarterly statements are assumed to span this many days.
const QUARTER_DAYS: u64 = 90;

/// Extraction settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtractionOptions {
    /// Date matching tolerance, in days.
    pub tolerance_days: u32,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            tolerance_days: DEFAULT_TOLERANCE_DAYS,
        }
    }
}

/// Picks the filing to extract from a most-recent-first descriptor list.
///
/// With a fiscal year, the first descriptor whose report date falls in that
/// calendar year is chosen; otherwise the first descriptor.
///
/// # Errors
/// Returns [`StatementError::FilingNotFound`] if nothing matches.
pub fn select_filing<'a>(
    filings: &'a [FilingDescriptor],
    ticker: &str,
    form: FormType,
    fiscal_year: Option<i32>,
) -> Result<&'a FilingDescriptor> {
    let selected = match fiscal_year {
        Some(year) => filings
            .iter()
            .find(|f| f.report_date.is_some_and(|d| d.year() == year)),
        None => filings.first(),
    };

    selected.ok_or_else(|| StatementError::FilingNotFound {
        ticker: ticker.to_string(),
        form: form.to_string(),
        fiscal_year,
    })
}

/// Builds filing metadata from a descriptor.
///
/// The payload's entity name takes precedence over the descriptor's company
/// name.
///
/// # Errors
/// Returns [`StatementError::Parse`] if the descriptor has no report date.
pub fn filing_metadata(
    descriptor: &FilingDescriptor,
    entity_name: Option<&str>,
) -> Result<FilingMetadata> {
    let period_end = descriptor.report_date.ok_or_else(|| {
        StatementError::Parse(format!(
            "Filing {} has no report date",
            descriptor.accession_number
        ))
    })?;

    Ok(FilingMetadata {
        cik: descriptor.cik.clone(),
        company_name: entity_name
            .filter(|name| !name.is_empty())
            .unwrap_or(&descriptor.company_name)
            .to_string(),
        ticker: descriptor.ticker.clone(),
        form: descriptor.form,
        filing_date: descriptor.filing_date,
        period_end,
        fiscal_year: period_end.year(),
        fiscal_period: descriptor.form.fiscal_period().to_string(),
        accession_number: descriptor.accession_number.clone(),
    })
}

/// Derives the statement start date from the period end.
///
/// Annual periods start the day after the same date one year earlier; when
/// that date does not exist (Feb 29) the start is the first of the month one
/// year earlier advanced by the end's day of month. Quarterly periods start
/// 90 days before the end. Returns `None` only at the edges of the
/// representable calendar.
#[must_use]
pub fn period_start(form: FormType, period_end: NaiveDate) -> Option<NaiveDate> {
    match form {
        FormType::TenK => {
            let year = period_end.year() - 1;
            match period_end.with_year(year) {
                Some(prior) => prior.checked_add_days(Days::new(1)),
                None => NaiveDate::from_ymd_opt(year, period_end.month(), 1)?
                    .checked_add_days(Days::new(u64::from(period_end.day()))),
            }
        }
        FormType::TenQ => period_end.checked_sub_days(Days::new(QUARTER_DAYS)),
    }
}

/// Segment breakdown for a period.
///
/// Segment disclosures are dimensional and not present in the company facts
/// payload, so the breakdown is always empty.
#[must_use]
pub fn extract_segments(period: &StatementPeriod) -> SegmentData {
    SegmentData::empty(period.period_end, period.fiscal_year, period.fiscal_period.clone())
}

/// Extracts filings from one company's facts.
#[derive(Clone, Debug)]
pub struct FilingExtractor {
    index: FactIndex,
    entity_name: Option<String>,
    options: ExtractionOptions,
}

impl FilingExtractor {
    /// Index a company facts payload.
    ///
    /// # Errors
    /// Returns [`StatementError::NoFacts`] if no usable observation exists in
    /// any recognized namespace.
    pub fn new(facts: &CompanyFacts) -> Result<Self> {
        let index = FactIndex::build(facts);
        if index.is_empty() {
            let cik = facts
                .cik
                .map(|cik| Cik::from_number(cik).to_string())
                .unwrap_or_default();
            return Err(StatementError::NoFacts(cik));
        }

        Ok(Self {
            index,
            entity_name: facts.entity_name.clone(),
            options: ExtractionOptions::default(),
        })
    }

    /// Replace the extraction settings.
    #[must_use]
    pub const fn with_options(mut self, options: ExtractionOptions) -> Self {
        self.options = options;
        self
    }

    /// The underlying fact index.
    #[must_use]
    pub const fn index(&self) -> &FactIndex {
        &self.index
    }

    /// Extract the statements reported by one filing.
    ///
    /// # Errors
    /// Returns [`StatementError::Parse`] if the descriptor has no report date
    /// or the statement period cannot be derived.
    pub fn extract(&self, descriptor: &FilingDescriptor) -> Result<ParsedFiling> {
        let metadata = filing_metadata(descriptor, self.entity_name.as_deref())?;
        let period_end = metadata.period_end;
        let start = period_start(metadata.form, period_end).ok_or_else(|| {
            StatementError::Parse(format!("Cannot derive period start from {period_end}"))
        })?;

        let period = StatementPeriod {
            period_end,
            period_start: Some(start),
            fiscal_year: metadata.fiscal_year,
            fiscal_period: metadata.fiscal_period.clone(),
            form: Some(metadata.form),
        };
        debug!(
            accession = %metadata.accession_number,
            start = %start,
            end = %period_end,
            "Extracting filing"
        );

        let assembler =
            StatementAssembler::new(&self.index).with_tolerance_days(self.options.tolerance_days);
        let income_statement = assembler.income_statement(&period);
        let balance_sheet = assembler.balance_sheet(&period);
        let cash_flow = assembler.cash_flow(&period);
        let segments = extract_segments(&period);

        info!(
            company = %metadata.company_name,
            income_statement = income_statement.len(),
            balance_sheet = balance_sheet.len(),
            cash_flow = cash_flow.len(),
            "Extracted statements"
        );

        Ok(ParsedFiling {
            metadata,
            income_statement,
            balance_sheet,
            cash_flow,
            segments: Some(segments),
        })
    }
}
