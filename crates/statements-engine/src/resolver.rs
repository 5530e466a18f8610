//! Resolution of one logical item against its candidate concepts.
//!
//! Candidates are tried strictly in priority order and the first candidate
//! with any acceptable observation wins, even when a lower-priority
//! candidate has an observation closer to the target date. Within a
//! candidate, observations are visited most recent first and the first one
//! passing every active filter is taken.

use chrono::NaiveDate;
use statements_core::{FormType, Observation};

use crate::index::FactIndex;

/// Default date matching tolerance, in days.
pub const DEFAULT_TOLERANCE_DAYS: u32 = 5;

/// The period an item is resolved for, with its matching filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeriodQuery {
    /// Target period end.
    pub period_end: NaiveDate,
    /// Target period start; set for duration items only.
    pub period_start: Option<NaiveDate>,
    /// Only accept observations disclosed on this form.
    pub form: Option<FormType>,
    /// Maximum distance, in days, between observed and target dates.
    pub tolerance_days: u32,
}

impl PeriodQuery {
    /// Query for a point-in-time item.
    #[must_use]
    pub const fn instant(period_end: NaiveDate) -> Self {
        Self {
            period_end,
            period_start: None,
            form: None,
            tolerance_days: DEFAULT_TOLERANCE_DAYS,
        }
    }

    /// Query for an item spanning `period_start..=period_end`.
    #[must_use]
    pub const fn duration(period_start: NaiveDate, period_end: NaiveDate) -> Self {
        Self {
            period_end,
            period_start: Some(period_start),
            form: None,
            tolerance_days: DEFAULT_TOLERANCE_DAYS,
        }
    }

    /// Restrict matches to one form type.
    #[must_use]
    pub const fn with_form(mut self, form: FormType) -> Self {
        self.form = Some(form);
        self
    }

    /// Set the date matching tolerance.
    #[must_use]
    pub const fn with_tolerance_days(mut self, tolerance_days: u32) -> Self {
        self.tolerance_days = tolerance_days;
        self
    }

    /// Returns true if the observation satisfies every active filter.
    ///
    /// An observation without a start date passes the start filter: duration
    /// ambiguity is accepted as a weaker match.
    #[must_use]
    pub fn accepts(&self, observation: &Observation) -> bool {
        if let Some(form) = self.form {
            if observation.form.as_deref() != Some(form.as_str()) {
                return false;
            }
        }

        if !within(observation.period_end, self.period_end, self.tolerance_days) {
            return false;
        }

        match (self.period_start, observation.period_start) {
            (Some(target), Some(observed)) => within(observed, target, self.tolerance_days),
            _ => true,
        }
    }
}

fn within(observed: NaiveDate, target: NaiveDate, tolerance_days: u32) -> bool {
    (observed - target).num_days().abs() <= i64::from(tolerance_days)
}

/// A resolved value and where it came from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution<'a> {
    /// Concept that produced the value.
    pub concept: &'a str,
    /// Raw value.
    pub value: f64,
    /// The matched observation.
    pub observation: &'a Observation,
}

/// Resolves logical items against a [`FactIndex`].
#[derive(Clone, Copy, Debug)]
pub struct TagResolver<'a> {
    index: &'a FactIndex,
}

impl<'a> TagResolver<'a> {
    /// Create a resolver over an index.
    #[must_use]
    pub const fn new(index: &'a FactIndex) -> Self {
        Self { index }
    }

    /// Resolve the best observation for an ordered candidate list.
    ///
    /// Returns `None` when no candidate has an acceptable observation, which
    /// means the item is undisclosed for this period.
    #[must_use]
    pub fn resolve(&self, candidates: &[&str], query: &PeriodQuery) -> Option<Resolution<'a>> {
        candidates
            .iter()
            .find_map(|concept| self.resolve_concept(concept, query))
    }

    /// Resolve against a single concept.
    #[must_use]
    pub fn resolve_concept(&self, concept: &str, query: &PeriodQuery) -> Option<Resolution<'a>> {
        self.index
            .window(concept, query.period_end, query.tolerance_days)
            .iter()
            .find(|observation| query.accepts(observation))
            .map(|observation| Resolution {
                concept: observation.concept.as_str(),
                value: observation.value,
                observation,
            })
    }
}
