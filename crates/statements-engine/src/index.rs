//! Per-concept index of validated observations.

use chrono::{Days, NaiveDate};
use statements_core::payload::RECOGNIZED_NAMESPACES;
use statements_core::{CompanyFacts, Observation};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Observations grouped by concept name, each list sorted by period end, most recent first.
///
/// Built once per payload and read-only afterwards. Observations that share a
/// period end keep their payload order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FactIndex {
    concepts: HashMap<String, Vec<Observation>>,
    discarded: usize,
}

impl FactIndex {
    /// Index every concept of the recognized namespaces.
    ///
    /// All observations of a concept are collected across units. An
    /// observation that fails validation is dropped on its own; the rest of
    /// its concept is still indexed.
    #[must_use]
    pub fn build(facts: &CompanyFacts) -> Self {
        let mut concepts: HashMap<String, Vec<Observation>> = HashMap::new();
        let mut discarded = 0usize;

        for namespace in RECOGNIZED_NAMESPACES {
            let Some(namespace_facts) = facts.namespace(namespace) else {
                continue;
            };

            for (concept, concept_facts) in namespace_facts {
                for (unit, raw_values) in &concept_facts.units {
                    for raw in raw_values {
                        match Observation::from_raw(concept, unit, raw) {
                            Ok(observation) => concepts
                                .entry(concept.clone())
                                .or_default()
                                .push(observation),
                            Err(e) => {
                                discarded += 1;
                                trace!(%concept, %unit, error = %e, "Discarding observation");
                            }
                        }
                    }
                }
            }
        }

        let index = Self::sorted(concepts, discarded);
        debug!(
            concepts = index.concept_count(),
            observations = index.observation_count(),
            discarded = index.discarded,
            "Built fact index"
        );
        index
    }

    /// Index already-validated observations.
    #[must_use]
    pub fn from_observations(observations: impl IntoIterator<Item = Observation>) -> Self {
        let mut concepts: HashMap<String, Vec<Observation>> = HashMap::new();
        for observation in observations {
            concepts
                .entry(observation.concept.clone())
                .or_default()
                .push(observation);
        }
        Self::sorted(concepts, 0)
    }

    fn sorted(mut concepts: HashMap<String, Vec<Observation>>, discarded: usize) -> Self {
        for observations in concepts.values_mut() {
            // Stable, so equal period ends keep payload order.
            observations.sort_by(|a, b| b.period_end.cmp(&a.period_end));
        }
        Self {
            concepts,
            discarded,
        }
    }

    /// Returns all observations of a concept, most recent period end first.
    #[must_use]
    pub fn observations(&self, concept: &str) -> &[Observation] {
        self.concepts
            .get(concept)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the observations of a concept whose period end lies within
    /// `tolerance_days` of `target`, most recent first.
    ///
    /// Located by binary search over the sorted list.
    #[must_use]
    pub fn window(&self, concept: &str, target: NaiveDate, tolerance_days: u32) -> &[Observation] {
        let observations = self.observations(concept);
        let tolerance = Days::new(u64::from(tolerance_days));
        let latest = target.checked_add_days(tolerance).unwrap_or(NaiveDate::MAX);
        let earliest = target.checked_sub_days(tolerance).unwrap_or(NaiveDate::MIN);

        let start = observations.partition_point(|o| o.period_end > latest);
        let end = observations.partition_point(|o| o.period_end >= earliest);
        &observations[start..end.max(start)]
    }

    /// Returns true if the concept has at least one observation.
    #[must_use]
    pub fn contains(&self, concept: &str) -> bool {
        self.concepts.contains_key(concept)
    }

    /// Iterates the indexed concept names in arbitrary order.
    pub fn concepts(&self) -> impl Iterator<Item = &str> {
        self.concepts.keys().map(String::as_str)
    }

    /// Number of concepts with at least one observation.
    #[must_use]
    pub fn concept_count(&self) -> usize {
        self.concepts.len()
    }

    /// Total number of indexed observations.
    #[must_use]
    pub fn observation_count(&self) -> usize {
        self.concepts.values().map(Vec::len).sum()
    }

    /// Number of raw observations rejected during validation.
    #[must_use]
    pub const fn discarded(&self) -> usize {
        self.discarded
    }

    /// Returns true if nothing was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn payload() -> CompanyFacts {
        serde_json::from_value(json!({
            "cik": 320193,
            "entityName": "Apple Inc.",
            "facts": {
                "us-gaap": {
                    "NetIncomeLoss": {"units": {"USD": [
                        {"end": "2022-09-24", "val": 99803000000_i64, "form": "10-K"},
                        {"end": "2024-09-28", "val": 93736000000_i64, "form": "10-K"},
                        {"end": "2023-09-30", "val": 96995000000_i64, "form": "10-K"},
                        {"end": "not-a-date", "val": 1},
                        {"end": "2021-09-25", "val": "oops"}
                    ]}},
                    "EarningsPerShareBasic": {"units": {"USD/shares": [
                        {"end": "2024-09-28", "val": 6.11, "form": "10-K"}
                    ]}},
                    "OnlyMalformed": {"units": {"USD": [{"val": 3}]}}
                },
                "dei": {
                    "EntityCommonStockSharesOutstanding": {"units": {"shares": [
                        {"end": "2024-10-18", "val": 15115823000_i64}
                    ]}}
                },
                "srt": {
                    "Ignored": {"units": {"USD": [{"end": "2024-09-28", "val": 1}]}}
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_build_sorts_descending() {
        let index = FactIndex::build(&payload());
        let ends: Vec<_> = index
            .observations("NetIncomeLoss")
            .iter()
            .map(|o| o.period_end)
            .collect();
        assert_eq!(ends, [date(2024, 9, 28), date(2023, 9, 30), date(2022, 9, 24)]);
    }

    #[test]
    fn test_build_discards_individually() {
        let index = FactIndex::build(&payload());
        assert_eq!(index.discarded(), 3);
        assert!(index.contains("NetIncomeLoss"));
        assert!(!index.contains("OnlyMalformed"));
        assert_eq!(index.observation_count(), 5);
    }

    #[test]
    fn test_build_recognized_namespaces_only() {
        let index = FactIndex::build(&payload());
        assert!(index.contains("EntityCommonStockSharesOutstanding"));
        assert!(index.contains("EarningsPerShareBasic"));
        assert!(!index.contains("Ignored"));
        assert_eq!(index.concept_count(), 3);
        assert_eq!(index.observations("EarningsPerShareBasic")[0].unit, "USD/shares");
    }

    #[test]
    fn test_missing_concept_is_empty() {
        let index = FactIndex::build(&payload());
        assert!(index.observations("Revenues").is_empty());
        assert!(index.window("Revenues", date(2024, 9, 28), 5).is_empty());
        assert!(FactIndex::build(&CompanyFacts::default()).is_empty());
    }

    #[test]
    fn test_window_bounds_inclusive() {
        let index = FactIndex::build(&payload());
        let window = index.window("NetIncomeLoss", date(2024, 9, 23), 5);
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].period_end, date(2024, 9, 28));

        assert!(index.window("NetIncomeLoss", date(2024, 9, 22), 5).is_empty());

        let wide = index.window("NetIncomeLoss", date(2023, 9, 30), 400);
        assert_eq!(wide.len(), 3);
    }

    #[test]
    fn test_from_observations_groups_by_concept() {
        let index = FactIndex::from_observations(
            FactIndex::build(&payload())
                .observations("NetIncomeLoss")
                .iter()
                .rev()
                .cloned(),
        );
        assert_eq!(index.concept_count(), 1);
        assert_eq!(
            index.observations("NetIncomeLoss")[0].period_end,
            date(2024, 9, 28)
        );
    }
}
