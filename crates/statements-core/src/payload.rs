//! Raw SEC company facts payload.
//!
//! These types mirror the JSON served at
//! `https://data.sec.gov/api/xbrl/companyfacts/CIK##########.json`. They are
//! deliberately lenient: a field holding the wrong JSON type deserializes as
//! absent, and a namespace, concept or unit entry that is not an object is
//! dropped, so one bad entry never fails the whole payload. Turning a [`RawObservation`]
//! into a typed [`Observation`](crate::types::Observation) is a separate,
//! validating step.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use crate::error::{Result, StatementError};

/// Namespace holding general accounting concepts.
pub const US_GAAP: &str = "us-gaap";

/// Namespace holding entity-identifying concepts (shares outstanding, etc.).
pub const DEI: &str = "dei";

/// Namespaces indexed for statement extraction, in indexing order.
pub const RECOGNIZED_NAMESPACES: [&str; 2] = [US_GAAP, DEI];

/// Response from the SEC EDGAR company facts API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyFacts {
    /// CIK number.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub cik: Option<u64>,
    /// Entity name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub entity_name: Option<String>,
    /// Facts organized by namespace and concept name.
    #[serde(default, deserialize_with = "lenient_facts")]
    pub facts: HashMap<String, HashMap<String, ConceptFacts>>,
}

impl CompanyFacts {
    /// Parse a company facts payload from JSON text.
    ///
    /// # Errors
    /// Returns [`StatementError::Parse`] if the text is not a JSON object of
    /// the expected shape.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| StatementError::Parse(format!("Failed to parse company facts: {e}")))
    }

    /// Returns the concepts of one namespace, if present.
    #[must_use]
    pub fn namespace(&self, namespace: &str) -> Option<&HashMap<String, ConceptFacts>> {
        self.facts.get(namespace)
    }

    /// Total number of raw observations across the recognized namespaces.
    #[must_use]
    pub fn observation_count(&self) -> usize {
        RECOGNIZED_NAMESPACES
            .iter()
            .filter_map(|ns| self.namespace(ns))
            .flat_map(HashMap::values)
            .flat_map(|concept| concept.units.values())
            .map(Vec::len)
            .sum()
    }
}

/// Facts for a single concept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConceptFacts {
    /// Label.
    #[serde(default, deserialize_with = "lenient_string")]
    pub label: Option<String>,
    /// Description.
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    /// Observations keyed by unit (USD, shares, USD/shares, ...).
    ///
    /// Ordered by unit name so that iteration is deterministic.
    #[serde(default, deserialize_with = "lenient_units")]
    pub units: BTreeMap<String, Vec<RawObservation>>,
}

/// A single observation as disclosed, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    /// Period start date (absent for instant facts).
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub start: Option<String>,
    /// Period end date.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub end: Option<String>,
    /// Value, kept as raw JSON until validated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub val: Option<Value>,
    /// Accession number of the source filing.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub accn: Option<String>,
    /// Fiscal year.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_i32")]
    pub fy: Option<i32>,
    /// Fiscal period (FY, Q1, Q2, Q3, Q4).
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub fp: Option<String>,
    /// Form type.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub form: Option<String>,
    /// Filed date.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub filed: Option<String>,
    /// Calendar frame (e.g. CY2024Q3I).
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
    pub frame: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_i32<'de, D>(deserializer: D) -> std::result::Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_u64<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_facts<'de, D>(
    deserializer: D,
) -> std::result::Result<HashMap<String, HashMap<String, ConceptFacts>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(map) = Value::deserialize(deserializer)? else {
        return Ok(HashMap::new());
    };

    let mut facts = HashMap::new();
    for (namespace, concepts) in map {
        let Value::Object(concepts) = concepts else {
            continue;
        };
        let concepts = concepts
            .into_iter()
            .filter(|(_, entry)| entry.is_object())
            .filter_map(|(name, entry)| Some((name, ConceptFacts::deserialize(entry).ok()?)))
            .collect();
        facts.insert(namespace, concepts);
    }
    Ok(facts)
}

fn lenient_units<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, Vec<RawObservation>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(map) = Value::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };

    let mut units = BTreeMap::new();
    for (unit, entries) in map {
        let Value::Array(entries) = entries else {
            continue;
        };
        let observations = entries
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|entry| RawObservation::deserialize(entry).ok())
            .collect();
        units.insert(unit, observations);
    }
    Ok(units)
}
