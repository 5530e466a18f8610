//! Statement to `DataFrame` conversion.

use polars::prelude::*;
use statements_core::{FinancialStatement, Result, SegmentData, StatementError};
use statements_engine::{ScaleClass, item_export_value};

fn export_error(e: PolarsError) -> StatementError {
    StatementError::Export(e.to_string())
}

/// One row per resolved line item, in presentation order.
///
/// # Errors
/// Returns [`StatementError::Export`] if the frame cannot be built.
pub fn statement_frame(statement: &FinancialStatement) -> Result<DataFrame> {
    let items: Vec<_> = statement.iter().collect();

    DataFrame::new(vec![
        Column::new(
            "key".into(),
            items.iter().map(|i| i.key.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "label".into(),
            items.iter().map(|i| i.label.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "concept".into(),
            items.iter().map(|i| i.concept.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "value".into(),
            items
                .iter()
                .map(|i| item_export_value(i))
                .collect::<Vec<f64>>(),
        ),
        Column::new(
            "raw_value".into(),
            items.iter().map(|i| i.value).collect::<Vec<f64>>(),
        ),
        Column::new(
            "accession".into(),
            items
                .iter()
                .map(|i| i.accession.as_deref())
                .collect::<Vec<Option<&str>>>(),
        ),
    ])
    .map_err(export_error)
}

/// One row per segment, business segments first. Amounts are in thousands.
///
/// # Errors
/// Returns [`StatementError::Export`] if the frame cannot be built.
pub fn segments_frame(segments: Option<&SegmentData>) -> Result<DataFrame> {
    let rows: Vec<_> = segments.into_iter().flat_map(SegmentData::segments).collect();
    let scale = |v: Option<f64>| v.map(|v| v / ScaleClass::Monetary.divisor());

    DataFrame::new(vec![
        Column::new(
            "segment".into(),
            rows.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "segment_type".into(),
            rows.iter()
                .map(|s| s.segment_type.as_str())
                .collect::<Vec<_>>(),
        ),
        Column::new(
            "revenue".into(),
            rows.iter().map(|s| scale(s.revenue)).collect::<Vec<_>>(),
        ),
        Column::new(
            "operating_income".into(),
            rows.iter()
                .map(|s| scale(s.operating_income))
                .collect::<Vec<_>>(),
        ),
        Column::new(
            "assets".into(),
            rows.iter().map(|s| scale(s.assets)).collect::<Vec<_>>(),
        ),
    ])
    .map_err(export_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use statements_core::{LineItem, Segment, SegmentType, StatementKind};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(key: &str, value: f64, negated: bool) -> LineItem {
        LineItem {
            key: key.to_string(),
            label: key.to_string(),
            concept: "Concept".to_string(),
            value,
            period_end: date(2024, 9, 28),
            period_start: Some(date(2023, 9, 29)),
            negated,
            accession: (!negated).then(|| "0000320193-24-000123".to_string()),
        }
    }

    #[test]
    fn test_statement_frame() {
        let mut statement = FinancialStatement::new(
            StatementKind::IncomeStatement,
            date(2024, 9, 28),
            Some(date(2023, 9, 29)),
            2024,
            "FY",
        );
        statement.insert(item("revenue", 391_035_000_000.0, false));
        statement.insert(item("cost_of_revenue", 500.0, true));
        statement.insert(item("eps_diluted", 6.08, false));
        statement.insert(item("shares_diluted", 15_408_095_000.0, false));

        let df = statement_frame(&statement).unwrap();
        assert_eq!(df.height(), 4);
        assert_eq!(
            df.get_column_names_str(),
            ["key", "label", "concept", "value", "raw_value", "accession"]
        );

        let keys = df.column("key").unwrap().str().unwrap();
        assert_eq!(keys.get(0), Some("revenue"));
        assert_eq!(keys.get(3), Some("shares_diluted"));

        let values = df.column("value").unwrap().f64().unwrap();
        assert_eq!(values.get(0), Some(391_035_000.0));
        assert_eq!(values.get(1), Some(-0.5));
        assert_eq!(values.get(2), Some(6.08));
        assert_eq!(values.get(3), Some(15_408_095.0));

        let raw = df.column("raw_value").unwrap().f64().unwrap();
        assert_eq!(raw.get(1), Some(500.0));

        let accession = df.column("accession").unwrap().str().unwrap();
        assert_eq!(accession.get(1), None);
    }

    #[test]
    fn test_empty_statement_frame() {
        let statement =
            FinancialStatement::new(StatementKind::BalanceSheet, date(2024, 9, 28), None, 2024, "FY");
        let df = statement_frame(&statement).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 6);
    }

    #[test]
    fn test_segments_frame() {
        let mut segments = SegmentData::empty(date(2024, 9, 28), 2024, "FY");
        assert_eq!(segments_frame(Some(&segments)).unwrap().height(), 0);
        assert_eq!(segments_frame(None).unwrap().width(), 5);

        segments.geographic_segments.push(Segment {
            name: "Americas".to_string(),
            segment_type: SegmentType::Geographic,
            revenue: Some(167_045_000_000.0),
            operating_income: None,
            assets: None,
        });
        let df = segments_frame(Some(&segments)).unwrap();
        assert_eq!(df.height(), 1);
        let revenue = df.column("revenue").unwrap().f64().unwrap();
        assert_eq!(revenue.get(0), Some(167_045_000.0));
    }
}
