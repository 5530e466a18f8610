//! Writing statements to disk.

use polars::prelude::*;
use statements_core::{ParsedFiling, Result, StatementError};
use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

use crate::frame::{segments_frame, statement_frame};

/// Sheet name of the segment table.
pub const SEGMENTS_SHEET: &str = "Segments";

/// File holding the complete parsed filing.
pub const FILING_JSON: &str = "filing.json";

/// Table file format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Comma separated values with a header row.
    #[default]
    Csv,
    /// Apache Parquet.
    Parquet,
}

impl ExportFormat {
    /// File extension, without the dot.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = StatementError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "parquet" => Ok(Self::Parquet),
            _ => Err(StatementError::InvalidParameter(format!(
                "Unknown export format: {s} (expected csv or parquet)"
            ))),
        }
    }
}

/// Writes parsed filings as one table per sheet.
#[derive(Clone, Debug)]
pub struct Exporter {
    output_dir: PathBuf,
    format: ExportFormat,
}

impl Exporter {
    /// Export under `output_dir` as CSV.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            format: ExportFormat::default(),
        }
    }

    /// Set the table format.
    #[must_use]
    pub const fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// The configured table format.
    #[must_use]
    pub const fn format(&self) -> ExportFormat {
        self.format
    }

    /// Directory a filing is written to: `<output>/<TICKER>_<FORM>_<FY>`.
    ///
    /// The CIK stands in for a missing ticker.
    #[must_use]
    pub fn filing_dir(&self, filing: &ParsedFiling) -> PathBuf {
        let metadata = &filing.metadata;
        let ticker = metadata
            .ticker
            .as_deref()
            .map_or_else(|| metadata.cik.to_string(), str::to_uppercase);
        self.output_dir.join(format!(
            "{ticker}_{}_{}",
            metadata.form, metadata.fiscal_year
        ))
    }

    /// Write every sheet and the filing JSON. Returns the filing directory.
    ///
    /// # Errors
    /// Returns [`StatementError::Export`] if a directory or file cannot be
    /// written.
    pub fn export(&self, filing: &ParsedFiling) -> Result<PathBuf> {
        let dir = self.filing_dir(filing);
        fs::create_dir_all(&dir).map_err(|e| {
            StatementError::Export(format!("Failed to create {}: {e}", dir.display()))
        })?;

        for statement in filing.statements() {
            let mut df = statement_frame(statement)?;
            self.write_table(&dir, statement.kind.sheet_name(), &mut df)?;
        }

        let mut segments = segments_frame(filing.segments.as_ref())?;
        self.write_table(&dir, SEGMENTS_SHEET, &mut segments)?;

        let json = serde_json::to_string_pretty(filing)
            .map_err(|e| StatementError::Export(format!("Failed to serialize filing: {e}")))?;
        let path = dir.join(FILING_JSON);
        fs::write(&path, json).map_err(|e| {
            StatementError::Export(format!("Failed to write {}: {e}", path.display()))
        })?;

        info!(path = %dir.display(), format = %self.format, "Exported filing");
        Ok(dir)
    }

    fn write_table(&self, dir: &Path, sheet: &str, df: &mut DataFrame) -> Result<()> {
        let path = dir.join(format!("{sheet}.{}", self.format.extension()));
        let export_error =
            |e: String| StatementError::Export(format!("Failed to write {}: {e}", path.display()));

        let mut file = File::create(&path).map_err(|e| export_error(e.to_string()))?;
        match self.format {
            ExportFormat::Csv => CsvWriter::new(&mut file)
                .include_header(true)
                .finish(df)
                .map_err(|e| export_error(e.to_string()))?,
            ExportFormat::Parquet => {
                ParquetWriter::new(&mut file)
                    .finish(df)
                    .map_err(|e| export_error(e.to_string()))?;
            }
        }

        debug!(path = %path.display(), rows = df.height(), "Wrote table");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use statements_core::{
        Cik, FilingMetadata, FinancialStatement, FormType, LineItem, SegmentData, StatementKind,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn statement(kind: StatementKind) -> FinancialStatement {
        let start = kind.is_duration().then(|| date(2023, 9, 29));
        FinancialStatement::new(kind, date(2024, 9, 28), start, 2024, "FY")
    }

    fn filing(ticker: Option<&str>) -> ParsedFiling {
        let mut income_statement = statement(StatementKind::IncomeStatement);
        income_statement.insert(LineItem {
            key: "cost_of_revenue".to_string(),
            label: "Cost of Revenue".to_string(),
            concept: "CostOfRevenue".to_string(),
            value: 500.0,
            period_end: date(2024, 9, 28),
            period_start: Some(date(2023, 9, 29)),
            negated: true,
            accession: None,
        });

        ParsedFiling {
            metadata: FilingMetadata {
                cik: Cik::from_number(320_193),
                company_name: "Example Corp".to_string(),
                ticker: ticker.map(str::to_string),
                form: FormType::TenK,
                filing_date: Some(date(2024, 11, 1)),
                period_end: date(2024, 9, 28),
                fiscal_year: 2024,
                fiscal_period: "FY".to_string(),
                accession_number: "0000320193-24-000123".to_string(),
            },
            income_statement,
            balance_sheet: statement(StatementKind::BalanceSheet),
            cash_flow: statement(StatementKind::CashFlow),
            segments: Some(SegmentData::empty(date(2024, 9, 28), 2024, "FY")),
        }
    }

    #[test]
    fn test_export_format_parsing() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(
            "Parquet".parse::<ExportFormat>().unwrap(),
            ExportFormat::Parquet
        );
        assert!("xlsx".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Parquet.to_string(), "parquet");
    }

    #[test]
    fn test_filing_dir() {
        let exporter = Exporter::new("/out");
        assert_eq!(
            exporter.filing_dir(&filing(Some("exmp"))),
            PathBuf::from("/out/EXMP_10-K_2024")
        );
        assert_eq!(
            exporter.filing_dir(&filing(None)),
            PathBuf::from("/out/0000320193_10-K_2024")
        );
    }

    #[test]
    fn test_export_csv() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = Exporter::new(tmp.path())
            .export(&filing(Some("EXMP")))
            .unwrap();

        for sheet in ["Income Statement", "Balance Sheet", "Cash Flow", "Segments"] {
            assert!(dir.join(format!("{sheet}.csv")).is_file(), "missing {sheet}");
        }

        let income = fs::read_to_string(dir.join("Income Statement.csv")).unwrap();
        let mut lines = income.lines();
        assert_eq!(
            lines.next(),
            Some("key,label,concept,value,raw_value,accession")
        );
        assert!(lines.next().unwrap().starts_with("cost_of_revenue,Cost of Revenue,CostOfRevenue,-0.5,"));

        let json = fs::read_to_string(dir.join(FILING_JSON)).unwrap();
        let parsed: ParsedFiling = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, filing(Some("EXMP")));
    }

    #[test]
    fn test_export_parquet() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = Exporter::new(tmp.path())
            .with_format(ExportFormat::Parquet)
            .export(&filing(Some("EXMP")))
            .unwrap();

        let file = File::open(dir.join("Income Statement.parquet")).unwrap();
        let df = ParquetReader::new(file).finish().unwrap();
        assert_eq!(df.height(), 1);
        let values = df.column("value").unwrap().f64().unwrap();
        assert_eq!(values.get(0), Some(-0.5));
    }
}
