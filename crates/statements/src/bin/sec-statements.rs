//! Extract financial statements from SEC EDGAR filings.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use statements::{
    AMOUNTS_NOTE, EdgarClient, ExportFormat, Exporter, FinancialStatement, FormType, ParsedFiling,
    Result, SqliteCache, StatementPipeline, export_values,
};
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_USER_AGENT: &str = "sec-statements/0.1 (contact@example.com)";

#[derive(Parser, Debug)]
#[command(name = "sec-statements")]
#[command(about = "Extract financial statements from SEC EDGAR 10-K and 10-Q filings")]
#[command(version)]
struct Args {
    /// Stock ticker symbol (e.g. AAPL)
    ticker: String,

    /// Form type (10-K or 10-Q)
    #[arg(short, long, default_value = "10-K")]
    form: FormType,

    /// Fiscal year; the most recent filing when omitted
    #[arg(short, long)]
    year: Option<i32>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Table format (csv or parquet)
    #[arg(long, default_value = "csv")]
    format: ExportFormat,

    /// SQLite file caching company facts between runs
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Refetch cached company facts older than this
    #[arg(long, default_value = "24")]
    cache_ttl_hours: u64,

    /// Date matching tolerance in days
    #[arg(long, default_value = "5")]
    tolerance_days: u32,

    /// User agent identifying you to the SEC
    #[arg(long, env = "SEC_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error); overrides --verbose
    #[arg(long)]
    log_level: Option<Level>,
}

impl Args {
    fn log_level(&self) -> Level {
        match self.log_level {
            Some(level) => level,
            None if self.verbose => Level::DEBUG,
            None => Level::INFO,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_not_found() => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, "Extraction failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let client = EdgarClient::new(&args.user_agent)?;
    let mut pipeline =
        StatementPipeline::new(Arc::new(client)).with_tolerance_days(args.tolerance_days);

    if let Some(path) = &args.cache {
        info!(path = %path.display(), "Using company facts cache");
        let ttl = Duration::from_secs(args.cache_ttl_hours.saturating_mul(3600));
        pipeline = pipeline
            .with_cache(Arc::new(SqliteCache::new(path)?))
            .with_cache_ttl(ttl);
    }

    let filing = pipeline.parse(&args.ticker, args.form, args.year).await?;
    print_summary(&filing);

    let dir = Exporter::new(&args.output)
        .with_format(args.format)
        .export(&filing)?;
    println!("Saved to {}", dir.display());
    Ok(())
}

fn print_summary(filing: &ParsedFiling) {
    let metadata = &filing.metadata;
    println!("{} ({})", metadata.company_name, metadata.cik);
    println!(
        "{} {} {} ending {}",
        metadata.form, metadata.fiscal_period, metadata.fiscal_year, metadata.period_end
    );
    println!("{AMOUNTS_NOTE}");

    for statement in filing.statements() {
        println!();
        println!("{} ({} items)", statement.kind.title(), statement.len());
        for row in statement_rows(statement) {
            println!("{row}");
        }
    }
    println!();
}

/// One line per item, amounts in thousands.
fn statement_rows(statement: &FinancialStatement) -> Vec<String> {
    statement
        .iter()
        .zip(export_values(statement))
        .map(|(item, (_, value))| format!("  {:<45} {:>20.2}", item.label, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use statements::{LineItem, StatementKind};

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["sec-statements", "AAPL"]).unwrap();
        assert_eq!(args.ticker, "AAPL");
        assert_eq!(args.form, FormType::TenK);
        assert_eq!(args.format, ExportFormat::Csv);
        assert_eq!(args.output, PathBuf::from("."));
        assert_eq!(args.cache_ttl_hours, 24);
        assert_eq!(args.tolerance_days, 5);
        assert_eq!(args.year, None);
        assert_eq!(args.log_level(), Level::INFO);
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "sec-statements",
            "MSFT",
            "-f",
            "10-Q",
            "-y",
            "2023",
            "-o",
            "out",
            "--format",
            "parquet",
            "--cache",
            "facts.db",
            "-v",
        ])
        .unwrap();
        assert_eq!(args.form, FormType::TenQ);
        assert_eq!(args.year, Some(2023));
        assert_eq!(args.format, ExportFormat::Parquet);
        assert_eq!(args.cache, Some(PathBuf::from("facts.db")));
        assert_eq!(args.log_level(), Level::DEBUG);
    }

    #[test]
    fn test_rejects_unknown_form() {
        assert!(Args::try_parse_from(["sec-statements", "AAPL", "--form", "8-K"]).is_err());
    }

    #[test]
    fn test_log_level_ignores_case() {
        let args =
            Args::try_parse_from(["sec-statements", "AAPL", "--log-level", "DEBUG"]).unwrap();
        assert_eq!(args.log_level(), Level::DEBUG);

        let args = Args::try_parse_from(["sec-statements", "AAPL", "-v", "--log-level", "Warn"])
            .unwrap();
        assert_eq!(args.log_level(), Level::WARN);
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        assert!(Args::try_parse_from(["sec-statements", "AAPL", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn test_summary_rows_in_thousands() {
        let end = NaiveDate::from_ymd_opt(2024, 9, 28).unwrap();
        let mut statement =
            FinancialStatement::new(StatementKind::IncomeStatement, end, None, 2024, "FY");
        for (key, label, value, negated) in [
            ("revenue", "Revenue", 12_345_000.0, false),
            ("cost_of_revenue", "Cost of Revenue", 500_000.0, true),
            ("eps_diluted", "EPS (Diluted)", 3.21, false),
        ] {
            statement.insert(LineItem {
                key: key.to_string(),
                label: label.to_string(),
                concept: "Concept".to_string(),
                value,
                period_end: end,
                period_start: None,
                negated,
                accession: None,
            });
        }

        let rows = statement_rows(&statement);
        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with("  Revenue"));
        assert!(rows[0].ends_with(" 12345.00"));
        assert!(rows[1].ends_with(" -500.00"));
        assert!(rows[2].ends_with(" 3.21"));
    }
}
