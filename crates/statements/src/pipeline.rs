//! End-to-end extraction of one filing.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use statements_core::{
    Cik, CompanyFacts, FactSource, FactsCache, FormType, ParsedFiling, Result, StatementError,
};
use statements_engine::{ExtractionOptions, FilingExtractor, select_filing};

/// Default number of filing descriptors listed per request.
pub const DEFAULT_FILING_LIMIT: usize = 10;

/// Looks up a company, selects a filing and extracts its statements.
///
/// Company facts are served from the cache when one is configured; a cache
/// miss stores the fetched payload. Cache failures are logged and never fail
/// the extraction.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use statements::{EdgarClient, FormType, StatementPipeline};
///
/// let client = EdgarClient::new("MyApp/1.0 (contact@example.com)")?;
/// let pipeline = StatementPipeline::new(Arc::new(client));
/// let filing = pipeline.parse("AAPL", FormType::TenK, Some(2024)).await?;
/// ```
pub struct StatementPipeline {
    source: Arc<dyn FactSource>,
    cache: Option<Arc<dyn FactsCache>>,
    cache_ttl: Option<Duration>,
    options: ExtractionOptions,
    filing_limit: usize,
}

impl std::fmt::Debug for StatementPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatementPipeline")
            .field("source", &self.source.name())
            .field("cache", &self.cache.as_ref().map(|_| "configured"))
            .field("cache_ttl", &self.cache_ttl)
            .field("options", &self.options)
            .field("filing_limit", &self.filing_limit)
            .finish()
    }
}

impl StatementPipeline {
    /// Create a pipeline over a fact source, without caching.
    #[must_use]
    pub fn new(source: Arc<dyn FactSource>) -> Self {
        Self {
            source,
            cache: None,
            cache_ttl: None,
            options: ExtractionOptions::default(),
            filing_limit: DEFAULT_FILING_LIMIT,
        }
    }

    /// Cache company facts payloads.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn FactsCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Drop cached payloads older than `ttl` before each lookup.
    #[must_use]
    pub const fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Set the date matching tolerance.
    #[must_use]
    pub const fn with_tolerance_days(mut self, tolerance_days: u32) -> Self {
        self.options.tolerance_days = tolerance_days;
        self
    }

    /// Set how many filings are listed when selecting one.
    #[must_use]
    pub const fn with_filing_limit(mut self, limit: usize) -> Self {
        self.filing_limit = limit;
        self
    }

    /// Extract the statements of one filing.
    ///
    /// Without a fiscal year the most recent filing of the form is used.
    ///
    /// # Errors
    /// - [`StatementError::CompanyNotFound`] for an unknown ticker
    /// - [`StatementError::FilingNotFound`] if no filing matches
    /// - [`StatementError::NoFacts`] if the company has no usable facts
    /// - any retrieval error from the source
    pub async fn parse(
        &self,
        ticker: &str,
        form: FormType,
        fiscal_year: Option<i32>,
    ) -> Result<ParsedFiling> {
        info!(ticker, %form, ?fiscal_year, "Looking up company");
        let cik = self.source.lookup_cik(ticker).await?;
        debug!(%cik, "Found CIK");

        let filings = self.source.filings(&cik, form, self.filing_limit).await?;
        let mut descriptor = select_filing(&filings, ticker, form, fiscal_year)?.clone();
        if descriptor.ticker.is_none() {
            descriptor.ticker = Some(ticker.to_uppercase());
        }
        info!(accession = %descriptor.accession_number, "Processing filing");

        let facts = self.company_facts(&cik).await?;
        let extractor = FilingExtractor::new(&facts)
            .map_err(|e| match e {
                StatementError::NoFacts(_) => StatementError::NoFacts(cik.to_string()),
                other => other,
            })?
            .with_options(self.options);
        debug!(
            concepts = extractor.index().concept_count(),
            observations = extractor.index().observation_count(),
            discarded = extractor.index().discarded(),
            "Indexed company facts"
        );

        extractor.extract(&descriptor)
    }

    async fn company_facts(&self, cik: &Cik) -> Result<CompanyFacts> {
        if let Some(cache) = &self.cache {
            if let Some(ttl) = self.cache_ttl {
                if let Err(e) = cache.invalidate_stale(ttl).await {
                    warn!(error = %e, "Failed to invalidate stale cache entries");
                }
            }

            match cache.get_company_facts(cik).await {
                Ok(Some(facts)) => {
                    debug!(%cik, "Cache hit for company facts");
                    return Ok(facts);
                }
                Ok(None) => {}
                Err(e) => warn!(%cik, error = %e, "Cache lookup failed"),
            }
        }

        debug!(%cik, source = self.source.name(), "Fetching company facts");
        let facts = self.source.company_facts(cik).await?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put_company_facts(cik, &facts).await {
                warn!(%cik, error = %e, "Failed to cache company facts");
            }
        }
        Ok(facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use statements_cache::InMemoryCache;
    use statements_core::FilingDescriptor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[derive(Debug, Default)]
    struct StubSource {
        facts: CompanyFacts,
        filings: Vec<FilingDescriptor>,
        facts_requests: AtomicUsize,
    }

    impl StubSource {
        fn new() -> Self {
            let facts = CompanyFacts::from_json(
                r#"{"cik": 320193, "entityName": "Example Corp", "facts": {"us-gaap": {
                    "NetIncomeLoss": {"units": {"USD": [
                        {"start": "2023-10-01", "end": "2024-09-28", "val": 1000, "form": "10-K"},
                        {"start": "2022-10-02", "end": "2023-09-30", "val": 900, "form": "10-K"}
                    ]}},
                    "Assets": {"units": {"USD": [
                        {"end": "2024-09-28", "val": 8000, "form": "10-K"}
                    ]}}
                }}}"#,
            )
            .unwrap();

            let descriptor = |accession: &str, report_date| FilingDescriptor {
                cik: Cik::from_number(320_193),
                company_name: "EXAMPLE CORP".to_string(),
                ticker: None,
                form: FormType::TenK,
                accession_number: accession.to_string(),
                filing_date: None,
                report_date: Some(report_date),
                primary_document: None,
            };

            Self {
                facts,
                filings: vec![
                    descriptor("0000320193-24-000123", date(2024, 9, 28)),
                    descriptor("0000320193-23-000106", date(2023, 9, 30)),
                ],
                facts_requests: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl FactSource for StubSource {
        fn name(&self) -> &str {
            "stub"
        }

        async fn lookup_cik(&self, ticker: &str) -> Result<Cik> {
            if ticker.eq_ignore_ascii_case("EXMP") {
                Ok(Cik::from_number(320_193))
            } else {
                Err(StatementError::CompanyNotFound(ticker.to_string()))
            }
        }

        async fn company_facts(&self, _cik: &Cik) -> Result<CompanyFacts> {
            self.facts_requests.fetch_add(1, Ordering::SeqCst);
            Ok(self.facts.clone())
        }

        async fn filings(
            &self,
            _cik: &Cik,
            form: FormType,
            limit: usize,
        ) -> Result<Vec<FilingDescriptor>> {
            Ok(self
                .filings
                .iter()
                .filter(|f| f.form == form)
                .take(limit)
                .cloned()
                .collect())
        }
    }

    #[tokio::test]
    async fn test_parse_most_recent() {
        let pipeline = StatementPipeline::new(Arc::new(StubSource::new()));
        let filing = pipeline.parse("exmp", FormType::TenK, None).await.unwrap();

        assert_eq!(filing.metadata.company_name, "Example Corp");
        assert_eq!(filing.metadata.ticker.as_deref(), Some("EXMP"));
        assert_eq!(filing.metadata.cik.as_str(), "0000320193");
        assert_eq!(filing.metadata.fiscal_year, 2024);
        assert_eq!(filing.income_statement.value("net_income"), Some(1000.0));
        assert_eq!(filing.balance_sheet.value("total_assets"), Some(8000.0));
    }

    #[tokio::test]
    async fn test_parse_by_year() {
        let pipeline = StatementPipeline::new(Arc::new(StubSource::new()));
        let filing = pipeline
            .parse("EXMP", FormType::TenK, Some(2023))
            .await
            .unwrap();

        assert_eq!(filing.metadata.accession_number, "0000320193-23-000106");
        assert_eq!(filing.income_statement.value("net_income"), Some(900.0));
        assert!(filing.balance_sheet.is_empty());
    }

    #[tokio::test]
    async fn test_not_found_errors() {
        let pipeline = StatementPipeline::new(Arc::new(StubSource::new()));

        let err = pipeline.parse("NOPE", FormType::TenK, None).await.unwrap_err();
        assert!(matches!(err, StatementError::CompanyNotFound(_)));

        let err = pipeline
            .parse("EXMP", FormType::TenK, Some(2001))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StatementError::FilingNotFound { fiscal_year: Some(2001), .. }
        ));

        let err = pipeline.parse("EXMP", FormType::TenQ, None).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_no_facts() {
        let source = StubSource {
            facts: CompanyFacts::default(),
            ..StubSource::new()
        };
        let pipeline = StatementPipeline::new(Arc::new(source));

        match pipeline.parse("EXMP", FormType::TenK, None).await {
            Err(StatementError::NoFacts(cik)) => assert_eq!(cik, "0000320193"),
            other => panic!("expected NoFacts, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cache_skips_source() {
        let source = Arc::new(StubSource::new());
        let cache = Arc::new(InMemoryCache::new());
        let pipeline = StatementPipeline::new(source.clone())
            .with_cache(cache.clone())
            .with_cache_ttl(Duration::from_secs(3600));

        let first = pipeline.parse("EXMP", FormType::TenK, None).await.unwrap();
        let second = pipeline.parse("EXMP", FormType::TenK, None).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(source.facts_requests.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_tolerance_and_limit() {
        let pipeline = StatementPipeline::new(Arc::new(StubSource::new()))
            .with_tolerance_days(0)
            .with_filing_limit(1);

        // start derives to 2023-09-29, two days from the observed 2023-10-01
        let filing = pipeline.parse("EXMP", FormType::TenK, None).await.unwrap();
        assert!(!filing.income_statement.contains("net_income"));

        let err = pipeline
            .parse("EXMP", FormType::TenK, Some(2023))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
