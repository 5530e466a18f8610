#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/statements/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! SEC EDGAR client.
//!
//! This crate provides:
//!
//! - CIK (Central Index Key) lookup from ticker symbols
//! - Company facts from the EDGAR XBRL API
//! - Filing lists from the EDGAR submissions API

use async_trait::async_trait;
use serde::Deserialize;
use statements_core::{
    Cik, CompanyFacts, FactSource, FilingDescriptor, FormType, Result, StatementError,
    types::parse_date,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

/// SEC EDGAR API base URL
const EDGAR_BASE_URL: &str = "https://data.sec.gov";

/// SEC company tickers URL
const COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// Default rate limit: 10 requests per second (SEC requirement)
const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(100);

/// Request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const PROVIDER_NAME: &str = "SEC EDGAR";

/// Rate limiter to ensure we don't exceed SEC's rate limits
#[derive(Debug)]
struct RateLimiter {
    last_request: Option<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    const fn new(min_interval: Duration) -> Self {
        Self {
            last_request: None,
            min_interval,
        }
    }

    async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}

/// SEC EDGAR client.
///
/// Serializes requests through a shared rate limiter (max 10 requests/second
/// by default). Cloning shares the limiter.
#[derive(Debug, Clone)]
pub struct EdgarClient {
    client: reqwest::Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    user_agent: String,
}

impl EdgarClient {
    /// Create a new EDGAR client with the specified user agent.
    ///
    /// The SEC requires identifying user agent headers. Format should be:
    /// "AppName/Version (contact@email.com)"
    ///
    /// # Errors
    /// Returns [`StatementError::InvalidParameter`] for an empty user agent
    /// and [`StatementError::Network`] if the HTTP client cannot be built.
    pub fn new(user_agent: &str) -> Result<Self> {
        if user_agent.trim().is_empty() {
            return Err(StatementError::InvalidParameter(
                "Empty user agent".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StatementError::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(client, user_agent))
    }

    /// Create a new EDGAR client with a custom HTTP client.
    ///
    /// The client is expected to already send `user_agent`.
    pub fn with_client(client: reqwest::Client, user_agent: &str) -> Self {
        Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(DEFAULT_RATE_LIMIT))),
            user_agent: user_agent.to_string(),
        }
    }

    /// Set the minimum delay between requests.
    #[must_use]
    pub fn with_rate_limit(mut self, min_interval: Duration) -> Self {
        self.rate_limiter = Arc::new(Mutex::new(RateLimiter::new(min_interval)));
        self
    }

    /// The user agent sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Rate limited GET. Maps HTTP 429 to [`StatementError::RateLimited`];
    /// other statuses are left to the caller.
    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        self.rate_limiter.lock().await.wait().await;

        debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StatementError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            warn!(url, ?retry_after, "Rate limited by SEC EDGAR");
            return Err(StatementError::RateLimited {
                provider: PROVIDER_NAME.to_string(),
                retry_after,
            });
        }

        Ok(response)
    }

    /// Fetch company submissions/filings metadata.
    async fn fetch_company_submissions(&self, cik: &Cik) -> Result<CompanySubmissions> {
        let url = format!("{EDGAR_BASE_URL}/submissions/CIK{cik}.json");
        let response = self.get(&url).await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StatementError::CompanyNotFound(cik.to_string()));
        }
        if !response.status().is_success() {
            return Err(StatementError::Network(format!(
                "Failed to fetch submissions for CIK {cik}: HTTP {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| StatementError::Parse(format!("Failed to parse submissions: {e}")))
    }
}

#[async_trait]
impl FactSource for EdgarClient {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn lookup_cik(&self, ticker: &str) -> Result<Cik> {
        if ticker.trim().is_empty() {
            return Err(StatementError::InvalidParameter("Empty ticker".to_string()));
        }

        debug!("Fetching company tickers from SEC");
        let response = self.get(COMPANY_TICKERS_URL).await?;
        if !response.status().is_success() {
            return Err(StatementError::Network(format!(
                "Failed to fetch company tickers: HTTP {}",
                response.status()
            )));
        }

        let data: HashMap<String, CompanyTickerInfo> = response.json().await.map_err(|e| {
            StatementError::Parse(format!("Failed to parse company tickers: {e}"))
        })?;

        let cik = find_cik(&data, ticker)
            .ok_or_else(|| StatementError::CompanyNotFound(ticker.to_string()))?;
        debug!(%cik, ticker, "Found CIK");
        Ok(cik)
    }

    async fn company_facts(&self, cik: &Cik) -> Result<CompanyFacts> {
        let url = format!("{EDGAR_BASE_URL}/api/xbrl/companyfacts/CIK{cik}.json");
        let response = self.get(&url).await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StatementError::NoFacts(cik.to_string()));
        }
        if !response.status().is_success() {
            return Err(StatementError::Network(format!(
                "Failed to fetch company facts for CIK {cik}: HTTP {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| StatementError::Network(e.to_string()))?;
        let facts = CompanyFacts::from_json(&body)?;
        debug!(
            %cik,
            observations = facts.observation_count(),
            "Fetched company facts"
        );
        Ok(facts)
    }

    async fn filings(
        &self,
        cik: &Cik,
        form: FormType,
        limit: usize,
    ) -> Result<Vec<FilingDescriptor>> {
        let submissions = self.fetch_company_submissions(cik).await?;
        let filings = filing_descriptors(&submissions, cik, form, limit);
        debug!(%cik, %form, count = filings.len(), "Listed filings");
        Ok(filings)
    }
}

// =============================================================================
// Response Mapping
// =============================================================================

/// Find the CIK registered for a ticker (case-insensitive).
fn find_cik(tickers: &HashMap<String, CompanyTickerInfo>, ticker: &str) -> Option<Cik> {
    let ticker = ticker.trim();
    tickers
        .values()
        .find(|company| company.ticker.eq_ignore_ascii_case(ticker))
        .map(|company| Cik::from_number(company.cik_str))
}

/// Map the column arrays of `filings.recent` to descriptors of one form type.
///
/// Rows are kept in the order EDGAR lists them (most recent first). Amended
/// forms (`10-K/A`) do not match. Rows without an accession number are
/// skipped.
fn filing_descriptors(
    submissions: &CompanySubmissions,
    cik: &Cik,
    form: FormType,
    limit: usize,
) -> Vec<FilingDescriptor> {
    let recent = &submissions.filings.recent;
    let ticker = submissions.tickers.first().cloned();

    recent
        .form
        .iter()
        .enumerate()
        .filter(|(_, f)| f.as_str() == form.as_str())
        .filter_map(|(i, _)| {
            let accession_number = column(&recent.accession_number, i)?;
            Some(FilingDescriptor {
                cik: cik.clone(),
                company_name: submissions.name.clone(),
                ticker: ticker.clone(),
                form,
                accession_number: accession_number.to_string(),
                filing_date: column(&recent.filing_date, i).and_then(parse_date),
                report_date: column(&recent.report_date, i).and_then(parse_date),
                primary_document: column(&recent.primary_document, i).map(str::to_string),
            })
        })
        .take(limit)
        .collect()
}

/// One cell of a column array; empty strings count as missing.
fn column(values: &[String], i: usize) -> Option<&str> {
    values.get(i).map(String::as_str).filter(|s| !s.is_empty())
}

// =============================================================================
// SEC API Response Types
// =============================================================================

/// Company ticker information from SEC JSON.
#[derive(Debug, Deserialize)]
struct CompanyTickerInfo {
    /// CIK as a number (SEC returns this as an integer)
    cik_str: u64,
    /// Ticker symbol
    ticker: String,
}

/// Company submissions/filings metadata.
#[derive(Debug, Default, Deserialize)]
struct CompanySubmissions {
    /// Company name
    #[serde(default)]
    name: String,
    /// Tickers, primary first
    #[serde(default)]
    tickers: Vec<String>,
    #[serde(default)]
    filings: SubmissionFilings,
}

#[derive(Debug, Default, Deserialize)]
struct SubmissionFilings {
    #[serde(default)]
    recent: RecentFilings,
}

/// Recent filings as parallel column arrays.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecentFilings {
    #[serde(default)]
    form: Vec<String>,
    #[serde(default)]
    accession_number: Vec<String>,
    #[serde(default)]
    filing_date: Vec<String>,
    #[serde(default)]
    report_date: Vec<String>,
    #[serde(default)]
    primary_document: Vec<String>,
}

// =============================================================================
// Tests
// =============================================================================
