//! Dataset retrieval and CSV parsing.

use chrono::NaiveDate;
use covidash_common::{DashError, RawRecord, RawTable, Result};
use covidash_config::{validate_source_url, SourceConfig};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};
use url::Url;

/// Columns the county dataset must provide.
pub const REQUIRED_COLUMNS: [&str; 6] = ["date", "county", "state", "fips", "cases", "deaths"];

/// Date format of the `date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Client for the CSV source: one request per call, no cache, no retry.
pub struct DataFetcher {
    client: reqwest::Client,
    url: Url,
}

impl DataFetcher {
    /// Creates a new data fetcher.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let url = validate_source_url(&config.url)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| DashError::config_with_source("Failed to build HTTP client", e))?;

        Ok(Self { client, url })
    }

    /// Source location.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetches the raw CSV text.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch_text(&self) -> Result<String> {
        match self.url.scheme() {
            "http" | "https" => self.fetch_http().await,
            "file" => self.fetch_file().await,
            other => Err(DashError::retrieval(
                self.url.as_str(),
                format!("unsupported scheme '{other}'"),
            )),
        }
    }

    /// Fetches and parses the dataset.
    pub async fn fetch_records(&self) -> Result<RawTable> {
        let started = Instant::now();
        let text = self.fetch_text().await?;
        debug!(bytes = text.len(), "payload received");

        let table = parse_records(&text)?;
        info!(
            rows = table.len(),
            latest = ?table.latest_date(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dataset loaded"
        );
        Ok(table)
    }

    async fn fetch_http(&self) -> Result<String> {
        let response = self.client.get(self.url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashError::retrieval(
                self.url.as_str(),
                format!("HTTP status {status}"),
            ));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await?;

        ensure_tabular(self.url.as_str(), content_type.as_deref(), &body)?;
        Ok(body)
    }

    async fn fetch_file(&self) -> Result<String> {
        let path = self
            .url
            .to_file_path()
            .map_err(|()| DashError::retrieval(self.url.as_str(), "not a local file path"))?;

        let body = tokio::fs::read_to_string(&path).await.map_err(|e| {
            DashError::retrieval_with_source(
                self.url.as_str(),
                format!("failed to read {}", path.display()),
                e,
            )
        })?;

        ensure_tabular(self.url.as_str(), None, &body)?;
        Ok(body)
    }
}

/// Rejects payloads that cannot be a CSV table.
pub fn ensure_tabular(url: &str, content_type: Option<&str>, body: &str) -> Result<()> {
    if let Some(content_type) = content_type {
        if content_type.to_ascii_lowercase().starts_with("text/html") {
            return Err(DashError::retrieval(
                url,
                format!("non-tabular payload ({content_type})"),
            ));
        }
    }

    if body.trim().is_empty() {
        return Err(DashError::retrieval(url, "non-tabular payload (empty body)"));
    }

    Ok(())
}

/// Parses the county CSV into records.
///
/// Columns are matched by header name, so order and extra columns do not
/// matter. Blank counts read as zero and a blank FIPS code as `None`.
pub fn parse_records(text: &str) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let index = ColumnIndex::resolve(reader.headers()?)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let line = row.position().map_or(0, csv::Position::line);
        records.push(index.record(&row, line)?);
    }

    Ok(RawTable::new(records))
}

/// Positions of the required columns in the header.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    date: usize,
    county: usize,
    state: usize,
    fips: usize,
    cases: usize,
    deaths: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}') == name)
                .ok_or_else(|| DashError::schema(name, RawTable::TABLE_NAME))
        };

        Ok(Self {
            date: find("date")?,
            county: find("county")?,
            state: find("state")?,
            fips: find("fips")?,
            cases: find("cases")?,
            deaths: find("deaths")?,
        })
    }

    fn record(&self, row: &csv::StringRecord, line: u64) -> Result<RawRecord> {
        let field = |i: usize| row.get(i).unwrap_or("");

        let date_text = field(self.date);
        let date = NaiveDate::parse_from_str(date_text, DATE_FORMAT).map_err(|e| {
            DashError::parse_with_source(Some(line), format!("invalid date '{date_text}'"), e)
        })?;

        let fips = Some(field(self.fips))
            .filter(|f| !f.is_empty())
            .map(str::to_string);

        Ok(RawRecord {
            date,
            county: field(self.county).to_string(),
            state: field(self.state).to_string(),
            fips,
            cases: parse_count(field(self.cases), "cases", line)?,
            deaths: parse_count(field(self.deaths), "deaths", line)?,
        })
    }
}

fn parse_count(text: &str, column: &str, line: u64) -> Result<u64> {
    if text.is_empty() {
        return Ok(0);
    }
    text.parse().map_err(|e| {
        DashError::parse_with_source(Some(line), format!("invalid {column} count '{text}'"), e)
    })
}
