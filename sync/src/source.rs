//! Places a complete roster can be fetched from.

use std::time::Duration;

use async_trait::async_trait;
use roster_backend_client::{ApiError, BackendClient};
use roster_core::parser::{self, ParseError};
use roster_core::{Roster, RosterFragment, merge};
use tracing::{info, warn};

/// Errors from fetching or assembling a roster.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network request failed.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend rejected or failed the request.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// A fetched export could not be parsed.
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// Nothing is configured to fetch from.
    #[error("no roster sources configured")]
    NoSources,
}

/// A source that can produce a full roster on demand.
#[async_trait]
pub trait RosterSource: Send + Sync {
    /// Short name for log lines.
    fn name(&self) -> &str;

    /// Fetches and assembles a complete roster.
    async fn fetch(&self) -> Result<Roster, SourceError>;
}

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches published spreadsheet CSV exports, one fragment per URL, and
/// merges them in the order the URLs were supplied.
///
/// A URL that fails to fetch or parse is skipped so one broken month
/// does not take down the rest; the error is propagated only when no URL
/// yields any data.
pub struct SheetCsvSource {
    urls: Vec<String>,
    http: reqwest::Client,
}

impl SheetCsvSource {
    pub fn new(urls: Vec<String>) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self::with_http(urls, http))
    }

    pub fn with_http(urls: Vec<String>, http: reqwest::Client) -> Self {
        Self { urls, http }
    }

    async fn fetch_fragment(&self, url: &str) -> Result<RosterFragment, SourceError> {
        let text = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(parser::parse_roster_csv(&text)?)
    }
}

#[async_trait]
impl RosterSource for SheetCsvSource {
    fn name(&self) -> &str {
        "published sheets"
    }

    async fn fetch(&self) -> Result<Roster, SourceError> {
        if self.urls.is_empty() {
            return Err(SourceError::NoSources);
        }
        let mut fragments = Vec::with_capacity(self.urls.len());
        let mut last_err = None;
        for url in &self.urls {
            match self.fetch_fragment(url).await {
                Ok(fragment) => {
                    info!(
                        "loaded {} date columns from {url}",
                        fragment.date_labels.len()
                    );
                    fragments.push(fragment);
                }
                Err(err) => {
                    warn!("skipping sheet {url}: {err}");
                    last_err = Some(err);
                }
            }
        }
        match last_err {
            Some(err) if fragments.is_empty() => Err(err),
            _ => Ok(merge::merge_fragments(&fragments)),
        }
    }
}

/// Fetches the backend's combined display snapshot.
pub struct BackendSource {
    client: BackendClient,
}

impl BackendSource {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RosterSource for BackendSource {
    fn name(&self) -> &str {
        "backend"
    }

    async fn fetch(&self) -> Result<Roster, SourceError> {
        let snapshot = self.client.display_data().await?;
        Ok(snapshot.into_roster())
    }
}
