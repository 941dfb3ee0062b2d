use crate::board::{Article, Channel, Status};
use crate::util::{collapse_whitespace, strip_control_chars};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Largest article list accepted from the service or an import file.
const MAX_LIST_SIZE: usize = 16 * 1024 * 1024; // 16MB

/// Fallback layout the service uses for `published` when it is not RFC 3339.
const PUBLISHED_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Errors loading the article list.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Article list too large (exceeds {0} bytes)")]
    TooLarge(usize),
    #[error("Could not decode article list: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid article record: {0}")]
    InvalidRecord(String),
    #[error("Invalid service URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// Wire Records
// ============================================================================

/// Channel block of an article record.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelRecord {
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(alias = "source_url")]
    pub rss_url: String,
    #[serde(default)]
    pub dominant_color: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// One element of the `GET /articles` array.
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleRecord {
    pub link: String,
    pub channel: ChannelRecord,
    pub title: String,
    pub published: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(alias = "status")]
    pub read_status: String,
}

fn non_empty(value: Option<String>) -> Option<Arc<str>> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .map(Arc::from)
}

fn parse_published(raw: &str) -> Result<DateTime<Utc>, SourceError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, PUBLISHED_FORMAT) {
        return Ok(dt.with_timezone(&Utc));
    }
    // Zone-less timestamps are taken as UTC.
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|_| SourceError::InvalidRecord(format!("unparseable published date '{raw}'")))
}

/// Converts wire records to articles, sharing one `Channel` per source URL.
#[derive(Default)]
struct ChannelInterner {
    channels: HashMap<String, Channel>,
}

impl ChannelInterner {
    fn intern(&mut self, record: ChannelRecord) -> Channel {
        self.channels
            .entry(record.rss_url.clone())
            .or_insert_with(|| Channel {
                name: Arc::from(collapse_whitespace(&strip_control_chars(&record.title))),
                icon: non_empty(record.icon),
                source_url: Arc::from(record.rss_url),
                dominant_color: non_empty(record.dominant_color),
            })
            .clone()
    }

    fn article(&mut self, record: ArticleRecord) -> Result<Article, SourceError> {
        let link = record.link.trim();
        if link.is_empty() {
            return Err(SourceError::InvalidRecord("empty link".into()));
        }
        let status: Status = record
            .read_status
            .trim()
            .parse()
            .map_err(SourceError::InvalidRecord)?;
        let published = parse_published(&record.published)?;

        Ok(Article {
            link: Arc::from(link),
            title: Arc::from(collapse_whitespace(&strip_control_chars(&record.title))),
            published,
            channel: self.intern(record.channel),
            summary: Arc::from(strip_control_chars(record.summary.trim()).as_ref()),
            image: non_empty(record.image),
            status,
        })
    }
}

/// Decode an article list body.
///
/// The body must be a JSON array. Elements that fail to decode (missing
/// fields, unknown status label, bad date) are skipped with a warning rather
/// than failing the whole load.
pub fn decode_articles(body: &[u8]) -> Result<Vec<Article>, SourceError> {
    let values: Vec<serde_json::Value> = serde_json::from_slice(body)?;
    let total = values.len();
    let mut interner = ChannelInterner::default();

    let articles: Vec<Article> = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let result = serde_json::from_value::<ArticleRecord>(value)
                .map_err(SourceError::from)
                .and_then(|record| interner.article(record));
            match result {
                Ok(article) => Some(article),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping article record");
                    None
                }
            }
        })
        .collect();

    if articles.len() < total {
        tracing::info!(
            loaded = articles.len(),
            skipped = total - articles.len(),
            "Article list decoded with skipped records"
        );
    }
    Ok(articles)
}

// ============================================================================
// Loading
// ============================================================================

/// Fetch the article list from `GET {base}/articles`.
pub async fn fetch_articles(
    client: &reqwest::Client,
    base: &Url,
    timeout: Duration,
) -> Result<Vec<Article>, SourceError> {
    let url = super::endpoint(base, &["articles"])
        .ok_or_else(|| SourceError::InvalidBaseUrl(base.to_string()))?;
    tracing::debug!(url = %url, "Fetching article list");

    let response = tokio::time::timeout(timeout, client.get(url).send())
        .await
        .map_err(|_| SourceError::Timeout(timeout.as_secs()))??;

    if !response.status().is_success() {
        return Err(SourceError::HttpStatus(response.status().as_u16()));
    }

    let body = tokio::time::timeout(timeout, super::read_limited(response, MAX_LIST_SIZE))
        .await
        .map_err(|_| SourceError::Timeout(timeout.as_secs()))??
        .ok_or(SourceError::TooLarge(MAX_LIST_SIZE))?;

    decode_articles(&body)
}

/// Load the article list from a JSON file in the `GET /articles` format.
pub async fn load_articles_file(path: &Path) -> Result<Vec<Article>, SourceError> {
    let io_error = |source| SourceError::Io {
        path: path.display().to_string(),
        source,
    };

    let metadata = tokio::fs::metadata(path).await.map_err(io_error)?;
    if metadata.len() > MAX_LIST_SIZE as u64 {
        return Err(SourceError::TooLarge(MAX_LIST_SIZE));
    }
    let body = tokio::fs::read(path).await.map_err(io_error)?;
    decode_articles(&body)
}
