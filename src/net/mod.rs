//! HTTP collaborators of the board.
//!
//! - `source` - one-shot load of the article list (`GET /articles`)
//! - `sync` - fire-and-forget status notifications (`PUT /articles/{key}/{status}`)
//!
//! Both share one `reqwest::Client` and build request URLs by appending
//! percent-encoded path segments to the configured base URL.
use futures::StreamExt;
use std::time::Duration;
use url::Url;

mod source;
mod sync;

pub use source::{
    decode_articles, fetch_articles, load_articles_file, ArticleRecord, ChannelRecord, SourceError,
};
pub use sync::{SyncAck, SyncError, SyncNotifier};

/// Build the HTTP client shared by the loader and the notifier.
pub fn build_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(30))
        .tcp_keepalive(Duration::from_secs(60))
        .timeout(timeout)
        .user_agent(concat!("triage/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// `base` with `segments` appended as individually percent-encoded path
/// segments. An article link such as `https://a.example/x?y` becomes a
/// single segment.
///
/// Returns `None` if `base` cannot carry a path (e.g. `mailto:`).
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Option<Url> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut().ok()?.pop_if_empty().extend(segments);
    Some(url)
}

/// Read a response body, refusing anything larger than `limit` bytes.
///
/// Returns `Ok(None)` when the limit is exceeded.
pub(crate) async fn read_limited(
    response: reqwest::Response,
    limit: usize,
) -> reqwest::Result<Option<Vec<u8>>> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Ok(None);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Ok(None);
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(Some(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_encodes_link_as_one_segment() {
        let base = Url::parse("http://127.0.0.1:8080").unwrap();
        let url = endpoint(&base, &["articles", "https://a.example/p/1?x=y", "Saved"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8080/articles/https:%2F%2Fa.example%2Fp%2F1%3Fx=y/Saved"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let base = Url::parse("https://host.example/api/").unwrap();
        let url = endpoint(&base, &["articles"]).unwrap();
        assert_eq!(url.as_str(), "https://host.example/api/articles");
    }

    #[test]
    fn test_endpoint_rejects_cannot_be_a_base() {
        let base = Url::parse("mailto:someone@example.com").unwrap();
        assert!(endpoint(&base, &["articles"]).is_none());
    }
}
