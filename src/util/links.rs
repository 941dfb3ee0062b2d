use thiserror::Error;
use url::Url;

/// Reasons a link is refused before it reaches the system opener.
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    #[error("URL has no host")]
    MissingHost,
}

/// Validate an article link for opening in a browser.
///
/// Only `http` and `https` links with a host are accepted, so a hostile feed
/// cannot make the opener launch `file://` paths or custom URL handlers.
///
/// # Examples
///
/// ```
/// use triage::util::validate_link;
///
/// assert!(validate_link("https://example.com/post/1").is_ok());
/// assert!(validate_link("file:///etc/passwd").is_err());
/// ```
pub fn validate_link(link: &str) -> Result<Url, LinkError> {
    let url = Url::parse(link.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(LinkError::UnsupportedScheme(scheme.to_owned())),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(LinkError::MissingHost);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_links_accepted() {
        assert!(validate_link("https://example.com/a?b=c").is_ok());
        assert!(validate_link("http://news.example.org").is_ok());
        assert!(validate_link("  https://example.com  ").is_ok());
    }

    #[test]
    fn test_other_schemes_rejected() {
        assert!(matches!(
            validate_link("file:///etc/passwd"),
            Err(LinkError::UnsupportedScheme(_))
        ));
        assert!(validate_link("javascript:alert(1)").is_err());
        assert!(validate_link("mailto:a@example.com").is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            validate_link("not a url"),
            Err(LinkError::InvalidUrl(_))
        ));
    }
}
