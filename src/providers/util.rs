use reqwest::Url;

/// Builds the HTTP client used for every remote call. No timeout is set, a
/// request ends when the transport gives up.
pub fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(concat!("fxconv/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Appends path segments to `base_url`, percent-encoding each one.
pub fn join_segments<I>(base_url: &str, segments: I) -> Result<Url, String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut url = Url::parse(base_url).map_err(|e| format!("{base_url}: {e}"))?;
    url.path_segments_mut()
        .map_err(|_| format!("{base_url}: cannot be a base URL"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_segments() {
        let url = join_segments("https://example.com/v6", ["key", "pair", "USD"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/v6/key/pair/USD");

        let url = join_segments("http://127.0.0.1:8080", ["symbols"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/symbols");

        // Trailing slash on the base does not produce an empty segment
        let url = join_segments("https://example.com/v1/", ["symbols"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/v1/symbols");
    }

    #[test]
    fn test_join_segments_encodes() {
        let url = join_segments("https://example.com", ["a b", "c/d"]).unwrap();
        assert_eq!(url.path(), "/a%20b/c%2Fd");
    }

    #[test]
    fn test_join_segments_rejects_bad_base() {
        assert!(join_segments("not a url", ["x"]).is_err());
        assert!(join_segments("mailto:someone@example.com", ["x"]).is_err());
    }
}
