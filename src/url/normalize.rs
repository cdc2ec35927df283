use crate::UrlError;
use url::Url;

/// Normalizes a candidate link into a canonical crawl URL
///
/// # Normalization Steps
///
/// 1. Resolve relative references against the page's own URL (not the job's
///    seed): `../uchwaly/123` on `https://example.org/a/b` resolves to
///    `https://example.org/uchwaly/123`
/// 2. Reject non-web schemes (`javascript:`, `mailto:`, `tel:`, `data:`)
/// 3. Strip the fragment (same-page anchors never identify new documents)
///
/// Idempotent: normalizing an already-canonical URL returns it unchanged.
///
/// # Arguments
///
/// * `href` - The raw href value as found on the page
/// * `page_url` - The URL of the page the href was found on
///
/// # Examples
///
/// ```
/// use civicrawl::url::normalize_url;
/// use url::Url;
///
/// let page = Url::parse("https://bip.example.org/news/").unwrap();
/// let url = normalize_url("item?id=7#top", &page).unwrap();
/// assert_eq!(url.as_str(), "https://bip.example.org/news/item?id=7");
/// ```
pub fn normalize_url(href: &str, page_url: &Url) -> Result<Url, UrlError> {
    let href = href.trim();

    if href.is_empty() {
        return Err(UrlError::Parse("empty href".to_string()));
    }

    let mut url = page_url
        .join(href)
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("https://bip.example.org/documents/page").unwrap()
    }

    #[test]
    fn test_absolute_url_unchanged() {
        let url = normalize_url("https://bip.example.org/other", &page_url()).unwrap();
        assert_eq!(url.as_str(), "https://bip.example.org/other");
    }

    #[test]
    fn test_relative_path() {
        let url = normalize_url("attachment/12", &page_url()).unwrap();
        assert_eq!(url.as_str(), "https://bip.example.org/documents/attachment/12");
    }

    #[test]
    fn test_root_relative_path() {
        let url = normalize_url("/resolutions/2024", &page_url()).unwrap();
        assert_eq!(url.as_str(), "https://bip.example.org/resolutions/2024");
    }

    #[test]
    fn test_parent_reference() {
        let url = normalize_url("../news", &page_url()).unwrap();
        assert_eq!(url.as_str(), "https://bip.example.org/news");
    }

    #[test]
    fn test_fragment_stripped() {
        let url = normalize_url("/page#section-3", &page_url()).unwrap();
        assert_eq!(url.as_str(), "https://bip.example.org/page");
    }

    #[test]
    fn test_query_preserved() {
        let url = normalize_url("/search?q=uchwala&year=2024", &page_url()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://bip.example.org/search?q=uchwala&year=2024"
        );
    }

    #[test]
    fn test_javascript_scheme_rejected() {
        let result = normalize_url("javascript:void(0)", &page_url());
        assert!(matches!(result, Err(UrlError::InvalidScheme(_))));
    }

    #[test]
    fn test_mailto_rejected() {
        let result = normalize_url("mailto:office@example.org", &page_url());
        assert!(matches!(result, Err(UrlError::InvalidScheme(_))));
    }

    #[test]
    fn test_tel_rejected() {
        let result = normalize_url("tel:+48123456789", &page_url());
        assert!(matches!(result, Err(UrlError::InvalidScheme(_))));
    }

    #[test]
    fn test_data_uri_rejected() {
        let result = normalize_url("data:text/html,<h1>x</h1>", &page_url());
        assert!(matches!(result, Err(UrlError::InvalidScheme(_))));
    }

    #[test]
    fn test_empty_href_rejected() {
        assert!(normalize_url("", &page_url()).is_err());
        assert!(normalize_url("   ", &page_url()).is_err());
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_url("/a/b?x=1#frag", &page_url()).unwrap();
        let twice = normalize_url(once.as_str(), &page_url()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_resolves_against_page_not_seed() {
        // The page's own URL is the resolution base, so a relative link on a
        // deep page stays under that page's directory.
        let deep = Url::parse("https://bip.example.org/a/b/c/").unwrap();
        let url = normalize_url("item", &deep).unwrap();
        assert_eq!(url.as_str(), "https://bip.example.org/a/b/c/item");
    }
}
