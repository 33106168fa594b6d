//! Canonical form of result URLs, used to collapse duplicate hits.

use url::Url;

/// Query keys that never change which document a URL points at.
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "ref",
];

/// Canonicalises `raw` for dedupe: lowercase scheme/host, no default port,
/// no fragment, no tracking keys, sorted query, no trailing slash.
///
/// Unparseable input is trimmed and returned as-is.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let Ok(mut parsed) = Url::parse(trimmed) else {
        return trimmed.to_string();
    };

    parsed.set_fragment(None);
    if matches!(
        (parsed.scheme(), parsed.port()),
        ("http", Some(80)) | ("https", Some(443))
    ) {
        let _ = parsed.set_port(None);
    }

    let mut params: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| !TRACKING_PARAMS.contains(&key.to_lowercase().as_str()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    params.sort();

    if params.is_empty() {
        parsed.set_query(None);
    } else {
        parsed.query_pairs_mut().clear().extend_pairs(&params);
    }

    let path = parsed.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        parsed.set_path(&path[..path.len() - 1]);
    }

    parsed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equivalent_urls_collapse() {
        let a = normalize_url("https://Example.COM:443/cv/jane.pdf?b=2&a=1#page=2");
        let b = normalize_url("https://example.com/cv/jane.pdf?a=1&b=2");
        assert_eq!(a, b);
    }

    #[test]
    fn test_tracking_params_dropped() {
        assert_eq!(
            normalize_url("https://example.com/resume.pdf?utm_source=google&gclid=x"),
            "https://example.com/resume.pdf"
        );
    }

    #[test]
    fn test_trailing_slash_dropped_but_root_kept() {
        assert_eq!(
            normalize_url("https://example.com/jane/"),
            "https://example.com/jane"
        );
        assert_eq!(normalize_url("https://example.com/"), "https://example.com/");
    }

    #[test]
    fn test_path_case_preserved() {
        assert_eq!(
            normalize_url("HTTPS://Example.com/Jane_Doe_CV.pdf"),
            "https://example.com/Jane_Doe_CV.pdf"
        );
    }

    #[test]
    fn test_unparseable_returned_trimmed() {
        assert_eq!(normalize_url("  not a url "), "not a url");
        assert_eq!(normalize_url(""), "");
    }
}
