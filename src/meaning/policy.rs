//! Fetch admission policy
//!
//! Decides whether artifacts may be fetched from a URL before any request
//! is made. Rejection is not an error; the caller just gets no artifacts.

use std::fmt;
use std::sync::Arc;
use url::Url;

/// Which URLs artifacts may be fetched from
#[derive(Clone, Default)]
pub enum FetchPolicy {
    /// Only URLs sharing the hosting document's origin
    #[default]
    SameOrigin,
    /// Only URLs whose serialized origin (e.g. `https://example.com`) is listed
    Origins(Vec<String>),
    /// Arbitrary predicate over the URL
    Predicate(Arc<dyn Fn(&Url) -> bool + Send + Sync>),
}

impl FetchPolicy {
    /// Wrap a predicate
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&Url) -> bool + Send + Sync + 'static,
    {
        FetchPolicy::Predicate(Arc::new(predicate))
    }

    /// Whether `url` may be fetched by a host whose document lives at `document`.
    ///
    /// Without a document URL there is no origin to share, so `SameOrigin`
    /// admits nothing.
    pub fn admits(&self, url: &Url, document: Option<&Url>) -> bool {
        match self {
            FetchPolicy::SameOrigin => document.is_some_and(|doc| doc.origin() == url.origin()),
            FetchPolicy::Origins(origins) => {
                let origin = url.origin().ascii_serialization();
                origins.iter().any(|allowed| *allowed == origin)
            }
            FetchPolicy::Predicate(predicate) => predicate(url),
        }
    }
}

impl From<Vec<String>> for FetchPolicy {
    fn from(origins: Vec<String>) -> Self {
        FetchPolicy::Origins(origins)
    }
}

impl fmt::Debug for FetchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchPolicy::SameOrigin => f.write_str("SameOrigin"),
            FetchPolicy::Origins(origins) => f.debug_tuple("Origins").field(origins).finish(),
            FetchPolicy::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_same_origin() {
        let doc = url("https://example.com/exhibit/index.html");
        let policy = FetchPolicy::SameOrigin;

        assert!(policy.admits(&url("https://example.com/other/page.html"), Some(&doc)));
        assert!(!policy.admits(&url("https://evil.example.net/page.html"), Some(&doc)));
        assert!(!policy.admits(&url("http://example.com/page.html"), Some(&doc)));
        assert!(!policy.admits(&url("https://example.com:8443/page.html"), Some(&doc)));
    }

    #[test]
    fn test_same_origin_without_document_admits_nothing() {
        assert!(!FetchPolicy::SameOrigin.admits(&url("https://example.com/"), None));
    }

    #[test]
    fn test_opaque_origins_never_match() {
        let doc = url("file:///srv/exhibit/index.html");
        assert!(!FetchPolicy::SameOrigin.admits(&url("file:///srv/exhibit/other.html"), Some(&doc)));
    }

    #[test]
    fn test_origin_list() {
        let policy = FetchPolicy::from(vec![
            "https://example.com".to_string(),
            "https://cdn.example.org".to_string(),
        ]);

        assert!(policy.admits(&url("https://cdn.example.org/a/b.html"), None));
        assert!(policy.admits(&url("https://example.com/"), None));
        assert!(!policy.admits(&url("https://example.net/"), None));
    }

    #[test]
    fn test_predicate() {
        let policy = FetchPolicy::predicate(|url| url.path().ends_with(".html"));
        assert!(policy.admits(&url("https://anywhere.test/page.html"), None));
        assert!(!policy.admits(&url("https://anywhere.test/data.bin"), None));
        assert_eq!(format!("{:?}", policy), "Predicate(..)");
    }
}
