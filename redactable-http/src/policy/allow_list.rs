//! Case-insensitive name sets used by allow-list policies.

use std::{
    collections::BTreeSet,
    fmt,
    sync::{Arc, LazyLock},
};

/// Header names that carry no credentials or personal data in common use.
///
/// Covers caching, CORS, content negotiation, conditional requests, framing,
/// security response headers and distributed-tracing identifiers.
pub const DEFAULT_ALLOWED_HEADERS: &[&str] = &[
    "accept",
    "accept-charset",
    "accept-encoding",
    "accept-language",
    "accept-patch",
    "accept-post",
    "accept-ranges",
    "access-control-allow-credentials",
    "access-control-allow-headers",
    "access-control-allow-methods",
    "access-control-allow-origin",
    "access-control-expose-headers",
    "access-control-max-age",
    "access-control-request-headers",
    "access-control-request-method",
    "age",
    "allow",
    "alt-svc",
    "cache-control",
    "connection",
    "content-disposition",
    "content-encoding",
    "content-language",
    "content-length",
    "content-location",
    "content-range",
    "content-security-policy",
    "content-security-policy-report-only",
    "content-type",
    "cross-origin-embedder-policy",
    "cross-origin-opener-policy",
    "cross-origin-resource-policy",
    "date",
    "dnt",
    "early-data",
    "etag",
    "expect",
    "expires",
    "host",
    "if-match",
    "if-modified-since",
    "if-none-match",
    "if-range",
    "if-unmodified-since",
    "keep-alive",
    "last-modified",
    "link",
    "location",
    "max-forwards",
    "origin",
    "permissions-policy",
    "pragma",
    "range",
    "referrer-policy",
    "retry-after",
    "sec-fetch-dest",
    "sec-fetch-mode",
    "sec-fetch-site",
    "sec-fetch-user",
    "server",
    "server-timing",
    "strict-transport-security",
    "te",
    "timing-allow-origin",
    "traceparent",
    "tracestate",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "upgrade-insecure-requests",
    "user-agent",
    "vary",
    "via",
    "warning",
    "x-b3-parentspanid",
    "x-b3-sampled",
    "x-b3-spanid",
    "x-b3-traceid",
    "x-content-type-options",
    "x-correlation-id",
    "x-frame-options",
    "x-request-id",
    "x-xss-protection",
];

static DEFAULT_HEADERS: LazyLock<AllowList> =
    LazyLock::new(|| AllowList::new(DEFAULT_ALLOWED_HEADERS.iter().copied()));

/// An immutable set of names compared with ASCII case folding.
///
/// Both the stored names and every probed name are lowercased, so membership
/// never depends on how a caller or a server spelled a header or query key.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    names: Arc<BTreeSet<String>>,
}

impl AllowList {
    /// Builds a list from any collection of names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|name| name.as_ref().to_ascii_lowercase())
            .collect();
        Self {
            names: Arc::new(names),
        }
    }

    /// The well-known public header allow-list ([`DEFAULT_ALLOWED_HEADERS`]).
    #[must_use]
    pub fn default_headers() -> Self {
        DEFAULT_HEADERS.clone()
    }

    /// An empty list: every name is denied.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Case-insensitive membership test.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        if name.bytes().any(|b| b.is_ascii_uppercase()) {
            self.names.contains(&name.to_ascii_lowercase())
        } else {
            self.names.contains(name)
        }
    }

    /// Returns a new list holding the names of both lists.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if other.names.is_subset(&self.names) {
            return self.clone();
        }
        let names = self.names.union(&other.names).cloned().collect();
        Self {
            names: Arc::new(names),
        }
    }

    /// Number of distinct (case-folded) names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over the lowercased names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl fmt::Debug for AllowList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<S: AsRef<str>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_ignores_case() {
        let list = AllowList::new(["X-Request-Id", "accept"]);
        assert!(list.contains("x-request-id"));
        assert!(list.contains("X-REQUEST-ID"));
        assert!(list.contains("Accept"));
        assert!(!list.contains("authorization"));
    }

    #[test]
    fn duplicates_fold_together() {
        let list = AllowList::new(["ETag", "etag", "ETAG"]);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn default_headers_cover_public_names_only() {
        let list = AllowList::default_headers();
        assert!(list.len() >= 70);
        assert!(list.contains("Content-Type"));
        assert!(list.contains("cache-control"));
        assert!(list.contains("access-control-allow-origin"));
        assert!(!list.contains("authorization"));
        assert!(!list.contains("cookie"));
        assert!(!list.contains("set-cookie"));
        assert!(!list.contains("proxy-authorization"));
    }

    #[test]
    fn union_keeps_both_sides() {
        let list = AllowList::new(["x-api-version"]).union(&AllowList::default_headers());
        assert!(list.contains("X-Api-Version"));
        assert!(list.contains("etag"));
        assert_eq!(list.len(), AllowList::default_headers().len() + 1);
    }
}
