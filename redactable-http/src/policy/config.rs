//! The bundle of policies applied to one request/response exchange.

use std::sync::LazyLock;

use http::{HeaderMap, HeaderName, HeaderValue, Uri};

use super::{header::HeaderPolicy, query::QueryParamPolicy};
use crate::redaction::{RedactedHeaders, RedactedUri};

static DEFAULT_CONFIG: LazyLock<RedactionConfig> = LazyLock::new(|| RedactionConfig {
    request_headers: HeaderPolicy::default_headers(),
    response_headers: HeaderPolicy::default_headers(),
    query_params: QueryParamPolicy::redact_all(),
});

/// Request-header, response-header and query-parameter policies.
///
/// A configuration is an immutable value: the `with_*` methods consume it and
/// return an updated copy. Clones share their allow-lists.
///
/// ```
/// use redactable_http::{HeaderPolicy, RedactionConfig};
///
/// let config = RedactionConfig::default()
///     .with_response_headers(HeaderPolicy::allow_list_or_default(["x-ratelimit-remaining"]));
/// # let _ = config;
/// ```
#[derive(Clone, Debug)]
pub struct RedactionConfig {
    request_headers: HeaderPolicy,
    response_headers: HeaderPolicy,
    query_params: QueryParamPolicy,
}

impl RedactionConfig {
    /// Builds a configuration from its three policies.
    #[must_use]
    pub fn new(
        request_headers: HeaderPolicy,
        response_headers: HeaderPolicy,
        query_params: QueryParamPolicy,
    ) -> Self {
        Self {
            request_headers,
            response_headers,
            query_params,
        }
    }

    /// Reveals everything.
    #[must_use]
    pub fn unredacted() -> Self {
        Self::new(
            HeaderPolicy::identity(),
            HeaderPolicy::identity(),
            QueryParamPolicy::identity(),
        )
    }

    /// Strict allow-lists: only the given names and keys are revealed.
    pub fn allow_list<I1, I2, I3, S1, S2, S3>(
        request_headers: I1,
        response_headers: I2,
        query_keys: I3,
    ) -> Self
    where
        I1: IntoIterator<Item = S1>,
        I2: IntoIterator<Item = S2>,
        I3: IntoIterator<Item = S3>,
        S1: AsRef<str>,
        S2: AsRef<str>,
        S3: AsRef<str>,
    {
        Self::new(
            HeaderPolicy::allow_list(request_headers),
            HeaderPolicy::allow_list(response_headers),
            QueryParamPolicy::allow_list(query_keys),
        )
    }

    /// Like [`RedactionConfig::allow_list`], with the header lists extended by
    /// the default public header set.
    pub fn allow_list_or_default<I1, I2, I3, S1, S2, S3>(
        request_headers: I1,
        response_headers: I2,
        query_keys: I3,
    ) -> Self
    where
        I1: IntoIterator<Item = S1>,
        I2: IntoIterator<Item = S2>,
        I3: IntoIterator<Item = S3>,
        S1: AsRef<str>,
        S2: AsRef<str>,
        S3: AsRef<str>,
    {
        Self::new(
            HeaderPolicy::allow_list_or_default(request_headers),
            HeaderPolicy::allow_list_or_default(response_headers),
            QueryParamPolicy::allow_list(query_keys),
        )
    }

    #[must_use]
    pub fn with_request_headers(mut self, policy: HeaderPolicy) -> Self {
        self.request_headers = policy;
        self
    }

    #[must_use]
    pub fn with_response_headers(mut self, policy: HeaderPolicy) -> Self {
        self.response_headers = policy;
        self
    }

    #[must_use]
    pub fn with_query_params(mut self, policy: QueryParamPolicy) -> Self {
        self.query_params = policy;
        self
    }

    pub fn request_headers(&self) -> &HeaderPolicy {
        &self.request_headers
    }

    pub fn response_headers(&self) -> &HeaderPolicy {
        &self.response_headers
    }

    pub fn query_params(&self) -> &QueryParamPolicy {
        &self.query_params
    }

    pub fn redact_request_header(&self, name: &HeaderName, value: &HeaderValue) -> HeaderValue {
        self.request_headers.apply(name, value)
    }

    pub fn redact_response_header(&self, name: &HeaderName, value: &HeaderValue) -> HeaderValue {
        self.response_headers.apply(name, value)
    }

    pub fn redact_request_header_map(&self, headers: &HeaderMap) -> RedactedHeaders {
        RedactedHeaders::from_headers(headers, &self.request_headers)
    }

    pub fn redact_response_header_map(&self, headers: &HeaderMap) -> RedactedHeaders {
        RedactedHeaders::from_headers(headers, &self.response_headers)
    }

    pub fn redact_uri(&self, uri: &Uri) -> RedactedUri {
        RedactedUri::from_uri(uri, &self.query_params)
    }
}

/// Reveals the public header allow-list on both sides and no query values.
impl Default for RedactionConfig {
    fn default() -> Self {
        DEFAULT_CONFIG.clone()
    }
}

#[cfg(test)]
mod tests {
    use http::header::{AUTHORIZATION, CONTENT_TYPE};

    use super::*;
    use crate::policy::REDACTED_MARKER;

    #[test]
    fn default_config_redacts_credentials_and_query_values() {
        let config = RedactionConfig::default();
        let bearer = HeaderValue::from_static("Bearer abc");
        assert_eq!(config.redact_request_header(&AUTHORIZATION, &bearer), REDACTED_MARKER);
        let json = HeaderValue::from_static("application/json");
        assert_eq!(config.redact_response_header(&CONTENT_TYPE, &json), "application/json");
        assert_eq!(
            config.query_params().apply("page", Some("1")).as_deref(),
            Some(REDACTED_MARKER)
        );
    }

    #[test]
    fn unredacted_config_is_identity() {
        let config = RedactionConfig::unredacted();
        let bearer = HeaderValue::from_static("Bearer abc");
        assert_eq!(config.redact_request_header(&AUTHORIZATION, &bearer), "Bearer abc");
        assert_eq!(config.query_params().apply("page", Some("1")).as_deref(), Some("1"));
    }

    #[test]
    fn allow_list_config_is_strict_per_side() {
        let config = RedactionConfig::allow_list(["authorization"], ["x-trace"], ["page"]);
        let bearer = HeaderValue::from_static("Bearer abc");
        let json = HeaderValue::from_static("application/json");
        assert_eq!(config.redact_request_header(&AUTHORIZATION, &bearer), "Bearer abc");
        assert_eq!(config.redact_response_header(&AUTHORIZATION, &bearer), REDACTED_MARKER);
        assert_eq!(config.redact_response_header(&CONTENT_TYPE, &json), REDACTED_MARKER);
        assert_eq!(config.query_params().apply("PAGE", Some("3")).as_deref(), Some("3"));
    }

    #[test]
    fn allow_list_or_default_keeps_public_headers() {
        let config = RedactionConfig::allow_list_or_default(["x-tenant"], ["x-tenant"], ["page"]);
        let json = HeaderValue::from_static("application/json");
        assert_eq!(config.redact_response_header(&CONTENT_TYPE, &json), "application/json");
        let bearer = HeaderValue::from_static("Bearer abc");
        assert_eq!(config.redact_request_header(&AUTHORIZATION, &bearer), REDACTED_MARKER);
    }

    #[test]
    fn functional_update_leaves_original_untouched() {
        let original = RedactionConfig::default();
        let updated = original.clone().with_request_headers(HeaderPolicy::identity());
        let bearer = HeaderValue::from_static("Bearer abc");
        assert_eq!(updated.redact_request_header(&AUTHORIZATION, &bearer), "Bearer abc");
        assert_eq!(original.redact_request_header(&AUTHORIZATION, &bearer), REDACTED_MARKER);
    }
}
