//! Redacted views over request URIs.
//!
//! Only the query component is rewritten. Parameters are split on `&` and
//! `=`, decoded (`+` as space, then percent-decoding) for the policy, and
//! re-encoded only when the policy changed the value. Untouched parameters
//! keep their exact original spelling.

use std::{borrow::Cow, fmt};

use http::{Uri, uri::PathAndQuery};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use super::view::Redacted;
use crate::policy::QueryParamPolicy;

/// Everything except RFC 3986 unreserved characters.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// URI paired with its redacted projection.
pub type RedactedUri = Redacted<Uri>;

impl Redacted<Uri> {
    /// Applies `policy` to every query parameter value of `uri`.
    ///
    /// Scheme, authority and path are left untouched.
    pub fn from_uri(uri: &Uri, policy: &QueryParamPolicy) -> Self {
        Self::new(redact_uri(uri, policy), uri.clone())
    }
}

impl fmt::Display for Redacted<Uri> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.value(), f)
    }
}

fn redact_uri(uri: &Uri, policy: &QueryParamPolicy) -> Uri {
    let Some(query) = uri.query() else {
        return uri.clone();
    };
    let redacted = redact_query(query, policy);
    if redacted == query {
        return uri.clone();
    }
    with_path_and_query(uri, &format!("{}?{redacted}", uri.path()))
        .or_else(|| with_path_and_query(uri, uri.path()))
        .unwrap_or_else(|| Uri::from_static("/"))
}

fn with_path_and_query(uri: &Uri, path_and_query: &str) -> Option<Uri> {
    let path_and_query = PathAndQuery::try_from(path_and_query).ok()?;
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query);
    Uri::from_parts(parts).ok()
}

pub(crate) fn redact_query(query: &str, policy: &QueryParamPolicy) -> String {
    let mut out = String::with_capacity(query.len());
    for (idx, segment) in query.split('&').enumerate() {
        if idx > 0 {
            out.push('&');
        }
        redact_segment(segment, policy, &mut out);
    }
    out
}

fn redact_segment(segment: &str, policy: &QueryParamPolicy, out: &mut String) {
    let (raw_key, raw_value) = match segment.split_once('=') {
        Some((key, value)) => (key, Some(value)),
        None => (segment, None),
    };
    let key = decode(raw_key);
    let value = raw_value.map(decode);
    match (policy.apply(&key, value.as_deref()), value.as_deref()) {
        (Some(redacted), Some(original)) if redacted != original => {
            out.push_str(raw_key);
            out.push('=');
            out.extend(utf8_percent_encode(&redacted, QUERY_VALUE));
        }
        _ => out.push_str(segment),
    }
}

fn decode(raw: &str) -> Cow<'_, str> {
    if raw.contains('+') {
        let spaced = raw.replace('+', " ");
        Cow::Owned(percent_decode_str(&spaced).decode_utf8_lossy().into_owned())
    } else {
        percent_decode_str(raw).decode_utf8_lossy()
    }
}
