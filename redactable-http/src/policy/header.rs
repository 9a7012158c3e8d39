//! Redaction policies for HTTP header values.

use std::{fmt, sync::Arc};

use http::{HeaderName, HeaderValue};

use super::{
    allow_list::AllowList,
    text::{REDACTED_MARKER, TextRedactionPolicy},
};

type HeaderRuleFn = dyn Fn(&HeaderName, &HeaderValue) -> Option<HeaderValue> + Send + Sync;

/// A partial override consulted before a fallback policy.
///
/// Returning `Some` decides the value; `None` defers to the fallback.
#[derive(Clone)]
pub struct HeaderRule(Arc<HeaderRuleFn>);

impl HeaderRule {
    pub fn new<F>(rule: F) -> Self
    where
        F: Fn(&HeaderName, &HeaderValue) -> Option<HeaderValue> + Send + Sync + 'static,
    {
        Self(Arc::new(rule))
    }

    /// Always redacts the named header to [`REDACTED_MARKER`], whatever the fallback says.
    #[must_use]
    pub fn deny(name: HeaderName) -> Self {
        Self::new(move |candidate, _| {
            (*candidate == name).then(|| HeaderValue::from_static(REDACTED_MARKER))
        })
    }

    /// Always shows the named header, whatever the fallback says.
    #[must_use]
    pub fn allow(name: HeaderName) -> Self {
        Self::new(move |candidate, value| (*candidate == name).then(|| value.clone()))
    }

    fn evaluate(&self, name: &HeaderName, value: &HeaderValue) -> Option<HeaderValue> {
        (self.0)(name, value)
    }
}

impl fmt::Debug for HeaderRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HeaderRule(..)")
    }
}

/// Decides whether a header value may be revealed, and rewrites it if not.
///
/// Policies are immutable values; the combinators return new policies.
///
/// ```
/// use http::{HeaderName, HeaderValue};
/// use redactable_http::{HeaderPolicy, REDACTED_MARKER};
///
/// let policy = HeaderPolicy::allow_list(["content-type"]);
/// let secret = HeaderValue::from_static("Bearer abc");
/// let redacted = policy.apply(&HeaderName::from_static("authorization"), &secret);
/// assert_eq!(redacted, REDACTED_MARKER);
/// ```
#[derive(Clone, Debug)]
pub enum HeaderPolicy {
    /// Never redacts.
    Identity,
    /// Reveals members of `allowed`; rewrites everything else with `redaction`.
    AllowList {
        allowed: AllowList,
        redaction: TextRedactionPolicy,
    },
    /// Consults `rule` first and defers to `fallback` when it declines.
    OrElse {
        rule: HeaderRule,
        fallback: Box<HeaderPolicy>,
    },
}

impl HeaderPolicy {
    #[must_use]
    pub fn identity() -> Self {
        Self::Identity
    }

    /// Reveals only the named headers (case-insensitive); redacts the rest.
    pub fn allow_list<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_allow_list(AllowList::new(names))
    }

    /// Reveals the named headers plus the default public header set.
    pub fn allow_list_or_default<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_allow_list(AllowList::default_headers().union(&AllowList::new(names)))
    }

    #[must_use]
    pub fn from_allow_list(allowed: AllowList) -> Self {
        Self::AllowList {
            allowed,
            redaction: TextRedactionPolicy::default_full(),
        }
    }

    /// The policy used by the default configuration on both request and response side.
    #[must_use]
    pub fn default_headers() -> Self {
        Self::from_allow_list(AllowList::default_headers())
    }

    /// Applies `rule` first; anything it leaves undecided goes to `fallback`.
    #[must_use]
    pub fn or_else(rule: HeaderRule, fallback: Self) -> Self {
        Self::OrElse {
            rule,
            fallback: Box::new(fallback),
        }
    }

    /// Wraps an arbitrary total function.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&HeaderName, &HeaderValue) -> HeaderValue + Send + Sync + 'static,
    {
        Self::or_else(
            HeaderRule::new(move |name, value| Some(f(name, value))),
            Self::Identity,
        )
    }

    /// Layers `rule` on top of this policy.
    #[must_use]
    pub fn with_rule(self, rule: HeaderRule) -> Self {
        Self::or_else(rule, self)
    }

    /// Replaces how rejected values are rewritten.
    ///
    /// Only allow-list policies (including those under an `OrElse` fallback)
    /// are affected; `Identity` never rewrites anything.
    #[must_use]
    pub fn with_redaction(self, redaction: TextRedactionPolicy) -> Self {
        match self {
            Self::Identity => Self::Identity,
            Self::AllowList { allowed, .. } => Self::AllowList { allowed, redaction },
            Self::OrElse { rule, fallback } => Self::OrElse {
                rule,
                fallback: Box::new(fallback.with_redaction(redaction)),
            },
        }
    }

    /// Returns the value to display for `name`.
    ///
    /// Total: a value already equal to [`REDACTED_MARKER`] is returned as is,
    /// and a rewrite that is not a valid header value degrades to the marker.
    #[must_use]
    pub fn apply(&self, name: &HeaderName, value: &HeaderValue) -> HeaderValue {
        if value == REDACTED_MARKER {
            return value.clone();
        }
        self.apply_inner(name, value)
    }

    fn apply_inner(&self, name: &HeaderName, value: &HeaderValue) -> HeaderValue {
        match self {
            Self::Identity => value.clone(),
            Self::AllowList { allowed, redaction } => {
                if allowed.contains(name.as_str()) {
                    value.clone()
                } else {
                    rewrite(redaction, value)
                }
            }
            Self::OrElse { rule, fallback } => rule
                .evaluate(name, value)
                .unwrap_or_else(|| fallback.apply_inner(name, value)),
        }
    }
}

impl Default for HeaderPolicy {
    fn default() -> Self {
        Self::default_headers()
    }
}

fn rewrite(redaction: &TextRedactionPolicy, value: &HeaderValue) -> HeaderValue {
    let marker = HeaderValue::from_static(REDACTED_MARKER);
    if redaction.is_marker() {
        return marker;
    }
    let Ok(text) = value.to_str() else {
        return marker;
    };
    let mut rewritten = HeaderValue::from_str(&redaction.apply_to(text)).unwrap_or(marker);
    rewritten.set_sensitive(value.is_sensitive());
    rewritten
}

#[cfg(test)]
mod tests {
    use http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};

    use super::*;

    fn value(text: &'static str) -> HeaderValue {
        HeaderValue::from_static(text)
    }

    #[test]
    fn identity_reveals_everything() {
        let policy = HeaderPolicy::identity();
        assert_eq!(policy.apply(&AUTHORIZATION, &value("Bearer x")), "Bearer x");
    }

    #[test]
    fn allow_list_redacts_non_members() {
        let policy = HeaderPolicy::allow_list(["Content-Type"]);
        assert_eq!(policy.apply(&CONTENT_TYPE, &value("text/plain")), "text/plain");
        assert_eq!(policy.apply(&AUTHORIZATION, &value("Bearer x")), REDACTED_MARKER);
    }

    #[test]
    fn allow_list_or_default_extends_defaults() {
        let policy = HeaderPolicy::allow_list_or_default(["x-tenant"]);
        let tenant = HeaderName::from_static("x-tenant");
        assert_eq!(policy.apply(&tenant, &value("acme")), "acme");
        assert_eq!(policy.apply(&CONTENT_TYPE, &value("text/plain")), "text/plain");
        assert_eq!(policy.apply(&COOKIE, &value("sid=1")), REDACTED_MARKER);
    }

    #[test]
    fn or_else_rules_take_precedence() {
        let policy = HeaderPolicy::or_else(
            HeaderRule::deny(CONTENT_TYPE),
            HeaderPolicy::allow_list(["content-type", "cookie"]),
        )
        .with_rule(HeaderRule::allow(AUTHORIZATION));

        assert_eq!(policy.apply(&CONTENT_TYPE, &value("text/plain")), REDACTED_MARKER);
        assert_eq!(policy.apply(&COOKIE, &value("sid=1")), "sid=1");
        assert_eq!(policy.apply(&AUTHORIZATION, &value("Basic Zm9v")), "Basic Zm9v");
    }

    #[test]
    fn marker_is_never_rewritten() {
        let policies = [
            HeaderPolicy::identity(),
            HeaderPolicy::allow_list(["accept"]),
            HeaderPolicy::allow_list(["accept"]).with_redaction(TextRedactionPolicy::keep_last(2)),
            HeaderPolicy::from_fn(|_, _| value("overwritten")),
        ];
        for policy in policies {
            let once = policy.apply(&COOKIE, &value("sid=1"));
            let marker = value(REDACTED_MARKER);
            assert_eq!(policy.apply(&COOKIE, &marker), marker);
            if once == REDACTED_MARKER {
                assert_eq!(policy.apply(&COOKIE, &once), once);
            }
        }
    }

    #[test]
    fn custom_redaction_strategy_is_used() {
        let policy = HeaderPolicy::allow_list(Vec::<String>::new())
            .with_redaction(TextRedactionPolicy::keep_last(4));
        assert_eq!(policy.apply(&AUTHORIZATION, &value("Bearer abcd1234")), "***********1234");
    }

    #[test]
    fn non_text_values_fall_back_to_marker() {
        let policy = HeaderPolicy::allow_list(Vec::<String>::new())
            .with_redaction(TextRedactionPolicy::keep_last(4));
        let binary = HeaderValue::from_bytes(&[0xfa, 0xfb, 0xfc]).unwrap();
        assert_eq!(policy.apply(&COOKIE, &binary), REDACTED_MARKER);
    }
}
