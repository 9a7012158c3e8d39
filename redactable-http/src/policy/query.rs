//! Redaction policies for URI query parameter values.
//!
//! Keys are never rewritten and an absent value (`?flag`) stays absent. Key
//! matching in allow-lists uses the same case folding as header names.

use std::{borrow::Cow, fmt, sync::Arc};

use super::{
    allow_list::AllowList,
    text::{REDACTED_MARKER, TextRedactionPolicy},
};

type QueryRuleFn = dyn Fn(&str, &str) -> Option<String> + Send + Sync;

/// A partial override consulted before a fallback query policy.
///
/// The rule sees the decoded key and value of parameters that carry a value.
#[derive(Clone)]
pub struct QueryRule(Arc<QueryRuleFn>);

impl QueryRule {
    pub fn new<F>(rule: F) -> Self
    where
        F: Fn(&str, &str) -> Option<String> + Send + Sync + 'static,
    {
        Self(Arc::new(rule))
    }

    /// Always redacts the value of `key` (case-insensitive).
    pub fn deny(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(move |candidate, _| {
            candidate
                .eq_ignore_ascii_case(&key)
                .then(|| REDACTED_MARKER.to_owned())
        })
    }

    /// Always reveals the value of `key` (case-insensitive).
    pub fn allow(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(move |candidate, value| {
            candidate
                .eq_ignore_ascii_case(&key)
                .then(|| value.to_owned())
        })
    }
}

impl fmt::Debug for QueryRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("QueryRule(..)")
    }
}

/// Decides whether a query parameter value may be revealed.
#[derive(Clone, Debug)]
pub enum QueryParamPolicy {
    /// Never redacts.
    Identity,
    /// Reveals values whose key is in `allowed`; rewrites the rest with `redaction`.
    AllowList {
        allowed: AllowList,
        redaction: TextRedactionPolicy,
    },
    /// Consults `rule` first and defers to `fallback` when it declines.
    OrElse {
        rule: QueryRule,
        fallback: Box<QueryParamPolicy>,
    },
}

impl QueryParamPolicy {
    #[must_use]
    pub fn identity() -> Self {
        Self::Identity
    }

    /// Reveals only the values of the named keys (case-insensitive).
    pub fn allow_list<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::AllowList {
            allowed: AllowList::new(keys),
            redaction: TextRedactionPolicy::default_full(),
        }
    }

    /// Redacts every value. Used by the default configuration.
    #[must_use]
    pub fn redact_all() -> Self {
        Self::allow_list(std::iter::empty::<&str>())
    }

    #[must_use]
    pub fn or_else(rule: QueryRule, fallback: Self) -> Self {
        Self::OrElse {
            rule,
            fallback: Box::new(fallback),
        }
    }

    /// Wraps an arbitrary total function over decoded key and value.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        Self::or_else(
            QueryRule::new(move |key, value| Some(f(key, value))),
            Self::Identity,
        )
    }

    #[must_use]
    pub fn with_rule(self, rule: QueryRule) -> Self {
        Self::or_else(rule, self)
    }

    /// Replaces how rejected values are rewritten.
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

    /// Returns the value to display for `key`.
    ///
    /// `None` stays `None`; the marker stays the marker.
    #[must_use]
    pub fn apply<'a>(&self, key: &str, value: Option<&'a str>) -> Option<Cow<'a, str>> {
        let value = value?;
        if value == REDACTED_MARKER {
            return Some(Cow::Borrowed(value));
        }
        Some(self.apply_inner(key, value))
    }

    fn apply_inner<'a>(&self, key: &str, value: &'a str) -> Cow<'a, str> {
        match self {
            Self::Identity => Cow::Borrowed(value),
            Self::AllowList { allowed, redaction } => {
                if allowed.contains(key) {
                    Cow::Borrowed(value)
                } else {
                    Cow::Owned(redaction.apply_to(value))
                }
            }
            Self::OrElse { rule, fallback } => match (rule.0)(key, value) {
                Some(rewritten) => Cow::Owned(rewritten),
                None => fallback.apply_inner(key, value),
            },
        }
    }
}

impl Default for QueryParamPolicy {
    fn default() -> Self {
        Self::redact_all()
    }
}
