//! Redaction policies for headers and query parameters.
//!
//! This module provides:
//!
//! - **Allow lists** (`allow_list`): case-insensitive name sets, including the
//!   default public header set.
//! - **Header and query policies** (`header`, `query`): pure, total functions
//!   deciding whether a value may be revealed, composable with `or_else`.
//! - **Text strategies** (`text`): how a rejected value is rewritten.
//! - **Configuration** (`config`): [`RedactionConfig`], the bundle applied to
//!   one exchange.
//!
//! # Example
//!
//! ```rust
//! use http::{HeaderName, HeaderValue};
//! use redactable_http::{HeaderPolicy, HeaderRule, REDACTED_MARKER, TextRedactionPolicy};
//!
//! let policy = HeaderPolicy::default_headers()
//!     .with_redaction(TextRedactionPolicy::keep_last(4))
//!     .with_rule(HeaderRule::deny(HeaderName::from_static("cookie")));
//!
//! let key = HeaderValue::from_static("sk_live_abc123");
//! let cookie = HeaderValue::from_static("sid=abc123");
//! assert_eq!(policy.apply(&HeaderName::from_static("x-api-key"), &key), "**********c123");
//! assert_eq!(policy.apply(&HeaderName::from_static("cookie"), &cookie), REDACTED_MARKER);
//! ```

pub mod allow_list;
pub mod config;
pub mod header;
pub mod query;
pub mod text;

pub use allow_list::{AllowList, DEFAULT_ALLOWED_HEADERS};
pub use config::RedactionConfig;
pub use header::{HeaderPolicy, HeaderRule};
pub use query::{QueryParamPolicy, QueryRule};
pub use text::{KeepConfig, MASK_CHAR, MaskConfig, REDACTED_MARKER, TextRedactionPolicy};
