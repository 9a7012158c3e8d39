//! Redaction policies and structured errors for HTTP clients.
//!
//! This crate separates:
//! - **Policies**: which header values and query parameter values are safe to
//!   show ([`HeaderPolicy`], [`QueryParamPolicy`], bundled in [`RedactionConfig`]).
//! - **Views**: a [`Redacted`] value pairs the redacted form with the
//!   original so callers choose which side they read.
//! - **Errors**: [`ClientResponseError`] describes an unexpected response
//!   using redacted views only.
//! - **Middleware** (`layer` feature): a tower layer that raises structured
//!   error bodies as errors while reading each body at most once.
//!
//! What this crate does not do:
//! - send requests or own a transport
//! - retry or back off
//!
//! Logging integrations live behind the `tracing` and `slog` features.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::result_large_err,
    clippy::future_not_send,
    clippy::option_if_let_else,
    clippy::type_complexity
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

// Module declarations
pub mod error;
#[cfg(feature = "layer")]
pub mod layer;
pub mod policy;
#[cfg(feature = "json")]
pub mod problem;
pub mod redaction;
#[cfg(feature = "slog")]
pub mod slog;
#[cfg(feature = "tracing")]
pub mod tracing;

// Re-exports from error module
#[cfg(feature = "json")]
pub use error::decode_json;
pub use error::{
    BodyOutcome, BoxError, ClientResponseError, DecodeError, RequestDetails, RequestHead,
    RequestSnapshot, ResponseHead, decode_text,
};
// Re-exports from layer module
#[cfg(feature = "layer")]
pub use layer::{Intercept, InterceptError, InterceptLayer, ReplayBody};
// Re-exports from policy module
pub use policy::{
    AllowList, DEFAULT_ALLOWED_HEADERS, HeaderPolicy, HeaderRule, KeepConfig, MASK_CHAR,
    MaskConfig, QueryParamPolicy, QueryRule, REDACTED_MARKER, RedactionConfig,
    TextRedactionPolicy,
};
#[cfg(feature = "json")]
pub use problem::{APPLICATION_PROBLEM_JSON, ProblemDetails};
// Re-exports from redaction module
pub use redaction::{Redacted, RedactedHeaders, RedactedOutput, RedactedUri, ToRedactedOutput};
#[cfg(feature = "slog")]
pub use self::slog::SlogRedacted;
#[cfg(feature = "tracing")]
pub use self::tracing::{TracingRedacted, TracingRedactedExt};
