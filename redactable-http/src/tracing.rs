//! Adapters for emitting redacted values through `tracing`.
//!
//! ```
//! use http::Response;
//! use redactable_http::{ClientResponseError, RedactionConfig, tracing::TracingRedactedExt};
//!
//! let response = Response::builder().status(500).body(Vec::new()).unwrap();
//! let error = ClientResponseError::from_text_response(&RedactionConfig::default(), None, &response);
//!
//! tracing::warn!(error = %error.tracing_redacted(), "upstream call failed");
//! ```

use tracing::field::{DisplayValue, display};

use crate::redaction::{RedactedOutput, ToRedactedOutput};

/// Extension trait for logging redacted values as display strings.
///
/// The output is a flat string. JSON outputs are rendered compactly.
pub trait TracingRedactedExt {
    /// Wraps the redacted form of the value as a `tracing` display value.
    fn tracing_redacted(&self) -> DisplayValue<String>;
}

impl<T> TracingRedactedExt for T
where
    T: ToRedactedOutput + ?Sized,
{
    fn tracing_redacted(&self) -> DisplayValue<String> {
        display(self.to_redacted_output().into_text())
    }
}

/// Marker for types whose `tracing` output is always redacted.
///
/// Implemented for the redacted views and errors of this crate only.
pub trait TracingRedacted {}

impl TracingRedacted for RedactedOutput {}

impl TracingRedacted for crate::redaction::RedactedHeaders {}

impl TracingRedacted for crate::redaction::RedactedUri {}

impl<A> TracingRedacted for crate::error::ClientResponseError<A> {}
