//! Adapters for emitting redacted values through `slog`.
//!
//! Every `slog::Value` here is derived from [`ToRedactedOutput`], so only the
//! redacted side of a view reaches the serializer. JSON outputs are emitted as
//! nested values; text outputs as plain strings.

use slog::{Key, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::{
    error::ClientResponseError,
    redaction::{RedactedHeaders, RedactedOutput, RedactedUri, ToRedactedOutput},
};

/// Marker trait for types whose `slog` integration always emits redacted output.
///
/// ```compile_fail
/// use redactable_http::slog::SlogRedacted;
///
/// fn assert_slog_redacted<T: SlogRedacted>() {}
///
/// assert_slog_redacted::<http::HeaderMap>();
/// ```
pub trait SlogRedacted: SlogValue {}

impl<T: SlogRedacted + ?Sized> SlogRedacted for &T {}

fn emit_output(
    output: &RedactedOutput,
    record: &Record<'_>,
    key: Key,
    serializer: &mut dyn Serializer,
) -> SlogResult {
    match output {
        RedactedOutput::Text(text) => serializer.emit_str(key, text),
        RedactedOutput::Json(json) => {
            let nested = slog::Serde(json.clone());
            SlogValue::serialize(&nested, record, key, serializer)
        }
    }
}

impl SlogValue for RedactedOutput {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        emit_output(self, record, key, serializer)
    }
}

impl SlogRedacted for RedactedOutput {}

impl SlogValue for RedactedHeaders {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        emit_output(&self.to_redacted_output(), record, key, serializer)
    }
}

impl SlogRedacted for RedactedHeaders {}

impl SlogValue for RedactedUri {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        emit_output(&self.to_redacted_output(), record, key, serializer)
    }
}

impl SlogRedacted for RedactedUri {}

impl<A> SlogValue for ClientResponseError<A> {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        emit_output(&self.to_redacted_output(), record, key, serializer)
    }
}

impl<A> SlogRedacted for ClientResponseError<A> {}
