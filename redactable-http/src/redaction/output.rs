//! Output types for logging boundaries.
//!
//! - [`RedactedOutput`]: the output enum (Text or Json)
//! - [`ToRedactedOutput`]: types that can produce logging-safe output
//!
//! Implementations only ever read the redacted side of a [`Redacted`] view.

use http::{HeaderMap, Uri};
#[cfg(feature = "json")]
use serde_json::{Map as JsonMap, Value as JsonValue};

use super::view::Redacted;

/// Output produced at a logging boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RedactedOutput {
    Text(String),
    #[cfg(feature = "json")]
    Json(JsonValue),
}

impl RedactedOutput {
    /// Flattens the output into a single string.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            #[cfg(feature = "json")]
            Self::Json(json) => json.to_string(),
        }
    }
}

/// Produces a logging-safe output representation.
pub trait ToRedactedOutput {
    #[must_use]
    fn to_redacted_output(&self) -> RedactedOutput;
}

impl ToRedactedOutput for RedactedOutput {
    fn to_redacted_output(&self) -> RedactedOutput {
        self.clone()
    }
}

impl ToRedactedOutput for Redacted<HeaderMap> {
    #[cfg(feature = "json")]
    fn to_redacted_output(&self) -> RedactedOutput {
        RedactedOutput::Json(headers_to_json(self.value()))
    }

    #[cfg(not(feature = "json"))]
    fn to_redacted_output(&self) -> RedactedOutput {
        RedactedOutput::Text(self.to_string())
    }
}

impl ToRedactedOutput for Redacted<Uri> {
    fn to_redacted_output(&self) -> RedactedOutput {
        RedactedOutput::Text(self.to_string())
    }
}

/// Renders a header map as a JSON object; repeated names become arrays.
#[cfg(feature = "json")]
pub(crate) fn headers_to_json(headers: &HeaderMap) -> JsonValue {
    let mut object = JsonMap::with_capacity(headers.keys_len());
    for name in headers.keys() {
        let mut values = headers
            .get_all(name)
            .iter()
            .map(|value| JsonValue::String(String::from_utf8_lossy(value.as_bytes()).into_owned()))
            .collect::<Vec<_>>();
        let entry = if values.len() == 1 {
            values.swap_remove(0)
        } else {
            JsonValue::Array(values)
        };
        object.insert(name.as_str().to_owned(), entry);
    }
    JsonValue::Object(object)
}
