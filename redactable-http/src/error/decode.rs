//! The failure recorded when a response body cannot be decoded.

use std::{error::Error, fmt, sync::Arc};

/// Boxed error type used at the middleware and decoder seams.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// A response body could not be decoded into the expected payload type.
///
/// Cheap to clone: the underlying error is shared.
#[derive(Clone)]
pub struct DecodeError {
    inner: Arc<dyn Error + Send + Sync + 'static>,
}

impl DecodeError {
    /// Wraps any error value.
    pub fn new<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            inner: Arc::from(error.into()),
        }
    }

    /// Builds a decode error from a plain message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(Message(message.into()))
    }

    /// The wrapped error.
    pub fn get_ref(&self) -> &(dyn Error + Send + Sync + 'static) {
        &*self.inner
    }

    /// Attempts to downcast the wrapped error to a concrete type.
    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }
}

impl fmt::Debug for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DecodeError").field(&self.inner).finish()
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to decode response body: {}", self.inner)
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&*self.inner)
    }
}

impl From<std::str::Utf8Error> for DecodeError {
    fn from(error: std::str::Utf8Error) -> Self {
        Self::new(error)
    }
}

impl From<std::string::FromUtf8Error> for DecodeError {
    fn from(error: std::string::FromUtf8Error) -> Self {
        Self::new(error)
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for DecodeError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(error)
    }
}

/// Decodes a JSON body with `serde_json`.
#[cfg(feature = "json")]
pub fn decode_json<T>(body: &[u8]) -> Result<T, DecodeError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_slice(body).map_err(DecodeError::from)
}

/// Decodes a UTF-8 text body.
pub fn decode_text(body: &[u8]) -> Result<String, DecodeError> {
    Ok(std::str::from_utf8(body)?.to_owned())
}

#[derive(Debug)]
struct Message(String);

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for Message {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_errors_display_with_context() {
        let error = DecodeError::msg("unexpected end of input");
        assert_eq!(
            error.to_string(),
            "failed to decode response body: unexpected end of input"
        );
        assert_eq!(
            error.source().map(ToString::to_string).as_deref(),
            Some("unexpected end of input")
        );
    }

    #[test]
    fn text_decoding_rejects_invalid_utf8() {
        assert_eq!(decode_text(b"plain").unwrap(), "plain");
        let error = decode_text(&[0xff, 0xfe]).unwrap_err();
        assert!(error.downcast_ref::<std::str::Utf8Error>().is_some());
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_errors_are_downcastable() {
        let error = decode_json::<serde_json::Value>(b"{not json").unwrap_err();
        assert!(error.downcast_ref::<serde_json::Error>().is_some());
        let clone = error.clone();
        assert_eq!(clone.to_string(), error.to_string());
    }
}
