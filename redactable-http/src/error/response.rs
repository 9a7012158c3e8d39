//! Structured, redacted errors for unexpected HTTP responses.
//!
//! A [`ClientResponseError`] is assembled once from a response head, an
//! optional request head, a [`RedactionConfig`] and the outcome of at most one
//! body decode attempt. It is immutable afterwards and holds no I/O handles.
//! Formatting it never reveals values the configuration redacted.

use std::{convert::Infallible, error::Error, fmt};

use http::{Method, Response, StatusCode};

use super::{
    decode::{DecodeError, decode_text},
    head::{RequestHead, ResponseHead},
};
use crate::{
    policy::RedactionConfig,
    redaction::{RedactedHeaders, RedactedOutput, RedactedUri, ToRedactedOutput},
};

/// Result of trying to decode a response body.
#[derive(Clone, Debug)]
pub enum BodyOutcome<A> {
    /// The response carried no body.
    NoBody,
    /// The body decoded into a payload.
    Decoded(A),
    /// The body was present but could not be decoded.
    DecodeFailed(DecodeError),
}

impl<A> BodyOutcome<A> {
    /// Runs `decode` once over a non-empty body; an empty body is [`BodyOutcome::NoBody`].
    pub fn decode<D>(body: &[u8], decode: D) -> Self
    where
        D: FnOnce(&[u8]) -> Result<A, DecodeError>,
    {
        if body.is_empty() {
            return Self::NoBody;
        }
        match decode(body) {
            Ok(value) => Self::Decoded(value),
            Err(error) => Self::DecodeFailed(error),
        }
    }

    pub fn decoded(&self) -> Option<&A> {
        match self {
            Self::Decoded(value) => Some(value),
            Self::NoBody | Self::DecodeFailed(_) => None,
        }
    }

    pub fn decode_error(&self) -> Option<&DecodeError> {
        match self {
            Self::DecodeFailed(error) => Some(error),
            Self::NoBody | Self::Decoded(_) => None,
        }
    }

    pub fn is_no_body(&self) -> bool {
        matches!(self, Self::NoBody)
    }

    pub fn map<B, F>(self, transform: F) -> BodyOutcome<B>
    where
        F: FnOnce(A) -> B,
    {
        match self {
            Self::NoBody => BodyOutcome::NoBody,
            Self::Decoded(value) => BodyOutcome::Decoded(transform(value)),
            Self::DecodeFailed(error) => BodyOutcome::DecodeFailed(error),
        }
    }

    /// Like [`BodyOutcome::map`], recording a failed transform as `DecodeFailed`.
    pub fn and_then<B, F>(self, transform: F) -> BodyOutcome<B>
    where
        F: FnOnce(A) -> Result<B, DecodeError>,
    {
        match self {
            Self::NoBody => BodyOutcome::NoBody,
            Self::Decoded(value) => match transform(value) {
                Ok(value) => BodyOutcome::Decoded(value),
                Err(error) => BodyOutcome::DecodeFailed(error),
            },
            Self::DecodeFailed(error) => BodyOutcome::DecodeFailed(error),
        }
    }
}

/// Redacted request metadata. Method, headers and URI are always captured together.
#[derive(Clone, Debug)]
pub struct RequestDetails {
    method: Method,
    headers: RedactedHeaders,
    uri: RedactedUri,
}

impl RequestDetails {
    fn capture(config: &RedactionConfig, request: &dyn RequestHead) -> Self {
        Self {
            method: request.method().clone(),
            headers: config.redact_request_header_map(request.headers()),
            uri: config.redact_uri(request.uri()),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn headers(&self) -> &RedactedHeaders {
        &self.headers
    }

    pub fn uri(&self) -> &RedactedUri {
        &self.uri
    }
}

/// An unexpected HTTP response, safe to log.
///
/// ```
/// use http::{Response, StatusCode};
/// use redactable_http::{ClientResponseError, RedactionConfig};
///
/// let response = Response::builder()
///     .status(StatusCode::BAD_GATEWAY)
///     .header("x-custom-secret", "abc")
///     .body(Vec::new())
///     .unwrap();
/// let error = ClientResponseError::from_text_response(&RedactionConfig::default(), None, &response);
///
/// assert_eq!(error.to_string(), "Unexpected response from HTTP call: 502 Bad Gateway");
/// assert_eq!(error.response_headers().value()["x-custom-secret"], "<REDACTED>");
/// assert_eq!(error.response_headers().unredacted()["x-custom-secret"], "abc");
/// ```
#[derive(Clone)]
pub struct ClientResponseError<A> {
    status: StatusCode,
    request: Option<RequestDetails>,
    response_headers: RedactedHeaders,
    body: BodyOutcome<A>,
    body_text: Option<String>,
}

impl<A> ClientResponseError<A> {
    /// Assembles an error from an already-computed body outcome.
    ///
    /// `render` turns a decoded payload into display text; return `None` for
    /// payloads that must not be printed.
    pub fn from_outcome<Res, R>(
        config: &RedactionConfig,
        request: Option<&dyn RequestHead>,
        response: &Res,
        body: BodyOutcome<A>,
        render: R,
    ) -> Self
    where
        Res: ResponseHead + ?Sized,
        R: FnOnce(&A) -> Option<String>,
    {
        let body_text = body.decoded().and_then(render);
        Self {
            status: response.status(),
            request: request.map(|request| RequestDetails::capture(config, request)),
            response_headers: config.redact_response_header_map(response.headers()),
            body,
            body_text,
        }
    }

    /// Decodes the body of `response` once and assembles the error.
    pub fn from_optional_request<B, D, R>(
        config: &RedactionConfig,
        request: Option<&dyn RequestHead>,
        response: &Response<B>,
        decode: D,
        render: R,
    ) -> Self
    where
        B: AsRef<[u8]>,
        D: FnOnce(&[u8]) -> Result<A, DecodeError>,
        R: FnOnce(&A) -> Option<String>,
    {
        let body = BodyOutcome::decode(response.body().as_ref(), decode);
        Self::from_outcome(config, request, response, body, render)
    }

    /// For call sites where the request is no longer available.
    pub fn from_response<B, D, R>(
        config: &RedactionConfig,
        response: &Response<B>,
        decode: D,
        render: R,
    ) -> Self
    where
        B: AsRef<[u8]>,
        D: FnOnce(&[u8]) -> Result<A, DecodeError>,
        R: FnOnce(&A) -> Option<String>,
    {
        Self::from_optional_request(config, None, response, decode, render)
    }

    pub fn from_request_response<B, D, R>(
        config: &RedactionConfig,
        request: &dyn RequestHead,
        response: &Response<B>,
        decode: D,
        render: R,
    ) -> Self
    where
        B: AsRef<[u8]>,
        D: FnOnce(&[u8]) -> Result<A, DecodeError>,
        R: FnOnce(&A) -> Option<String>,
    {
        Self::from_optional_request(config, Some(request), response, decode, render)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn request(&self) -> Option<&RequestDetails> {
        self.request.as_ref()
    }

    pub fn request_method(&self) -> Option<&Method> {
        self.request.as_ref().map(RequestDetails::method)
    }

    pub fn request_headers(&self) -> Option<&RedactedHeaders> {
        self.request.as_ref().map(RequestDetails::headers)
    }

    pub fn request_uri(&self) -> Option<&RedactedUri> {
        self.request.as_ref().map(RequestDetails::uri)
    }

    pub fn response_headers(&self) -> &RedactedHeaders {
        &self.response_headers
    }

    pub fn body(&self) -> &BodyOutcome<A> {
        &self.body
    }

    pub fn into_body(self) -> BodyOutcome<A> {
        self.body
    }

    /// The rendered payload, when the body decoded and is printable.
    pub fn body_text(&self) -> Option<&str> {
        self.body_text.as_deref()
    }

    /// One-line summary naming the host (when known) and the status.
    pub fn primary_message(&self) -> String {
        match self.request_uri().and_then(|uri| uri.value().host()) {
            Some(host) => format!(
                "Unexpected response from HTTP call to {host}: {}",
                self.status
            ),
            None => format!("Unexpected response from HTTP call: {}", self.status),
        }
    }

    /// Detail lines in a fixed order; unknown fields are left out.
    pub fn secondary_messages(&self) -> Vec<String> {
        let mut messages = Vec::with_capacity(6);
        if let Some(request) = &self.request {
            messages.push(format!("Request URI: {}", request.uri));
            messages.push(format!("Request Method: {}", request.method));
        }
        messages.push(format!("Status: {}", self.status));
        messages.push(format!("Response Headers: {}", self.response_headers));
        if let Some(request) = &self.request {
            messages.push(format!("Request Headers: {}", request.headers));
        }
        if let Some(text) = &self.body_text {
            messages.push(format!("Body: {text}"));
        }
        messages
    }

    /// The decode failure, if any, for error-chaining facilities.
    pub fn causes(&self) -> Vec<&DecodeError> {
        self.body.decode_error().into_iter().collect()
    }

    /// Transforms the payload without touching the network.
    pub fn map<B, F, R>(self, transform: F, render: R) -> ClientResponseError<B>
    where
        F: FnOnce(A) -> B,
        R: FnOnce(&B) -> Option<String>,
    {
        let (parts, body) = self.into_parts();
        parts.rebuild(body.map(transform), render)
    }

    /// Fallible variant of [`ClientResponseError::map`]; a failed transform becomes `DecodeFailed`.
    pub fn try_map<B, F, R>(self, transform: F, render: R) -> ClientResponseError<B>
    where
        F: FnOnce(A) -> Result<B, DecodeError>,
        R: FnOnce(&B) -> Option<String>,
    {
        let (parts, body) = self.into_parts();
        parts.rebuild(body.and_then(transform), render)
    }

    /// Drops the payload. A recorded decode failure is kept.
    pub fn without_body(self) -> ClientResponseError<Infallible> {
        let (parts, body) = self.into_parts();
        let body = match body {
            BodyOutcome::NoBody | BodyOutcome::Decoded(_) => BodyOutcome::NoBody,
            BodyOutcome::DecodeFailed(error) => BodyOutcome::DecodeFailed(error),
        };
        parts.rebuild(body, |never| match *never {})
    }

    fn into_parts(self) -> (ErrorHead, BodyOutcome<A>) {
        let Self {
            status,
            request,
            response_headers,
            body,
            body_text: _,
        } = self;
        let head = ErrorHead {
            status,
            request,
            response_headers,
        };
        (head, body)
    }
}

/// Everything in a [`ClientResponseError`] that does not depend on the payload type.
struct ErrorHead {
    status: StatusCode,
    request: Option<RequestDetails>,
    response_headers: RedactedHeaders,
}

impl ErrorHead {
    fn rebuild<B, R>(self, body: BodyOutcome<B>, render: R) -> ClientResponseError<B>
    where
        R: FnOnce(&B) -> Option<String>,
    {
        let body_text = body.decoded().and_then(render);
        ClientResponseError {
            status: self.status,
            request: self.request,
            response_headers: self.response_headers,
            body,
            body_text,
        }
    }
}

impl ClientResponseError<String> {
    /// Text-bodied error: the body is decoded as UTF-8 and shown verbatim.
    pub fn from_text_response<B>(
        config: &RedactionConfig,
        request: Option<&dyn RequestHead>,
        response: &Response<B>,
    ) -> Self
    where
        B: AsRef<[u8]>,
    {
        Self::from_optional_request(config, request, response, decode_text, |text| {
            Some(text.clone())
        })
    }
}

impl ClientResponseError<Infallible> {
    /// Bodiless error built from response metadata alone.
    pub fn from_head<Res>(
        config: &RedactionConfig,
        request: Option<&dyn RequestHead>,
        response: &Res,
    ) -> Self
    where
        Res: ResponseHead + ?Sized,
    {
        Self::from_outcome(config, request, response, BodyOutcome::NoBody, |never| {
            match *never {}
        })
    }
}

impl<A> fmt::Display for ClientResponseError<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.primary_message())?;
        if f.alternate() {
            for message in self.secondary_messages() {
                write!(f, "\n  {message}")?;
            }
        }
        Ok(())
    }
}

/// Shows the outcome of the decode attempt but never the payload itself.
impl<A> fmt::Debug for ClientResponseError<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientResponseError")
            .field("status", &self.status)
            .field("request", &self.request)
            .field("response_headers", &self.response_headers)
            .field("body", &OutcomeTag(&self.body))
            .field("body_text", &self.body_text)
            .finish()
    }
}

struct OutcomeTag<'a, A>(&'a BodyOutcome<A>);

impl<A> fmt::Debug for OutcomeTag<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            BodyOutcome::NoBody => f.write_str("NoBody"),
            BodyOutcome::Decoded(_) => f.write_str("Decoded(..)"),
            BodyOutcome::DecodeFailed(error) => f.debug_tuple("DecodeFailed").field(error).finish(),
        }
    }
}

impl<A: fmt::Debug> Error for ClientResponseError<A> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.body
            .decode_error()
            .map(|error| -> &(dyn Error + 'static) { error })
    }
}

impl<A> ToRedactedOutput for ClientResponseError<A> {
    #[cfg(feature = "json")]
    fn to_redacted_output(&self) -> RedactedOutput {
        use serde_json::{Map, Value, json};

        use crate::redaction::headers_to_json;

        let mut object = Map::new();
        object.insert("message".into(), Value::String(self.primary_message()));
        object.insert("status".into(), json!(self.status.as_u16()));
        if let Some(request) = &self.request {
            object.insert(
                "request".into(),
                json!({
                    "method": request.method.as_str(),
                    "uri": request.uri.to_string(),
                    "headers": headers_to_json(request.headers.value()),
                }),
            );
        }
        object.insert(
            "response_headers".into(),
            headers_to_json(self.response_headers.value()),
        );
        if let Some(text) = &self.body_text {
            object.insert("body".into(), Value::String(text.clone()));
        }
        if let Some(error) = self.body.decode_error() {
            object.insert("decode_error".into(), Value::String(error.to_string()));
        }
        RedactedOutput::Json(Value::Object(object))
    }

    #[cfg(not(feature = "json"))]
    fn to_redacted_output(&self) -> RedactedOutput {
        RedactedOutput::Text(format!("{self:#}"))
    }
}
