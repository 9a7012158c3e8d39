//! Integration tests for the slog module.
//!
//! These tests verify that:
//! - the `slog::Value` implementations emit only redacted data
//! - JSON outputs reach the serializer as nested values

#![cfg(feature = "slog")]

use std::{cell::RefCell, collections::HashMap, fmt::Arguments};

use http::{Request, Response};
use redactable_http::{
    ClientResponseError, REDACTED_MARKER, RedactedOutput, RedactionConfig, slog::SlogRedacted,
};
use serde_json::Value as JsonValue;

// A test serializer that captures serialized key-value pairs
struct CapturingSerializer {
    captured: RefCell<HashMap<String, CapturedValue>>,
}

#[derive(Debug, Clone, PartialEq)]
enum CapturedValue {
    Str(String),
    Serde(JsonValue),
    Other,
}

impl CapturingSerializer {
    fn new() -> Self {
        Self {
            captured: RefCell::new(HashMap::new()),
        }
    }

    fn get(&self, key: &str) -> Option<CapturedValue> {
        self.captured.borrow().get(key).cloned()
    }

    fn insert(&self, key: slog::Key, value: CapturedValue) -> slog::Result {
        self.captured.borrow_mut().insert(key.into(), value);
        Ok(())
    }
}

impl slog::Serializer for CapturingSerializer {
    fn emit_arguments(&mut self, key: slog::Key, val: &Arguments<'_>) -> slog::Result {
        self.insert(key, CapturedValue::Str(val.to_string()))
    }

    fn emit_str(&mut self, key: slog::Key, val: &str) -> slog::Result {
        self.insert(key, CapturedValue::Str(val.into()))
    }

    fn emit_unit(&mut self, key: slog::Key) -> slog::Result {
        self.insert(key, CapturedValue::Other)
    }

    fn emit_none(&mut self, key: slog::Key) -> slog::Result {
        self.insert(key, CapturedValue::Other)
    }

    fn emit_serde(&mut self, key: slog::Key, val: &dyn slog::SerdeValue) -> slog::Result {
        let json = serde_json::to_value(val.as_serde()).unwrap_or(JsonValue::Null);
        self.insert(key, CapturedValue::Serde(json))
    }
}

fn serialize_to_capture<V: slog::Value>(value: &V, key: &'static str) -> CapturedValue {
    static RS: slog::RecordStatic<'static> = slog::record_static!(slog::Level::Info, "");
    let args = format_args!("");
    let record = slog::Record::new(&RS, &args, slog::b!());
    let mut serializer = CapturingSerializer::new();
    value.serialize(&record, key, &mut serializer).unwrap();
    serializer.get(key).expect("value was emitted")
}

fn client_error() -> ClientResponseError<String> {
    let request = Request::post("https://api.example.com/payments?card=4111111111111111")
        .header("authorization", "Bearer t0ps3cret")
        .header("content-type", "application/json")
        .body(())
        .unwrap();
    let response = Response::builder()
        .status(402)
        .header("x-custom-secret", "abc")
        .header("content-type", "text/plain")
        .body(b"insufficient funds".to_vec())
        .unwrap();
    ClientResponseError::from_request_response(
        &RedactionConfig::default(),
        &request,
        &response,
        redactable_http::decode_text,
        |text| Some(text.clone()),
    )
}

mod marker_trait {
    use super::*;

    #[test]
    fn crate_views_implement_slog_redacted() {
        fn assert_slog_redacted<T: SlogRedacted>() {}

        assert_slog_redacted::<RedactedOutput>();
        assert_slog_redacted::<redactable_http::RedactedHeaders>();
        assert_slog_redacted::<redactable_http::RedactedUri>();
        assert_slog_redacted::<ClientResponseError<String>>();
        assert_slog_redacted::<&ClientResponseError<String>>();
    }
}

mod client_response_error {
    use super::*;

    #[test]
    fn logs_as_nested_json() {
        let CapturedValue::Serde(json) = serialize_to_capture(&client_error(), "error") else {
            panic!("expected a nested value for 'error'");
        };

        assert_eq!(
            json["message"],
            "Unexpected response from HTTP call to api.example.com: 402 Payment Required"
        );
        assert_eq!(json["status"], 402);
        assert_eq!(json["request"]["method"], "POST");
        assert_eq!(
            json["request"]["uri"],
            "https://api.example.com/payments?card=%3CREDACTED%3E"
        );
        assert_eq!(json["request"]["headers"]["authorization"], REDACTED_MARKER);
        assert_eq!(json["request"]["headers"]["content-type"], "application/json");
        assert_eq!(json["response_headers"]["x-custom-secret"], REDACTED_MARKER);
        assert_eq!(json["body"], "insufficient funds");
    }

    #[test]
    fn never_emits_secret_values() {
        let captured = serialize_to_capture(&client_error(), "error");
        let rendered = format!("{captured:?}");
        assert!(!rendered.contains("t0ps3cret"));
        assert!(!rendered.contains("4111111111111111"));
        assert!(!rendered.contains("abc"));
    }
}

mod views {
    use http::{HeaderMap, HeaderValue, Uri};

    use super::*;

    #[test]
    fn header_views_log_as_objects() {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", HeaderValue::from_static("sid=s3ss10n"));
        headers.insert("accept", HeaderValue::from_static("*/*"));
        let redacted = RedactionConfig::default().redact_request_header_map(&headers);

        assert_eq!(
            serialize_to_capture(&redacted, "headers"),
            CapturedValue::Serde(serde_json::json!({
                "cookie": REDACTED_MARKER,
                "accept": "*/*",
            }))
        );
    }

    #[test]
    fn uri_views_log_as_strings() {
        let uri: Uri = "https://example.com/cb?code=xyz".parse().unwrap();
        let redacted = RedactionConfig::default().redact_uri(&uri);

        assert_eq!(
            serialize_to_capture(&redacted, "uri"),
            CapturedValue::Str("https://example.com/cb?code=%3CREDACTED%3E".into())
        );
    }

    #[test]
    fn text_outputs_log_as_strings() {
        let output = RedactedOutput::Text("already redacted".into());
        assert_eq!(
            serialize_to_capture(&output, "note"),
            CapturedValue::Str("already redacted".into())
        );
    }
}
