use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::transport::TransportError;

/// Structural classification of a response body, derived from its first
/// non-whitespace character without parsing the JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Empty or whitespace-only body.
    Null,
    /// A bare scalar such as `true` or `42`.
    Primitive,
    /// A JSON object.
    Document,
    /// A JSON array.
    List,
}

impl BodyKind {
    /// Classifies a raw body. Purely structural; does not validate syntax.
    pub fn classify(body: &str) -> Self {
        match body.trim_start().chars().next() {
            None => BodyKind::Null,
            Some('[') => BodyKind::List,
            Some('{') => BodyKind::Document,
            Some(_) => BodyKind::Primitive,
        }
    }
}

/// Response captures one completed (or failed) round trip: status code,
/// headers, raw body text and the classified body kind.
///
/// An HTTP error status still yields a well-formed envelope; only a round
/// trip that produced no status at all carries a transport error, with the
/// status left at the `0` sentinel.
#[derive(Debug)]
pub struct Response {
    status: u16,
    headers: HashMap<String, String>,
    body: String,
    body_kind: BodyKind,
    transport_error: Option<TransportError>,
}

impl Response {
    /// Builds the envelope for a completed exchange. The body kind is
    /// computed here so no caller ever observes an unclassified body.
    pub fn received(status: u16, headers: Vec<(String, String)>, body: String) -> Self {
        let headers = headers
            .into_iter()
            .map(|(name, value)| (name.to_lowercase(), value))
            .collect();
        let body_kind = BodyKind::classify(&body);

        Self {
            status,
            headers,
            body,
            body_kind,
            transport_error: None,
        }
    }

    /// Builds the envelope for a round trip that never completed.
    pub fn failed(cause: TransportError) -> Self {
        Self {
            status: 0,
            headers: HashMap::new(),
            body: String::new(),
            body_kind: BodyKind::Null,
            transport_error: Some(cause),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Looks up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn body_kind(&self) -> BodyKind {
        self.body_kind
    }

    pub fn transport_error(&self) -> Option<&TransportError> {
        self.transport_error.as_ref()
    }

    /// Deserializes the body into `T`. An empty or whitespace-only body
    /// yields `T::default()` without touching the parser; anything else
    /// must be valid JSON of the expected shape, and a mismatch surfaces
    /// as a serialization error signalling a client/server contract bug.
    pub fn parse_body<T>(&self) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        if self.body.trim().is_empty() {
            return Ok(T::default());
        }

        Ok(serde_json::from_str(&self.body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_kind_is_a_pure_function_of_the_first_character() {
        assert_eq!(BodyKind::classify(""), BodyKind::Null);
        assert_eq!(BodyKind::classify("   \n\t "), BodyKind::Null);
        assert_eq!(BodyKind::classify("[1,2]"), BodyKind::List);
        assert_eq!(BodyKind::classify("{\"a\":1}"), BodyKind::Document);
        assert_eq!(BodyKind::classify("true"), BodyKind::Primitive);
        assert_eq!(BodyKind::classify("42"), BodyKind::Primitive);
        assert_eq!(BodyKind::classify("\"text\""), BodyKind::Primitive);
    }

    #[test]
    fn test_whitespace_padding_never_changes_classification() {
        for (body, kind) in [
            ("[]", BodyKind::List),
            ("{}", BodyKind::Document),
            ("7", BodyKind::Primitive),
        ] {
            let padded = format!("  \n\t {body}");
            assert_eq!(BodyKind::classify(body), kind);
            assert_eq!(BodyKind::classify(&padded), kind);
            // reclassifying yields the same answer
            assert_eq!(BodyKind::classify(&padded), BodyKind::classify(&padded));
        }
    }

    #[test]
    fn test_classification_does_not_validate_syntax() {
        // Truncated JSON still classifies by its first character.
        assert_eq!(BodyKind::classify("[1, 2"), BodyKind::List);
        assert_eq!(BodyKind::classify("{\"unterminated"), BodyKind::Document);
    }

    #[test]
    fn test_received_classifies_and_lowercases_headers() {
        let response = Response::received(
            200,
            vec![("ETag".to_string(), "\"rev1\"".to_string())],
            "[]".to_string(),
        );

        assert_eq!(response.status(), 200);
        assert_eq!(response.body_kind(), BodyKind::List);
        assert_eq!(response.header("etag"), Some("\"rev1\""));
        assert_eq!(response.header("Etag"), Some("\"rev1\""));
        assert!(response.transport_error().is_none());
    }

    #[test]
    fn test_failed_uses_the_status_sentinel() {
        let response = Response::failed(TransportError::timeout("no reply"));

        assert_eq!(response.status(), 0);
        assert_eq!(response.body_kind(), BodyKind::Null);
        assert!(response.transport_error().is_some());
    }

    #[test]
    fn test_parse_body_defaults_on_empty() {
        let empty = Response::received(200, Vec::new(), String::new());
        let padded = Response::received(200, Vec::new(), "  \n ".to_string());

        let value: Vec<String> = empty.parse_body().unwrap();
        assert!(value.is_empty());
        let value: bool = padded.parse_body().unwrap();
        assert!(!value);
    }

    #[test]
    fn test_parse_body_surfaces_contract_violations() {
        let response = Response::received(200, Vec::new(), "{not json".to_string());
        let parsed: Result<Vec<String>> = response.parse_body();

        assert!(parsed.is_err());
    }
}
