use std::collections::HashMap;

use serde_json::{Map, Value};

/// HTTP methods used by the OortDB REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
        }
    }
}

/// Request describes one REST call: method, base API path, path suffix,
/// query parameters and an optional serialized body.
///
/// A descriptor is built once per call and handed to the connection; it is
/// never reused for a second call.
#[derive(Debug)]
pub struct Request {
    method: Method,
    base_path: String,
    path_suffix: String,
    query: HashMap<String, String>,
    body: Option<String>,
}

impl Request {
    /// Creates a descriptor for `method` against `base_path` plus `path_suffix`.
    ///
    /// Base paths come from [`crate::api::base_path`]; an empty one is a
    /// programmer error, not a runtime condition.
    pub fn new(method: Method, base_path: impl Into<String>, path_suffix: impl Into<String>) -> Self {
        let base_path = base_path.into();
        assert!(!base_path.is_empty(), "request base path must not be empty");

        Self {
            method,
            base_path,
            path_suffix: path_suffix.into(),
            query: HashMap::new(),
            body: None,
        }
    }

    /// Sets a query string parameter. Last write wins.
    pub fn set_query_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.query.insert(name.into(), value.into());
    }

    /// Sets the serialized request body. Last write wins.
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = Some(body.into());
    }

    /// Copies an optional builder parameter into the query string when the
    /// parameter set contains it. String values are used verbatim, anything
    /// else is rendered as JSON text.
    pub fn try_set_query_parameter(&mut self, name: &str, parameters: &Map<String, Value>) {
        if let Some(value) = parameters.get(name) {
            let text = match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            self.query.insert(name.to_string(), text);
        }
    }

    /// Copies an optional builder parameter into a body document when the
    /// parameter set contains it.
    pub fn try_set_body_parameter(
        name: &str,
        parameters: &Map<String, Value>,
        body: &mut Map<String, Value>,
    ) {
        if let Some(value) = parameters.get(name) {
            body.insert(name.to_string(), value.clone());
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn path_suffix(&self) -> &str {
        &self.path_suffix
    }

    pub fn query(&self) -> &HashMap<String, String> {
        &self.query
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Hands the body over to whoever executes the call.
    pub fn into_body(self) -> Option<String> {
        self.body
    }
}
