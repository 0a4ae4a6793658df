use std::sync::Arc;

use serde::Serialize;
use url::Url;

use oortdb_core::error::Result;
use oortdb_core::options::JsonOptions;
use oortdb_core::outcome::{self, FailurePolicy, StatusMap};
use oortdb_core::request::Request;
use oortdb_core::response::Response;
use oortdb_core::result::ApiResult;
use oortdb_core::transport::{HttpCall, Transport};

use crate::transport::HttpTransport;

/// A named, configured endpoint. Executes request descriptors and owns the
/// serialization options and failure policy applied to every call.
///
/// Configuration is fixed once calls start; share a connection across
/// tasks through an `Arc`.
pub struct Connection {
    alias: String,
    endpoint: Url,
    database: Option<String>,
    username: Option<String>,
    password: Option<String>,
    json_options: JsonOptions,
    policy: FailurePolicy,
    transport: Arc<dyn Transport>,
}

impl Connection {
    /// Creates a connection known under `alias` against `endpoint`.
    pub fn new(alias: impl Into<String>, endpoint: &str) -> Result<Self> {
        Ok(Self {
            alias: alias.into(),
            endpoint: Url::parse(endpoint)?,
            database: None,
            username: None,
            password: None,
            json_options: JsonOptions::default(),
            policy: FailurePolicy::default(),
            transport: Arc::new(HttpTransport::new()?),
        })
    }

    /// Scopes every request on this connection to a database.
    pub fn with_database(mut self, name: impl Into<String>) -> Self {
        self.database = Some(name.into());
        self
    }

    /// Uses basic authentication for every request on this connection.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_json_options(mut self, options: JsonOptions) -> Self {
        self.json_options = options;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Swaps the transport; tests use this to stub out the network.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Serializes a request payload under this connection's JSON options.
    pub fn to_json<T: Serialize>(&self, value: &T) -> Result<String> {
        self.json_options.to_json(value)
    }

    /// Executes one round trip. Any HTTP status yields a well-formed
    /// envelope; only a failed round trip produces a transport-error
    /// envelope with the `0` status sentinel.
    pub async fn send(&self, request: Request) -> Response {
        let url = self.request_url(&request);
        tracing::debug!(method = request.method().as_str(), url = %url, "sending request");

        let call = HttpCall {
            method: request.method(),
            url,
            basic_auth: self.credentials(),
            body: request.into_body(),
        };

        match self.transport.execute(call).await {
            Ok(raw) => Response::received(raw.status, raw.headers, raw.body),
            Err(cause) => Response::failed(cause),
        }
    }

    /// Sends the request and completes it against the operation's status
    /// map under this connection's failure policy.
    pub async fn execute<T, F>(
        &self,
        request: Request,
        map: &StatusMap,
        shape: F,
    ) -> Result<ApiResult<T>>
    where
        F: FnOnce(&Response) -> Result<Option<T>>,
    {
        let response = self.send(request).await;
        outcome::complete(response, map, self.policy, shape)
    }

    /// Fully qualified URL: endpoint, optional `/_db/{name}` segment, base
    /// path, suffix and the percent-encoded query string. Path segments go
    /// through the segment encoder, so a `%` in a document key stays a
    /// valid escape on the wire.
    fn request_url(&self, request: &Request) -> Url {
        let mut url = self.endpoint.clone();

        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            if let Some(database) = &self.database {
                segments.push("_db").push(database);
            }
            let path = format!("{}{}", request.base_path(), request.path_suffix());
            segments.extend(path.split('/').filter(|segment| !segment.is_empty()));
        }

        if !request.query().is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in request.query() {
                pairs.append_pair(name, value);
            }
        }

        url
    }

    fn credentials(&self) -> Option<(String, String)> {
        self.username
            .as_ref()
            .map(|username| (username.clone(), self.password.clone().unwrap_or_default()))
    }
}
