use thiserror::Error;
use url::Url;

use crate::request::Method;

/// One fully assembled HTTP call, ready for a transport to execute.
#[derive(Debug, Clone)]
pub struct HttpCall {
    pub method: Method,
    pub url: Url,
    pub basic_auth: Option<(String, String)>,
    pub body: Option<String>,
}

/// Raw outcome of a completed round trip, before classification.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Transport trait for executing HTTP calls
///
/// Any completed exchange is `Ok`, whatever its status code; `Err` is
/// reserved for round trips that never produced a status at all.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, call: HttpCall) -> Result<RawResponse, TransportError>;
}

/// Failure of the round trip itself: the request never reached the server
/// or the reply never made it back.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The transport gave up waiting for the server.
    Timeout,
    /// The endpoint could not be reached.
    Connect,
    /// Anything else the transport reported.
    Other,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, message)
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connect, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Other, message)
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == TransportErrorKind::Timeout
    }
}
