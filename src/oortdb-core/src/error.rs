use serde::Deserialize;
use thiserror::Error;

use crate::response::{BodyKind, Response};
use crate::transport::TransportError;

pub type Result<T> = std::result::Result<T, Error>;

/// Message used when a failing response carries no usable error detail.
const FALLBACK_MESSAGE: &str = "request failed";

#[derive(Debug, Error)]
pub enum Error {
    /// The round trip itself never completed.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// A completed call whose status the operation marks as failure,
    /// raised under [`crate::outcome::FailurePolicy::Raise`].
    #[error("server error: {0}")]
    Api(#[from] ServerError),

    /// JSON encode/decode failure. On the decode side this signals a
    /// client/server contract violation and is never folded into a result
    /// envelope.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A value that must match a wire format rule did not.
    #[error("specified {what} value '{value}' has invalid format")]
    InvalidFormat { what: &'static str, value: String },

    /// Connection alias registered twice.
    #[error("connection alias '{0}' is already registered")]
    DuplicateAlias(String),

    /// Connection alias not registered.
    #[error("no connection registered under alias '{0}'")]
    UnknownAlias(String),

    /// Endpoint URL could not be parsed.
    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

/// Where the detail of a [`ServerError`] came from.
///
/// A failing body with no detail and a malformed one are distinct origins,
/// so callers can tell "the server sent nothing" from "the server sent
/// something unreadable".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorOrigin {
    /// The server supplied error fields in the response body.
    Reported,
    /// The failing response carried no error detail.
    Absent,
    /// The body looked like an error document but could not be parsed.
    Malformed,
    /// The round trip itself failed before any status existed.
    Transport,
}

/// Normalized failure record produced for every failing call, whatever
/// endpoint it came from.
#[derive(Debug, Clone, Error)]
#[error("{message} (status {status}, errorNum {error_num})")]
pub struct ServerError {
    pub status: u16,
    pub error_num: i64,
    pub message: String,
    pub origin: ErrorOrigin,
}

/// Error document shape the server puts in failing response bodies.
#[derive(Debug, Deserialize)]
struct WireError {
    #[serde(rename = "errorNum")]
    error_num: Option<i64>,
    #[serde(rename = "errorMessage")]
    error_message: Option<String>,
}

impl ServerError {
    /// Translates a failing response into a structured error.
    ///
    /// Document-shaped bodies are mined for `errorNum`/`errorMessage`
    /// fields; everything else falls back to a generic record carrying
    /// only the status code. This never fails to produce an error.
    pub fn from_response(response: &Response) -> Self {
        let status = response.status();

        if response.body_kind() != BodyKind::Document {
            return Self {
                status,
                error_num: 0,
                message: FALLBACK_MESSAGE.to_string(),
                origin: ErrorOrigin::Absent,
            };
        }

        match serde_json::from_str::<WireError>(response.body()) {
            Ok(wire) => {
                let reported = wire.error_num.is_some() || wire.error_message.is_some();
                Self {
                    status,
                    error_num: wire.error_num.unwrap_or(0),
                    message: wire
                        .error_message
                        .unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
                    origin: if reported {
                        ErrorOrigin::Reported
                    } else {
                        ErrorOrigin::Absent
                    },
                }
            }
            Err(_) => Self {
                status,
                error_num: 0,
                message: FALLBACK_MESSAGE.to_string(),
                origin: ErrorOrigin::Malformed,
            },
        }
    }

    /// Wraps a transport failure; there is no body to mine and no status
    /// beyond the `0` sentinel.
    pub fn from_transport(cause: &TransportError) -> Self {
        Self {
            status: 0,
            error_num: 0,
            message: cause.to_string(),
            origin: ErrorOrigin::Transport,
        }
    }
}
