use crate::error::ServerError;
use crate::response::Response;
use crate::transport::TransportError;

/// ApiResult is the typed outcome handed back to callers: HTTP status,
/// success flag, optional typed value, optional structured error, plus the
/// raw response envelope for diagnostics.
///
/// Results are immutable snapshots; nothing mutates one after the owning
/// call returns.
#[derive(Debug)]
pub struct ApiResult<T> {
    status: u16,
    success: bool,
    value: Option<T>,
    error: Option<ServerError>,
    response: Response,
}

impl<T> ApiResult<T> {
    pub(crate) fn success(response: Response, value: Option<T>) -> Self {
        Self {
            status: response.status(),
            success: true,
            value,
            error: None,
            response,
        }
    }

    pub(crate) fn failure(response: Response, error: ServerError) -> Self {
        Self {
            status: response.status(),
            success: false,
            value: None,
            error: Some(error),
            response,
        }
    }

    /// HTTP status of the call, `0` when the round trip never completed.
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<T> {
        self.value
    }

    /// Structured error, present exactly when the call failed.
    pub fn error(&self) -> Option<&ServerError> {
        self.error.as_ref()
    }

    /// The failure of the round trip itself, when no status ever existed.
    pub fn transport_error(&self) -> Option<&TransportError> {
        self.response.transport_error()
    }

    /// Raw response envelope, kept for diagnostics.
    pub fn response(&self) -> &Response {
        &self.response
    }
}
