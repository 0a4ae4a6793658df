//! Status-to-outcome dispatch.
//!
//! The same status code means different things on different operations:
//! 404 is a plain failure when deleting a document but a valid "not there"
//! when looking one up. Each operation therefore declares its own
//! [`StatusMap`] and the dispatch below stays free of hardcoded status
//! numbers.

use std::collections::HashMap;

use crate::error::{Error, Result, ServerError};
use crate::response::Response;
use crate::result::ApiResult;

/// What a status code means for one particular operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The call did what was asked; a value may be shaped from the response.
    Success,
    /// A valid "does not exist" answer: success with no value and no error.
    ExpectedAbsence,
    /// An application-level failure to be translated into a structured error.
    Failure,
}

/// Declared mapping from status code to [`Outcome`] for one operation.
/// Any unlisted status, 2xx included, is a failure.
#[derive(Debug, Clone, Default)]
pub struct StatusMap {
    entries: HashMap<u16, Outcome>,
}

impl StatusMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a status as success.
    pub fn ok(mut self, status: u16) -> Self {
        self.entries.insert(status, Outcome::Success);
        self
    }

    /// Marks a status as an expected absence.
    pub fn absent(mut self, status: u16) -> Self {
        self.entries.insert(status, Outcome::ExpectedAbsence);
        self
    }

    pub fn outcome(&self, status: u16) -> Outcome {
        self.entries.get(&status).copied().unwrap_or(Outcome::Failure)
    }
}

/// Chooses how failing calls surface: embedded in the result envelope for
/// callers that inspect `success`/`error`, or raised as `Err` for callers
/// that prefer exception style. Set per connection, overridable per call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    #[default]
    Embed,
    Raise,
}

/// Fills an [`ApiResult`] from a completed response.
///
/// The shaper runs only on [`Outcome::Success`] and produces the typed
/// value, usually from the parsed body but possibly from a header. Shaper
/// failures are contract violations and propagate regardless of policy.
/// The error translator runs exactly when the outcome is a failure or the
/// round trip itself failed.
pub fn complete<T, F>(
    response: Response,
    map: &StatusMap,
    policy: FailurePolicy,
    shape: F,
) -> Result<ApiResult<T>>
where
    F: FnOnce(&Response) -> Result<Option<T>>,
{
    if let Some(cause) = response.transport_error() {
        tracing::warn!(error = %cause, "round trip failed");
        if policy == FailurePolicy::Raise {
            return Err(Error::Transport(cause.clone()));
        }
        let error = ServerError::from_transport(cause);
        return Ok(ApiResult::failure(response, error));
    }

    match map.outcome(response.status()) {
        Outcome::Success => {
            let value = shape(&response)?;
            Ok(ApiResult::success(response, value))
        }
        Outcome::ExpectedAbsence => Ok(ApiResult::success(response, None)),
        Outcome::Failure => {
            let error = ServerError::from_response(&response);
            tracing::warn!(
                status = response.status(),
                error_num = error.error_num,
                origin = ?error.origin,
                "request failed"
            );
            match policy {
                FailurePolicy::Raise => Err(Error::Api(error)),
                FailurePolicy::Embed => Ok(ApiResult::failure(response, error)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorOrigin;
    use crate::transport::TransportError;
    use serde::Deserialize;

    fn received(status: u16, body: &str) -> Response {
        Response::received(status, Vec::new(), body.to_string())
    }

    #[test]
    fn test_status_map_defaults_to_failure() {
        let map = StatusMap::new().ok(200).ok(201).absent(404);

        assert_eq!(map.outcome(200), Outcome::Success);
        assert_eq!(map.outcome(201), Outcome::Success);
        assert_eq!(map.outcome(404), Outcome::ExpectedAbsence);
        assert_eq!(map.outcome(400), Outcome::Failure);
        // even unlisted 2xx codes are failures
        assert_eq!(map.outcome(204), Outcome::Failure);
    }

    #[test]
    fn test_success_runs_the_shaper() {
        #[derive(Debug, Default, Deserialize, PartialEq)]
        struct FunctionRecord {
            name: String,
            code: String,
        }

        // a create that answers 201 with the stored record
        let response = received(201, r#"{"name":"f","code":"function () {}"}"#);
        let map = StatusMap::new().ok(200).ok(201);
        let result = complete(response, &map, FailurePolicy::Embed, |response| {
            Ok(Some(response.parse_body::<FunctionRecord>()?))
        })
        .unwrap();

        assert_eq!(result.status(), 201);
        assert!(result.is_success());
        assert!(result.has_value());
        assert!(result.error().is_none());
        let record = result.into_value().unwrap();
        assert_eq!(record.name, "f");
        assert_eq!(record.code, "function () {}");
    }

    #[test]
    fn test_expected_absence_is_success_without_value() {
        let response = received(404, r#"{"errorNum":1202,"errorMessage":"document not found"}"#);
        let map = StatusMap::new().ok(200).absent(404);
        let result = complete(response, &map, FailurePolicy::Embed, |_| Ok(Some(true))).unwrap();

        assert!(result.is_success());
        assert!(!result.has_value());
        assert!(result.error().is_none());
    }

    #[test]
    fn test_embedded_failures_always_carry_an_error() {
        let response = received(404, r#"{"errorNum":1203,"errorMessage":"function not found"}"#);
        let map = StatusMap::new().ok(200);
        let result = complete(response, &map, FailurePolicy::Embed, |_| Ok(Some(true))).unwrap();

        assert!(!result.is_success());
        assert!(!result.has_value());
        let error = result.error().unwrap();
        assert_eq!(error.status, 404);
        assert_eq!(error.error_num, 1203);
        assert_eq!(error.message, "function not found");
    }

    #[test]
    fn test_failure_without_detail_still_produces_an_error() {
        let response = received(204, "");
        let map = StatusMap::new().ok(200);
        let result = complete(response, &map, FailurePolicy::Embed, |_| Ok(Some(true))).unwrap();

        assert!(!result.is_success());
        let error = result.error().unwrap();
        assert_eq!(error.status, 204);
        assert_eq!(error.origin, ErrorOrigin::Absent);
    }

    #[test]
    fn test_raise_policy_turns_failures_into_errors() {
        let response = received(400, r#"{"errorNum":1229,"errorMessage":"database name invalid"}"#);
        let map = StatusMap::new().ok(201);
        let raised = complete(response, &map, FailurePolicy::Raise, |_| Ok(Some(true)));

        match raised {
            Err(Error::Api(error)) => {
                assert_eq!(error.status, 400);
                assert_eq!(error.error_num, 1229);
                assert!(!error.message.is_empty());
            }
            other => panic!("expected an api error, got {other:?}"),
        }
    }

    #[test]
    fn test_transport_failure_embeds_or_raises_per_policy() {
        let map = StatusMap::new().ok(200);

        let response = Response::failed(TransportError::timeout("deadline elapsed"));
        let result = complete(response, &map, FailurePolicy::Embed, |_| Ok(Some(true))).unwrap();
        assert!(!result.is_success());
        assert_eq!(result.status(), 0);
        assert!(result.transport_error().is_some());
        assert_eq!(result.error().unwrap().origin, ErrorOrigin::Transport);

        let response = Response::failed(TransportError::timeout("deadline elapsed"));
        let raised = complete(response, &map, FailurePolicy::Raise, |_| Ok(Some(true)));
        match raised {
            Err(Error::Transport(cause)) => assert!(cause.is_timeout()),
            other => panic!("expected a transport error, got {other:?}"),
        }
    }

    #[test]
    fn test_shaper_errors_propagate_regardless_of_policy() {
        for policy in [FailurePolicy::Embed, FailurePolicy::Raise] {
            let response = received(200, "{truncated");
            let map = StatusMap::new().ok(200);
            let parsed = complete(response, &map, policy, |response| {
                Ok(Some(response.parse_body::<Vec<String>>()?))
            });

            assert!(matches!(parsed, Err(Error::Serialization(_))));
        }
    }
}
