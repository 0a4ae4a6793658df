use std::mem;
use std::sync::Arc;

use serde_json::{json, Map, Value};

use oortdb_core::api::{base_path, param};
use oortdb_core::document::Document;
use oortdb_core::error::Result;
use oortdb_core::outcome::StatusMap;
use oortdb_core::request::{Method, Request};
use oortdb_core::result::ApiResult;

use crate::connection::Connection;

/// Fluent builder for the user-defined function catalog.
///
/// Optional parameters accumulate in a parameter set that is drained when
/// a call fires, so nothing leaks into the next call on the same builder.
pub struct Functions {
    connection: Arc<Connection>,
    parameters: Map<String, Value>,
}

impl Functions {
    pub(crate) fn new(connection: Arc<Connection>) -> Self {
        Self {
            connection,
            parameters: Map::new(),
        }
    }

    /// Marks the next registered function as deterministic.
    pub fn is_deterministic(&mut self, deterministic: bool) -> &mut Self {
        self.parameters
            .insert(param::IS_DETERMINISTIC.to_string(), json!(deterministic));
        self
    }

    /// Restricts the next list call to one namespace.
    pub fn namespace(mut self, namespace: &str) -> Self {
        self.parameters
            .insert(param::NAMESPACE.to_string(), json!(namespace));
        self
    }

    /// Makes the next unregister call remove a whole namespace group.
    pub fn group(mut self, group: bool) -> Self {
        self.parameters.insert(param::GROUP.to_string(), json!(group));
        self
    }

    fn take_parameters(&mut self) -> Map<String, Value> {
        mem::take(&mut self.parameters)
    }

    /// Registers (or replaces) a function. The server answers `201` for a
    /// new function and `200` for a replaced one; both are success.
    pub async fn register(&mut self, name: &str, code: &str) -> Result<ApiResult<bool>> {
        let parameters = self.take_parameters();

        let mut body = Map::new();
        body.insert(param::NAME.to_string(), json!(name));
        body.insert(param::CODE.to_string(), json!(code));
        Request::try_set_body_parameter(param::IS_DETERMINISTIC, &parameters, &mut body);

        let mut request = Request::new(Method::Post, base_path::FUNCTION, "");
        request.set_body(self.connection.to_json(&body)?);

        let map = StatusMap::new().ok(200).ok(201);
        self.connection
            .execute(request, &map, |_| Ok(Some(true)))
            .await
    }

    /// Lists registered functions, optionally restricted to a namespace.
    pub async fn list(&mut self) -> Result<ApiResult<Vec<Document>>> {
        let parameters = self.take_parameters();

        let mut request = Request::new(Method::Get, base_path::FUNCTION, "");
        request.try_set_query_parameter(param::NAMESPACE, &parameters);

        let map = StatusMap::new().ok(200);
        self.connection
            .execute(request, &map, |response| Ok(Some(response.parse_body()?)))
            .await
    }

    /// Removes a function, or a whole namespace when `group` was set. A
    /// missing function (404) is a failure here, not an expected absence.
    pub async fn unregister(&mut self, name: &str) -> Result<ApiResult<bool>> {
        let parameters = self.take_parameters();

        let mut request = Request::new(Method::Delete, base_path::FUNCTION, format!("/{name}"));
        request.try_set_query_parameter(param::GROUP, &parameters);

        let map = StatusMap::new().ok(200);
        self.connection
            .execute(request, &map, |_| Ok(Some(true)))
            .await
    }
}
