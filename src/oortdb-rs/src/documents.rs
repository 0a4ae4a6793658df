use std::mem;
use std::sync::Arc;

use serde_json::{json, Map, Value};

use oortdb_core::api::{base_path, param};
use oortdb_core::document::{is_valid_key, Document, DocumentId};
use oortdb_core::error::{Error, Result};
use oortdb_core::outcome::StatusMap;
use oortdb_core::request::{Method, Request};
use oortdb_core::result::ApiResult;

use crate::connection::Connection;

/// Fluent builder for document CRUD.
///
/// Optional parameters accumulate in a parameter set drained per call, the
/// same way [`crate::functions::Functions`] handles its options. Ids are
/// validated against the `collection/key` wire form before any network
/// call happens.
pub struct Documents {
    connection: Arc<Connection>,
    parameters: Map<String, Value>,
}

impl Documents {
    pub(crate) fn new(connection: Arc<Connection>) -> Self {
        Self {
            connection,
            parameters: Map::new(),
        }
    }

    /// Asks the server to sync the next write to disk before answering.
    pub fn wait_for_sync(mut self, wait: bool) -> Self {
        self.parameters
            .insert(param::WAIT_FOR_SYNC.to_string(), json!(wait));
        self
    }

    /// Asks the next create call to return the stored document alongside
    /// its meta fields.
    pub fn return_new(mut self, return_new: bool) -> Self {
        self.parameters
            .insert(param::RETURN_NEW.to_string(), json!(return_new));
        self
    }

    fn take_parameters(&mut self) -> Map<String, Value> {
        mem::take(&mut self.parameters)
    }

    /// Stores a document in `collection`. The server answers `201` (synced)
    /// or `202` (accepted) with the meta document (`_id`, `_key`, `_rev`,
    /// plus `new` when requested).
    pub async fn create(
        &mut self,
        collection: &str,
        document: &Document,
    ) -> Result<ApiResult<Document>> {
        if collection.is_empty() || !is_valid_key(collection) {
            return Err(Error::InvalidFormat {
                what: "collection name",
                value: collection.to_string(),
            });
        }
        let parameters = self.take_parameters();

        let mut request = Request::new(
            Method::Post,
            base_path::DOCUMENT,
            format!("/{collection}"),
        );
        request.try_set_query_parameter(param::WAIT_FOR_SYNC, &parameters);
        request.try_set_query_parameter(param::RETURN_NEW, &parameters);
        request.set_body(self.connection.to_json(document)?);

        let map = StatusMap::new().ok(201).ok(202);
        self.connection
            .execute(request, &map, |response| Ok(Some(response.parse_body()?)))
            .await
    }

    /// Fetches a document. A missing one (404) is an expected absence:
    /// success with no value, not an error.
    pub async fn get(&mut self, id: &str) -> Result<ApiResult<Document>> {
        let id = DocumentId::parse(id)?;
        self.take_parameters();

        let request = Request::new(Method::Get, base_path::DOCUMENT, format!("/{id}"));

        let map = StatusMap::new().ok(200).absent(404);
        self.connection
            .execute(request, &map, |response| Ok(Some(response.parse_body()?)))
            .await
    }

    /// Checks whether a document exists. The value is its revision, taken
    /// from the `etag` response header; a missing document is an expected
    /// absence.
    pub async fn check(&mut self, id: &str) -> Result<ApiResult<String>> {
        let id = DocumentId::parse(id)?;
        self.take_parameters();

        let request = Request::new(Method::Head, base_path::DOCUMENT, format!("/{id}"));

        let map = StatusMap::new().ok(200).absent(404);
        self.connection
            .execute(request, &map, |response| {
                Ok(response
                    .header("etag")
                    .map(|etag| etag.trim_matches('"').to_string()))
            })
            .await
    }

    /// Removes a document. Unlike [`Self::get`], a missing document (404)
    /// is a plain failure here.
    pub async fn delete(&mut self, id: &str) -> Result<ApiResult<Document>> {
        let id = DocumentId::parse(id)?;
        let parameters = self.take_parameters();

        let mut request = Request::new(Method::Delete, base_path::DOCUMENT, format!("/{id}"));
        request.try_set_query_parameter(param::WAIT_FOR_SYNC, &parameters);

        let map = StatusMap::new().ok(200).ok(202);
        self.connection
            .execute(request, &map, |response| Ok(Some(response.parse_body()?)))
            .await
    }
}
