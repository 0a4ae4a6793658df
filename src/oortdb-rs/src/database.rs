use std::sync::Arc;

use serde_json::json;

use oortdb_core::api::{base_path, param};
use oortdb_core::error::{Error, Result};
use oortdb_core::outcome::StatusMap;
use oortdb_core::request::{Method, Request};
use oortdb_core::result::ApiResult;

use crate::connection::Connection;
use crate::documents::Documents;
use crate::functions::Functions;
use crate::registry::ConnectionRegistry;

/// Entry point for one named connection: resolves the alias once, then
/// hands out the per-resource builders and performs database management.
pub struct Database {
    connection: Arc<Connection>,
}

impl Database {
    /// Resolves `alias` in the registry. Fails when the alias is unknown.
    pub fn new(registry: &ConnectionRegistry, alias: &str) -> Result<Self> {
        Ok(Self {
            connection: registry.lookup(alias)?,
        })
    }

    /// Wraps an already resolved connection, bypassing the registry.
    pub fn with_connection(connection: Arc<Connection>) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &Arc<Connection> {
        &self.connection
    }

    /// User-defined function calls on this connection.
    pub fn functions(&self) -> Functions {
        Functions::new(Arc::clone(&self.connection))
    }

    /// Document CRUD calls on this connection.
    pub fn documents(&self) -> Documents {
        Documents::new(Arc::clone(&self.connection))
    }

    /// Creates a database. `201` is the only success answer; an invalid
    /// name (400) or a duplicate (409) is a failure.
    pub async fn create_database(&self, name: &str) -> Result<ApiResult<bool>> {
        let mut request = Request::new(Method::Post, base_path::DATABASE, "");
        request.set_body(self.connection.to_json(&json!({ param::NAME: name }))?);

        let map = StatusMap::new().ok(201);
        self.connection
            .execute(request, &map, |_| Ok(Some(true)))
            .await
    }

    /// Drops a database. The name goes into the request path, so a
    /// malformed one is rejected before any network call; a missing
    /// database (404) is a failure, carrying the server's error number.
    pub async fn drop_database(&self, name: &str) -> Result<ApiResult<bool>> {
        if !is_valid_database_name(name) {
            return Err(Error::InvalidFormat {
                what: "database name",
                value: name.to_string(),
            });
        }

        let request = Request::new(Method::Delete, base_path::DATABASE, format!("/{name}"));

        let map = StatusMap::new().ok(200);
        self.connection
            .execute(request, &map, |_| Ok(Some(true)))
            .await
    }
}

/// Database names start with a letter and stay within letters, digits,
/// `-` and `_`.
fn is_valid_database_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
