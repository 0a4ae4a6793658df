use std::collections::HashMap;
use std::sync::Arc;

use oortdb_core::error::{Error, Result};

use crate::connection::Connection;

/// Holds the named connections of one application.
///
/// Constructed once at startup and passed by reference to whatever needs
/// to resolve an alias. The registry itself does no locking; callers that
/// register or deregister concurrently with in-flight requests must
/// synchronize externally.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: HashMap<String, Arc<Connection>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a connection under its alias. Registering an alias twice is
    /// rejected rather than silently overwritten.
    pub fn register(&mut self, connection: Connection) -> Result<()> {
        let alias = connection.alias().to_string();
        if self.connections.contains_key(&alias) {
            return Err(Error::DuplicateAlias(alias));
        }

        tracing::debug!(alias = %alias, "registering connection");
        self.connections.insert(alias, Arc::new(connection));
        Ok(())
    }

    /// Resolves an alias to its connection.
    pub fn lookup(&self, alias: &str) -> Result<Arc<Connection>> {
        self.connections
            .get(alias)
            .cloned()
            .ok_or_else(|| Error::UnknownAlias(alias.to_string()))
    }

    pub fn has(&self, alias: &str) -> bool {
        self.connections.contains_key(alias)
    }

    /// Database name configured for an alias, `None` when the connection
    /// targets the default database.
    pub fn database_name(&self, alias: &str) -> Result<Option<String>> {
        let connection = self.lookup(alias)?;
        Ok(connection.database().map(str::to_string))
    }

    /// Removes an alias. Deregistering one that was never registered is a
    /// no-op, not a failure.
    pub fn deregister(&mut self, alias: &str) {
        self.connections.remove(alias);
    }
}
