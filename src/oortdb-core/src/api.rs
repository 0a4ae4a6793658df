//! Canonical REST paths and wire parameter names.

/// Base paths of the API resource groups this driver talks to.
pub mod base_path {
    pub const DATABASE: &str = "/_api/database";
    pub const DOCUMENT: &str = "/_api/document";
    pub const FUNCTION: &str = "/_api/function";
    pub const ECHO: &str = "/_admin/echo";
}

/// Parameter names as they appear on the wire, in query strings and
/// request bodies alike.
pub mod param {
    pub const NAME: &str = "name";
    pub const CODE: &str = "code";
    pub const IS_DETERMINISTIC: &str = "isDeterministic";
    pub const NAMESPACE: &str = "namespace";
    pub const GROUP: &str = "group";
    pub const WAIT_FOR_SYNC: &str = "waitForSync";
    pub const RETURN_NEW: &str = "returnNew";
}
