//! OortDB Client Library
//!
//! HTTP driver for the OortDB REST API: named connections, a registry to
//! resolve them, and fluent per-resource builders on top of the
//! `oortdb-core` protocol layer.

mod connection;
mod database;
mod documents;
mod functions;
mod registry;
mod transport;

pub use connection::Connection;
pub use database::Database;
pub use documents::Documents;
pub use functions::Functions;
pub use registry::ConnectionRegistry;
pub use transport::HttpTransport;

pub use oortdb_core;
pub use oortdb_core::{
    ApiResult, BodyKind, Document, DocumentId, Error, ErrorOrigin, FailurePolicy, JsonOptions,
    Method, Request, Response, Result, ServerError, StatusMap, Transport, TransportError,
    TransportErrorKind,
};

/// Driver name sent to the server in the `User-Agent` header.
pub const DRIVER_NAME: &str = "oortdb-rs";

/// Driver version sent to the server in the `User-Agent` header.
pub const DRIVER_VERSION: &str = env!("CARGO_PKG_VERSION");
