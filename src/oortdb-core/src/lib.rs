//! OortDB Protocol Layer
//!
//! This crate provides the request/response machinery shared by every
//! OortDB resource client, including:
//! - Request descriptors and canonical API paths
//! - Response envelopes with structural body classification
//! - Typed call results and the status-to-outcome dispatch
//! - Server error translation and the failure policy
//! - The transport boundary trait
//! - Document envelopes with validated system fields
//!
//! No networking happens here; executing a request is the job of a
//! [`transport::Transport`] implementation supplied by the driver.

pub mod api;
pub mod document;
pub mod error;
pub mod options;
pub mod outcome;
pub mod request;
pub mod response;
pub mod result;
pub mod transport;

// Re-export commonly used types
pub use document::{Document, DocumentId};
pub use error::{Error, ErrorOrigin, Result, ServerError};
pub use options::JsonOptions;
pub use outcome::{FailurePolicy, Outcome, StatusMap};
pub use request::{Method, Request};
pub use response::{BodyKind, Response};
pub use result::ApiResult;
pub use transport::{HttpCall, RawResponse, Transport, TransportError, TransportErrorKind};
