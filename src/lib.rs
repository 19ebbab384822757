//! Identity responder crate.
//!
//! Serves a single JSON document on every request: the Cloud Run service name
//! and revision (`K_SERVICE` / `K_REVISION`) captured once when the process
//! started. Every method and path gets the same `200` response.

pub mod config;
pub mod context;
pub mod error;
pub mod identity;
pub mod runtime;

pub use crate::config::{DEFAULT_PORT, RuntimeConfig, RuntimeConfigBuilder};
pub use crate::context::{RequestContext, RequestContextRejection, RequestTarget};
pub use crate::error::{ResponderError, Result};
pub use crate::identity::{REVISION_ENV, SERVICE_ENV, ServiceIdentity};
pub use crate::runtime::{Responder, router, run, serve, serve_listener};
