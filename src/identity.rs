use std::env;

use serde::Serialize;

/// Environment variable Cloud Run (and Knative) populate with the service name.
pub const SERVICE_ENV: &str = "K_SERVICE";
/// Environment variable Cloud Run (and Knative) populate with the revision name.
pub const REVISION_ENV: &str = "K_REVISION";

/// Service name and revision captured from the environment at startup.
///
/// Serialized as `{"service": ..., "revision": ...}`; values that were not set
/// serialize as `null` rather than being dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ServiceIdentity {
    pub service: Option<String>,
    pub revision: Option<String>,
}

impl ServiceIdentity {
    /// Builds an identity from explicit values.
    pub fn new(service: Option<String>, revision: Option<String>) -> Self {
        Self { service, revision }
    }

    /// Reads `K_SERVICE` and `K_REVISION` from the process environment.
    ///
    /// Missing (or non-unicode) variables become `None`; this never fails.
    pub fn from_env() -> Self {
        Self {
            service: env::var(SERVICE_ENV).ok(),
            revision: env::var(REVISION_ENV).ok(),
        }
    }

    /// Indicates that neither value was present in the environment.
    pub fn is_empty(&self) -> bool {
        self.service.is_none() && self.revision.is_none()
    }
}
