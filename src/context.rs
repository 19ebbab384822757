use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::header::HOST;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::identity::ServiceIdentity;

/// Request-scoped handle exposing the captured identity and what the peer asked for.
#[derive(Clone, Debug)]
pub struct RequestContext {
    identity: Arc<ServiceIdentity>,
    target: RequestTarget,
}

impl RequestContext {
    /// Returns the identity captured at startup.
    pub fn identity(&self) -> &ServiceIdentity {
        &self.identity
    }

    /// Returns the method and URL of the current request.
    pub fn target(&self) -> &RequestTarget {
        &self.target
    }
}

/// Method and URL of an incoming request, as written to the request log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestTarget {
    pub method: String,
    pub url: String,
}

impl RequestTarget {
    /// Rebuilds the absolute URL from the request line and the `Host` header.
    ///
    /// Absolute-form targets are kept as-is. Without a `Host` header the
    /// origin-form path is all we have.
    fn from_parts(parts: &Parts) -> Self {
        let method = parts.method.to_string();

        if parts.uri.scheme().is_some() {
            return Self {
                method,
                url: parts.uri.to_string(),
            };
        }

        let path = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let host = parts
            .headers
            .get(HOST)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty());

        let url = match host {
            Some(host) => format!("http://{host}{path}"),
            None => path.to_owned(),
        };

        Self { method, url }
    }
}

/// Errors emitted when a handler requests [`RequestContext`] but the router did not install the identity.
#[derive(Debug, Error)]
pub enum RequestContextRejection {
    #[error("service identity missing from request extensions")]
    MissingIdentity,
}

impl IntoResponse for RequestContextRejection {
    fn into_response(self) -> Response {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let message = self.to_string();
        (status, message).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = RequestContextRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<Arc<ServiceIdentity>>()
            .cloned()
            .ok_or(RequestContextRejection::MissingIdentity)?;

        let target = RequestTarget::from_parts(parts);

        Ok(Self { identity, target })
    }
}
