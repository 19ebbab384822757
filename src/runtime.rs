use std::sync::Arc;

use axum::extract::Extension;
use axum::{Json, Router};
use tokio::net::TcpListener;

use crate::config::RuntimeConfig;
use crate::context::RequestContext;
use crate::error::{ResponderError, Result};
use crate::identity::ServiceIdentity;

/// High-level runtime that answers every request with the captured service identity.
pub struct Responder {
    config: RuntimeConfig,
}

impl Responder {
    /// Creates a responder with the provided configuration.
    pub fn new(config: RuntimeConfig) -> Self {
        Self { config }
    }

    /// Consumes the responder and serves until the process is signalled.
    pub async fn serve(self) -> Result<()> {
        serve(self.config).await
    }
}

/// Builds the router: one fallback handler for every method and path.
pub fn router(identity: ServiceIdentity) -> Router {
    Router::new()
        .fallback(respond)
        .layer(Extension(Arc::new(identity)))
}

async fn respond(context: RequestContext) -> Json<ServiceIdentity> {
    let target = context.target();
    tracing::info!(method = %target.method, url = %target.url, "received request");

    Json(context.identity().clone())
}

/// Binds `config.bind_addr` and serves the identity on it.
///
/// A bind failure is returned as [`ResponderError::Bind`]; nothing is retried.
pub async fn serve(config: RuntimeConfig) -> Result<()> {
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .map_err(|source| ResponderError::Bind {
            addr: config.bind_addr,
            source,
        })?;

    serve_listener(listener, config.identity).await
}

/// Serves on an already bound listener.
///
/// Each accepted connection runs on its own task and is never awaited by the
/// accept loop. Returns once SIGINT or SIGTERM arrives; open connections are
/// dropped, not drained.
pub async fn serve_listener(listener: TcpListener, identity: ServiceIdentity) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, port = addr.port(), "listening");

    if identity.is_empty() {
        tracing::warn!("neither K_SERVICE nor K_REVISION is set; responses will carry nulls");
    }

    let service = router(identity).into_make_service();

    tokio::select! {
        result = axum::serve(listener, service).into_future() => result?,
        result = shutdown_signal() => {
            result?;
            tracing::info!("shutdown signal received");
        }
    }

    Ok(())
}

/// Captures the identity from the environment and starts serving on `0.0.0.0:8080`.
pub async fn run() -> Result<()> {
    let config = RuntimeConfig::from_env();
    serve(config).await
}

async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

        tokio::select! {
            result = tokio::signal::ctrl_c() => result,
            _ = sigterm.recv() => Ok(()),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}
