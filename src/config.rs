use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::identity::ServiceIdentity;

/// Port the responder listens on. Not configurable.
pub const DEFAULT_PORT: u16 = 8080;

/// Configuration consumed by the runtime before spinning up Axum/hyper.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub bind_addr: SocketAddr,
    pub identity: ServiceIdentity,
}

impl RuntimeConfig {
    /// Captures the service identity from `K_SERVICE`/`K_REVISION` and binds every
    /// interface on port 8080.
    pub fn from_env() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            identity: ServiceIdentity::from_env(),
        }
    }

    /// Returns a builder for programmatic overrides.
    pub fn builder() -> RuntimeConfigBuilder {
        RuntimeConfigBuilder::default()
    }
}

impl Default for RuntimeConfig {
    /// Binds to `0.0.0.0:8080` with an empty identity.
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            identity: ServiceIdentity::default(),
        }
    }
}

/// Builder type for [`RuntimeConfig`].
#[derive(Default, Clone, Debug)]
pub struct RuntimeConfigBuilder {
    bind_addr: Option<SocketAddr>,
    identity: Option<ServiceIdentity>,
}

impl RuntimeConfigBuilder {
    /// Sets the address for the embedded Axum listener.
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = Some(addr);
        self
    }

    /// Sets the identity echoed back on every response.
    pub fn identity(mut self, identity: ServiceIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Builds the final configuration.
    pub fn build(self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.unwrap_or_else(default_bind_addr),
            identity: self.identity.unwrap_or_default(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{REVISION_ENV, SERVICE_ENV};
    use crate::test_support::env_lock;

    #[test]
    fn builder_overrides_defaults() {
        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0);
        let identity = ServiceIdentity::new(Some("svc".into()), Some("svc-00001".into()));
        let config = RuntimeConfig::builder()
            .bind_addr(addr)
            .identity(identity.clone())
            .build();

        assert_eq!(config.bind_addr, addr);
        assert_eq!(config.identity, identity);
    }

    #[test]
    fn builder_falls_back_to_defaults() {
        assert_eq!(RuntimeConfig::builder().build(), RuntimeConfig::default());
    }

    #[test]
    fn binds_all_interfaces_on_8080() {
        let config = RuntimeConfig::default();
        assert!(config.bind_addr.ip().is_unspecified());
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(config.identity.is_empty());
    }

    #[test]
    fn reads_env_configuration() {
        let _guard = env_lock().lock().unwrap();
        unsafe {
            std::env::set_var(SERVICE_ENV, "orders-api");
            std::env::set_var(REVISION_ENV, "orders-api-00007-xyz");
            std::env::set_var("PORT", "1234");
        }

        let config = RuntimeConfig::from_env();
        assert_eq!(
            config.bind_addr,
            SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT)
        );
        assert_eq!(config.identity.service.as_deref(), Some("orders-api"));
        assert_eq!(
            config.identity.revision.as_deref(),
            Some("orders-api-00007-xyz")
        );

        unsafe {
            std::env::remove_var(SERVICE_ENV);
            std::env::remove_var(REVISION_ENV);
            std::env::remove_var("PORT");
        }
    }
}
