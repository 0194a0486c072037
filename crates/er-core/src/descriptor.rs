//! Service descriptors: static records describing one mountable backend.
//!
//! Descriptors are built once at startup from configuration and are
//! immutable for the life of the process. The handler factory is consumed
//! by the gateway during mounting; `FnOnce` plus [`ServiceDescriptor::take_factory`]
//! guarantee it runs at most once even though construction may be
//! expensive and may fail.

use axum::Router;

use crate::error::ServiceError;

/// Lazily constructs a service's request handler. Invoked at most once,
/// during startup, before the listener accepts connections.
pub type HandlerFactory = Box<dyn FnOnce() -> Result<Router, ServiceError> + Send + Sync>;

/// Static description of one mountable backend service.
pub struct ServiceDescriptor {
    name: &'static str,
    path_prefix: &'static str,
    enabled: bool,
    factory: Option<HandlerFactory>,
}

impl ServiceDescriptor {
    /// Create a descriptor. `enabled` is the already-resolved enablement
    /// value (see [`crate::Enablement`]); it does not change after this.
    pub fn new(
        name: &'static str,
        path_prefix: &'static str,
        enabled: bool,
        factory: HandlerFactory,
    ) -> Self {
        Self {
            name,
            path_prefix,
            enabled,
            factory: Some(factory),
        }
    }

    /// Stable identifier used in logs and the dashboard.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// URL prefix the service mounts under, without slashes.
    pub fn path_prefix(&self) -> &'static str {
        self.path_prefix
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Absolute URL the service is reachable at for the given request host.
    pub fn display_url(&self, host: &str) -> String {
        format!("http://{}/{}", host, self.path_prefix)
    }

    /// Take the handler factory. Returns `None` on any call after the
    /// first, so a handler can never be constructed twice.
    pub fn take_factory(&mut self) -> Option<HandlerFactory> {
        self.factory.take()
    }
}

impl std::fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("name", &self.name)
            .field("path_prefix", &self.path_prefix)
            .field("enabled", &self.enabled)
            .field("factory_taken", &self.factory.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(enabled: bool) -> ServiceDescriptor {
        ServiceDescriptor::new("svc", "svc", enabled, Box::new(|| Ok(Router::new())))
    }

    #[test]
    fn display_url_substitutes_host() {
        let d = descriptor(true);
        assert_eq!(d.display_url("localhost:8261"), "http://localhost:8261/svc");
        assert_eq!(d.display_url("example.com"), "http://example.com/svc");
    }

    #[test]
    fn factory_can_only_be_taken_once() {
        let mut d = descriptor(true);
        assert!(d.take_factory().is_some());
        assert!(d.take_factory().is_none());
    }
}
