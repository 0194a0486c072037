//! Gateway assembly: descriptor registry and mount loop.
//!
//! Descriptors are iterated in declaration order, which is stable and
//! flag-independent. Each active service's handler is constructed exactly
//! once; a construction failure degrades that service and never aborts
//! the gateway. The dashboard and static catch-all are registered last,
//! after every prefixed service.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use er_core::{ConfigError, Enablement, RouteTable, ServiceDescriptor};
use er_docs::docs_service;
use er_engine::engine_service;
use er_term::terminal_service;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::{assets, dashboard};

/// Live status of one configured service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    /// Enabled, constructed, mounted.
    Live,
    /// Enabled but its handler failed to construct; not mounted.
    Degraded,
    /// Not enabled.
    Disabled,
}

impl ServiceStatus {
    pub fn is_live(&self) -> bool {
        matches!(self, ServiceStatus::Live)
    }

    /// Dashboard label.
    pub fn label(&self) -> &'static str {
        match self {
            ServiceStatus::Live => "reachable",
            ServiceStatus::Degraded => "degraded",
            ServiceStatus::Disabled => "disabled",
        }
    }
}

/// One configured service after the mount pass: its descriptor (factory
/// consumed) plus the status the mount loop assigned.
pub struct MountedService {
    descriptor: ServiceDescriptor,
    status: ServiceStatus,
}

impl MountedService {
    fn new(descriptor: ServiceDescriptor, status: ServiceStatus) -> Self {
        Self { descriptor, status }
    }

    #[cfg(test)]
    pub(crate) fn for_tests(
        name: &'static str,
        prefix: &'static str,
        status: ServiceStatus,
    ) -> Self {
        let descriptor =
            ServiceDescriptor::new(name, prefix, true, Box::new(|| Ok(Router::new())));
        Self { descriptor, status }
    }

    pub fn name(&self) -> &'static str {
        self.descriptor.name()
    }

    pub fn path_prefix(&self) -> &'static str {
        self.descriptor.path_prefix()
    }

    pub fn status(&self) -> ServiceStatus {
        self.status
    }

    /// Absolute URL for the dashboard, present only when the service is
    /// actually reachable.
    pub fn display_url(&self, host: &str) -> Option<String> {
        self.status
            .is_live()
            .then(|| self.descriptor.display_url(host))
    }
}

/// The assembled gateway: the root router and the per-service mount
/// outcome, fixed for the life of the process.
pub struct Gateway {
    pub router: Router,
    pub services: Arc<Vec<MountedService>>,
}

/// The configured service set, in mount priority order.
fn descriptors(config: &GatewayConfig) -> Vec<ServiceDescriptor> {
    let enablement = Enablement::new(config.enable_all);
    let engine_config = config.engine.clone();
    let term_config = config.terminal.clone();

    vec![
        ServiceDescriptor::new(
            "entity-resolution-api",
            "api",
            enablement.active(config.enable_api),
            Box::new(move || engine_service(engine_config)),
        ),
        ServiceDescriptor::new(
            "api-docs",
            "docs",
            enablement.active(config.enable_api_docs),
            Box::new(docs_service),
        ),
        ServiceDescriptor::new(
            "terminal",
            "terminal",
            enablement.active(config.enable_terminal),
            Box::new(move || terminal_service(term_config)),
        ),
    ]
}

/// Build the root dispatcher.
///
/// Prefix collisions are a configuration error and fail startup; a
/// backend construction failure only degrades that one service.
pub fn build_gateway(config: &GatewayConfig) -> Result<Gateway, ConfigError> {
    let mut table = RouteTable::new();
    let mut services = Vec::new();

    for mut descriptor in descriptors(config) {
        if !descriptor.is_enabled() {
            tracing::debug!(service = descriptor.name(), "service disabled");
            services.push(MountedService::new(descriptor, ServiceStatus::Disabled));
            continue;
        }

        let status = match descriptor.take_factory() {
            Some(factory) => match factory() {
                Ok(router) => {
                    table.insert(descriptor.path_prefix(), router)?;
                    tracing::info!(
                        service = descriptor.name(),
                        prefix = descriptor.path_prefix(),
                        "service mounted"
                    );
                    ServiceStatus::Live
                }
                Err(e) => {
                    tracing::warn!(
                        service = descriptor.name(),
                        error = %e,
                        "service handler construction failed, continuing degraded"
                    );
                    ServiceStatus::Degraded
                }
            },
            None => ServiceStatus::Degraded,
        };
        services.push(MountedService::new(descriptor, status));
    }

    let services = Arc::new(services);

    // Catch-all root: dashboard plus static assets, registered after all
    // prefixed services. Nesting matches whole path segments, so these
    // can never shadow a mounted prefix.
    let root = Router::new()
        .route("/", get(dashboard::render))
        .route("/static/{*file}", get(assets::serve))
        .fallback(assets::not_found)
        .with_state(services.clone());

    let router = table
        .into_router(root)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    Ok(Gateway { router, services })
}
