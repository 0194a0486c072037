//! er-gateway - Composite service gateway
//!
//! Builds the root dispatcher from the configured service set: resolves
//! enablement, constructs each active backend handler exactly once,
//! mounts the survivors under their URL prefixes, and serves the status
//! dashboard plus static assets from the catch-all. The listener
//! lifecycle lives here too.

mod assets;
mod dashboard;

pub mod config;
pub mod mount;
pub mod serve;

pub use config::GatewayConfig;
pub use mount::{build_gateway, Gateway, MountedService, ServiceStatus};
pub use serve::{serve, GatewayError};
