//! er-core - Core types for the entity-resolution service gateway
//!
//! This crate provides the building blocks the gateway composes at startup:
//! service descriptors, enablement resolution, and the prefix route table.
//! It knows nothing about the individual backend services beyond the
//! handler factory each one supplies.

pub mod descriptor;
pub mod enablement;
pub mod error;
pub mod routes;

pub use descriptor::{HandlerFactory, ServiceDescriptor};
pub use enablement::Enablement;
pub use error::{ConfigError, ServiceError};
pub use routes::RouteTable;
