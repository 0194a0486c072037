//! er-engine - Entity-resolution REST API backend adapter
//!
//! Wraps the entity-resolution engine behind an axum sub-router. A single
//! optional URL selects the engine binding: absent, the adapter uses the
//! local in-process engine; present, it is parsed into a network target
//! and requests are proxied to a remote engine server over HTTP.
//!
//! The gateway only decides whether and where to mount this router; it
//! never participates in entity-resolution logic.

pub mod client;
pub mod service;
pub mod target;

pub use client::{EngineClient, EngineError, EngineResult, LocalEngine, RemoteEngine, VersionInfo};
pub use service::{engine_service, EngineConfig};
pub use target::{ConnectOptions, EngineTarget};
