//! Engine client boundary: local in-process binding and remote HTTP proxy.
//!
//! The REST handlers in [`crate::service`] only ever see the
//! [`EngineClient`] trait. `LocalEngine` binds the engine in-process;
//! `RemoteEngine` proxies every call to a remote engine server speaking
//! the same REST dialect.

use std::collections::BTreeSet;
use std::sync::RwLock;

use async_trait::async_trait;
use er_core::ServiceError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::service::EngineConfig;
use crate::target::EngineTarget;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by engine calls at request time. These are per-request
/// failures: the adapter maps them to HTTP responses and the gateway
/// never intercepts them.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine could not be reached
    #[error("engine unavailable: {0}")]
    Unavailable(String),

    /// The remote engine answered with an error status
    #[error("upstream engine error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// The engine answered with something we could not interpret
    #[error("malformed engine response: {0}")]
    Protocol(String),

    /// The request was rejected before reaching the engine
    #[error("invalid engine request: {0}")]
    InvalidRequest(String),
}

/// Engine version report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub engine_version: String,
    pub api_version: String,
}

/// Boundary trait for the entity-resolution engine.
#[async_trait]
pub trait EngineClient: Send + Sync {
    /// Cheap liveness probe.
    async fn heartbeat(&self) -> EngineResult<()>;

    /// Engine and API version report.
    async fn version(&self) -> EngineResult<VersionInfo>;

    /// Currently registered data source codes, sorted.
    async fn data_sources(&self) -> EngineResult<Vec<String>>;

    /// Register data source codes, returning the updated full list.
    async fn add_data_sources(&self, codes: &[String]) -> EngineResult<Vec<String>>;
}

// =========================================================================
// Local in-process engine
// =========================================================================

/// Data sources present in a freshly initialised engine configuration.
const SEED_DATA_SOURCES: [&str; 2] = ["TEST", "SEARCH"];

/// In-process engine binding.
///
/// Owns its configuration registry; nothing here is process-global, so
/// the handle lives exactly as long as the router that holds it.
pub struct LocalEngine {
    instance_name: String,
    data_sources: RwLock<BTreeSet<String>>,
}

impl LocalEngine {
    /// Initialise the engine from adapter configuration.
    ///
    /// A non-empty `settings_json` must be valid JSON; rejecting it here
    /// surfaces the problem as a degraded service at startup instead of
    /// an opaque failure on the first request.
    pub fn new(config: &EngineConfig) -> Result<Self, ServiceError> {
        if !config.settings_json.is_empty() {
            serde_json::from_str::<serde_json::Value>(&config.settings_json).map_err(|e| {
                ServiceError::InvalidConfig(format!("engine settings are not valid JSON: {e}"))
            })?;
        }

        tracing::debug!(
            instance = %config.instance_name,
            verbose = config.verbose_logging,
            "initialising local engine"
        );
        Ok(Self {
            instance_name: config.instance_name.clone(),
            data_sources: RwLock::new(
                SEED_DATA_SOURCES.iter().map(|s| s.to_string()).collect(),
            ),
        })
    }

    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }
}

#[async_trait]
impl EngineClient for LocalEngine {
    async fn heartbeat(&self) -> EngineResult<()> {
        Ok(())
    }

    async fn version(&self) -> EngineResult<VersionInfo> {
        Ok(VersionInfo {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            api_version: "1.0".to_string(),
        })
    }

    async fn data_sources(&self) -> EngineResult<Vec<String>> {
        let sources = self
            .data_sources
            .read()
            .map_err(|_| EngineError::Protocol("data source registry poisoned".to_string()))?;
        Ok(sources.iter().cloned().collect())
    }

    async fn add_data_sources(&self, codes: &[String]) -> EngineResult<Vec<String>> {
        if codes.is_empty() {
            return Err(EngineError::InvalidRequest(
                "no data source codes supplied".to_string(),
            ));
        }
        if let Some(bad) = codes.iter().find(|c| c.trim().is_empty()) {
            return Err(EngineError::InvalidRequest(format!(
                "blank data source code: {bad:?}"
            )));
        }

        let mut sources = self
            .data_sources
            .write()
            .map_err(|_| EngineError::Protocol("data source registry poisoned".to_string()))?;
        for code in codes {
            sources.insert(code.clone());
        }
        Ok(sources.iter().cloned().collect())
    }
}

// =========================================================================
// Remote engine proxy
// =========================================================================

// Response shapes for deserializing the upstream engine server's JSON.

#[derive(Deserialize)]
struct VersionResp {
    data: VersionInfo,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DataSourcesResp {
    data: DataSourcesData,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DataSourcesData {
    data_sources: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddDataSourcesReq<'a> {
    data_sources: &'a [String],
}

/// Engine client that proxies every call over HTTP to a remote engine
/// server.
pub struct RemoteEngine {
    http: reqwest::Client,
    endpoint: Url,
}

impl RemoteEngine {
    /// Build the HTTP client for a parsed target. Fails only on client
    /// construction; reachability is probed per request, not here.
    pub fn new(target: EngineTarget) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .connect_timeout(target.options.connect_timeout)
            .timeout(target.options.request_timeout)
            .build()
            .map_err(|e| ServiceError::InvalidConfig(format!("engine http client: {e}")))?;

        // Url::join treats a base without a trailing slash as a file path
        // and would drop its last segment.
        let mut endpoint = target.endpoint;
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn url(&self, path: &str) -> EngineResult<Url> {
        self.endpoint
            .join(path)
            .map_err(|e| EngineError::Protocol(format!("bad engine path '{path}': {e}")))
    }

    async fn check(resp: reqwest::Response) -> EngineResult<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp.text().await.unwrap_or_default();
        Err(EngineError::Upstream {
            status: status.as_u16(),
            message,
        })
    }
}

fn transport(err: reqwest::Error) -> EngineError {
    EngineError::Unavailable(err.to_string())
}

#[async_trait]
impl EngineClient for RemoteEngine {
    async fn heartbeat(&self) -> EngineResult<()> {
        let resp = self
            .http
            .get(self.url("heartbeat")?)
            .send()
            .await
            .map_err(transport)?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn version(&self) -> EngineResult<VersionInfo> {
        let resp = self
            .http
            .get(self.url("version")?)
            .send()
            .await
            .map_err(transport)?;
        let body: VersionResp = Self::check(resp)
            .await?
            .json()
            .await
            .map_err(|e| EngineError::Protocol(e.to_string()))?;
        Ok(body.data)
    }

    async fn data_sources(&self) -> EngineResult<Vec<String>> {
        let resp = self
            .http
            .get(self.url("data-sources")?)
            .send()
            .await
            .map_err(transport)?;
        let body: DataSourcesResp = Self::check(resp)
            .await?
            .json()
            .await
            .map_err(|e| EngineError::Protocol(e.to_string()))?;
        Ok(body.data.data_sources)
    }

    async fn add_data_sources(&self, codes: &[String]) -> EngineResult<Vec<String>> {
        let resp = self
            .http
            .post(self.url("data-sources")?)
            .json(&AddDataSourcesReq {
                data_sources: codes,
            })
            .send()
            .await
            .map_err(transport)?;
        let body: DataSourcesResp = Self::check(resp)
            .await?
            .json()
            .await
            .map_err(|e| EngineError::Protocol(e.to_string()))?;
        Ok(body.data.data_sources)
    }
}
