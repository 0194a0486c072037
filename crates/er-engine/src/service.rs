//! REST surface of the entity-resolution adapter.
//!
//! The router is mounted by the gateway under its URL prefix with the
//! prefix stripped, so every route here is root-relative. Handlers
//! delegate to the [`EngineClient`] boundary and wrap results in the
//! engine API's response envelope (data + links + meta).

use std::sync::Arc;

use axum::extract::{OriginalUri, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use er_core::ServiceError;
use serde::{Deserialize, Serialize};

use crate::client::{EngineClient, EngineError, LocalEngine, RemoteEngine};
use crate::target::EngineTarget;

/// Configuration handed to the adapter constructor by the gateway.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Remote engine server URL. Absent means the local in-process engine.
    pub url: Option<String>,
    /// Engine initialisation settings, JSON text. Empty uses defaults.
    pub settings_json: String,
    /// Identifier this instance reports to the engine.
    pub instance_name: String,
    /// Verbose engine logging.
    pub verbose_logging: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: None,
            settings_json: String::new(),
            instance_name: "erd".to_string(),
            verbose_logging: false,
        }
    }
}

type SharedEngine = Arc<dyn EngineClient>;

/// Construct the entity-resolution sub-router.
///
/// Selects the engine binding from the configured URL, builds the client
/// once, and hands ownership to the router. Construction errors (bad
/// target, malformed settings) leave the service degraded; they never
/// abort the gateway.
pub fn engine_service(config: EngineConfig) -> Result<Router, ServiceError> {
    let client: SharedEngine = match &config.url {
        Some(raw) => {
            let target = EngineTarget::parse(raw)?;
            tracing::info!(endpoint = %target.endpoint, "engine binding: remote");
            Arc::new(RemoteEngine::new(target)?)
        }
        None => {
            tracing::info!(instance = %config.instance_name, "engine binding: local in-process");
            Arc::new(LocalEngine::new(&config)?)
        }
    };

    Ok(Router::new()
        .route("/heartbeat", get(heartbeat))
        .route("/version", get(version))
        .route("/data-sources", get(list_data_sources).post(add_data_sources))
        .with_state(client))
}

// =========================================================================
// Response envelope
// =========================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Meta {
    server: &'static str,
    http_method: String,
    http_status_code: u16,
    timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
struct Links {
    #[serde(rename = "self")]
    self_link: String,
}

#[derive(Serialize)]
struct Envelope<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    links: Links,
    meta: Meta,
}

fn envelope<T: Serialize>(data: Option<T>, method: &Method, uri: &Uri) -> Json<Envelope<T>> {
    Json(Envelope {
        data,
        links: Links {
            self_link: uri.path().to_string(),
        },
        meta: Meta {
            server: "erd",
            http_method: method.to_string(),
            http_status_code: StatusCode::OK.as_u16(),
            timestamp: Utc::now(),
        },
    })
}

// =========================================================================
// Handlers
// =========================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DataSourcesData {
    data_sources: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddDataSourcesBody {
    data_sources: Vec<String>,
}

async fn heartbeat(
    State(client): State<SharedEngine>,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> Result<Response, ApiError> {
    client.heartbeat().await?;
    Ok(envelope::<()>(None, &method, &uri).into_response())
}

async fn version(
    State(client): State<SharedEngine>,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> Result<Response, ApiError> {
    let info = client.version().await?;
    Ok(envelope(Some(info), &method, &uri).into_response())
}

async fn list_data_sources(
    State(client): State<SharedEngine>,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> Result<Response, ApiError> {
    let data_sources = client.data_sources().await?;
    Ok(envelope(Some(DataSourcesData { data_sources }), &method, &uri).into_response())
}

async fn add_data_sources(
    State(client): State<SharedEngine>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Json(body): Json<AddDataSourcesBody>,
) -> Result<Response, ApiError> {
    let data_sources = client.add_data_sources(&body.data_sources).await?;
    Ok(envelope(Some(DataSourcesData { data_sources }), &method, &uri).into_response())
}

// =========================================================================
// Error mapping
// =========================================================================

/// Per-request error type, mapped to HTTP responses here and nowhere
/// else; the gateway passes these through untouched.
#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    BadGateway(String),
    ServiceUnavailable(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "bad_gateway", msg),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
        };

        if status.is_server_error() {
            tracing::error!(error, %message, "engine API error");
        } else {
            tracing::debug!(error, %message, "engine API client error");
        }

        (status, Json(ErrorResponse { error, message })).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidRequest(msg) => ApiError::BadRequest(msg),
            EngineError::Unavailable(msg) => ApiError::ServiceUnavailable(msg),
            EngineError::Upstream { status, message } => {
                ApiError::BadGateway(format!("upstream status {status}: {message}"))
            }
            EngineError::Protocol(msg) => ApiError::BadGateway(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[test]
    fn construction_fails_on_invalid_remote_target() {
        let config = EngineConfig {
            url: Some("not a url".to_string()),
            ..EngineConfig::default()
        };
        assert!(matches!(
            engine_service(config),
            Err(ServiceError::InvalidTarget { .. })
        ));
    }

    #[tokio::test]
    async fn heartbeat_answers_with_envelope() {
        let router = engine_service(EngineConfig::default()).unwrap();
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/heartbeat")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["meta"]["httpStatusCode"], 200);
        assert_eq!(body["links"]["self"], "/heartbeat");
    }

    #[tokio::test]
    async fn data_sources_roundtrip() {
        let router = engine_service(EngineConfig::default()).unwrap();

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/data-sources")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"dataSources":["CUSTOMERS"]}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let listed: Vec<&str> = body["data"]["dataSources"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(listed, ["CUSTOMERS", "SEARCH", "TEST"]);
    }
}
