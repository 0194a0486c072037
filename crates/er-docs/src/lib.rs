//! er-docs - API documentation UI backend adapter
//!
//! Serves an interactive documentation UI for the entity-resolution API:
//! a shell page at the sub-router root plus the OpenAPI document it
//! renders. The document is embedded at build time and carries a host
//! placeholder in its server URL; each request gets the placeholder
//! replaced with the externally-observed host, so the "try it out"
//! requests land back on this gateway.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use axum_extra::extract::Host;
use er_core::ServiceError;

/// Placeholder in the embedded document replaced with the request host.
const HOST_PLACEHOLDER: &str = "{{host}}";

const OPENAPI_SPEC: &str = include_str!("../assets/openapi.json");
const UI_PAGE: &str = include_str!("../assets/index.html");

#[derive(Clone)]
struct DocsState {
    spec: Arc<str>,
}

/// Construct the documentation sub-router with the embedded OpenAPI
/// document.
pub fn docs_service() -> Result<Router, ServiceError> {
    docs_service_with_spec(OPENAPI_SPEC)
}

/// Construct the documentation sub-router around a caller-supplied
/// OpenAPI document. Fails when the document is not valid JSON, leaving
/// the service degraded instead of serving garbage.
pub fn docs_service_with_spec(spec: &str) -> Result<Router, ServiceError> {
    serde_json::from_str::<serde_json::Value>(spec)
        .map_err(|e| ServiceError::InvalidConfig(format!("OpenAPI document: {e}")))?;

    let state = DocsState { spec: spec.into() };
    Ok(Router::new()
        .route("/", get(ui_page))
        .route("/openapi.json", get(openapi))
        .with_state(state))
}

async fn ui_page() -> Html<&'static str> {
    Html(UI_PAGE)
}

async fn openapi(State(state): State<DocsState>, Host(host): Host) -> Response {
    let body = state.spec.replace(HOST_PLACEHOLDER, &host);
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[test]
    fn embedded_spec_is_valid_json_with_placeholder() {
        let value: serde_json::Value = serde_json::from_str(OPENAPI_SPEC).unwrap();
        let server_url = value["servers"][0]["url"].as_str().unwrap();
        assert!(server_url.contains(HOST_PLACEHOLDER));
    }

    #[test]
    fn construction_rejects_invalid_document() {
        assert!(matches!(
            docs_service_with_spec("{broken"),
            Err(ServiceError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn openapi_substitutes_request_host() {
        let router = docs_service().unwrap();
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/openapi.json")
                    .header("host", "gateway.test:8261")
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
        assert_eq!(
            body["servers"][0]["url"],
            "http://gateway.test:8261/api"
        );
    }

    #[tokio::test]
    async fn ui_page_is_served_at_root() {
        let router = docs_service().unwrap();
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("host", "gateway.test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
