//! er-term - Terminal-over-websocket backend adapter
//!
//! Serves an interactive terminal: a page shell at the sub-router root
//! and a websocket endpoint that bridges the connection to a spawned
//! command. The gateway only supplies configuration and a mount point;
//! the process and socket plumbing stay inside this adapter.

pub mod config;
mod session;

pub use config::TermConfig;

use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use axum_extra::extract::Host;
use er_core::ServiceError;

const TERMINAL_PAGE: &str = include_str!("../assets/index.html");

/// Construct the terminal sub-router.
///
/// Validates the working directory and resolves the configured command
/// up front; either failing leaves the service degraded at startup
/// instead of failing every websocket upgrade later.
pub fn terminal_service(config: TermConfig) -> Result<Router, ServiceError> {
    config.validate()?;

    let state = Arc::new(config);
    Ok(Router::new()
        .route("/", get(terminal_page))
        .route("/ws", get(attach))
        .with_state(state))
}

async fn terminal_page() -> Html<&'static str> {
    Html(TERMINAL_PAGE)
}

async fn attach(
    State(config): State<Arc<TermConfig>>,
    Host(host): Host,
    ws: WebSocketUpgrade,
) -> Response {
    if !config.host_allowed(&host) {
        tracing::warn!(%host, "rejected terminal connection: host not in allow-list");
        return (StatusCode::FORBIDDEN, "host not allowed").into_response();
    }

    ws.on_upgrade(move |socket| session::run(socket, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[test]
    fn construction_fails_on_missing_working_dir() {
        let config = TermConfig {
            working_dir: "/does/not/exist".into(),
            ..TermConfig::default()
        };
        assert!(matches!(
            terminal_service(config),
            Err(ServiceError::WorkingDir(_))
        ));
    }

    #[test]
    fn construction_accepts_a_real_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = TermConfig {
            command: "sh".to_string(),
            working_dir: dir.path().to_path_buf(),
            ..TermConfig::default()
        };
        assert!(terminal_service(config).is_ok());
    }

    #[test]
    fn construction_fails_on_unresolvable_command() {
        let config = TermConfig {
            command: "/no/such/shell".to_string(),
            ..TermConfig::default()
        };
        assert!(matches!(
            terminal_service(config),
            Err(ServiceError::CommandNotFound(_))
        ));
    }

    #[tokio::test]
    async fn page_is_served_at_root() {
        let config = TermConfig {
            command: "sh".to_string(),
            ..TermConfig::default()
        };
        let router = terminal_service(config).unwrap();
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("host", "localhost")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
