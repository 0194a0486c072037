//! Listener lifecycle: bind the configured interface and port, then run
//! the accept loop until the process terminates.
//!
//! A bind failure is the one failure class that takes the whole process
//! down; nothing could ever be served without the socket.

use std::net::{IpAddr, SocketAddr};

use er_core::ConfigError;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use crate::mount::{build_gateway, ServiceStatus};

/// Fatal gateway errors.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Parse the configured listen interface and port.
pub fn listen_addr(config: &GatewayConfig) -> Result<SocketAddr, ConfigError> {
    let ip: IpAddr = config
        .bind_address
        .parse()
        .map_err(|e: std::net::AddrParseError| ConfigError::ListenAddress {
            addr: config.bind_address.clone(),
            reason: e.to_string(),
        })?;
    Ok(SocketAddr::new(ip, config.http_port))
}

/// Build the gateway and serve it until process termination.
pub async fn serve(config: GatewayConfig) -> Result<(), GatewayError> {
    let addr = listen_addr(&config)?;
    let gateway = build_gateway(&config)?;

    for service in gateway.services.iter() {
        match service.status() {
            ServiceStatus::Live => tracing::info!(
                service = service.name(),
                url = %format!("http://{}/{}", addr, service.path_prefix()),
                "serving"
            ),
            ServiceStatus::Degraded => tracing::warn!(
                service = service.name(),
                "enabled but degraded, not serving"
            ),
            ServiceStatus::Disabled => {
                tracing::debug!(service = service.name(), "disabled")
            }
        }
    }

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| GatewayError::Bind { addr, source })?;
    tracing::info!("listening on http://{addr}");

    axum::serve(listener, gateway.router).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_addr_combines_interface_and_port() {
        let config = GatewayConfig {
            bind_address: "127.0.0.1".to_string(),
            http_port: 9000,
            ..GatewayConfig::default()
        };
        assert_eq!(
            listen_addr(&config).unwrap(),
            "127.0.0.1:9000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn invalid_interface_is_a_config_error() {
        let config = GatewayConfig {
            bind_address: "not-an-interface".to_string(),
            ..GatewayConfig::default()
        };
        assert!(matches!(
            listen_addr(&config),
            Err(ConfigError::ListenAddress { .. })
        ));
    }
}
