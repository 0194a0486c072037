//! Remote engine target parsing.
//!
//! The operator supplies at most one engine URL. When present it is
//! parsed here into an endpoint plus connection options; both are opaque
//! to the gateway, which only hands them to the adapter constructor.

use std::time::Duration;

use er_core::ServiceError;
use url::Url;

/// Connection options for the remote engine client.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// A parsed remote engine target.
#[derive(Debug, Clone)]
pub struct EngineTarget {
    pub endpoint: Url,
    pub options: ConnectOptions,
}

impl EngineTarget {
    /// Parse an operator-supplied engine URL.
    ///
    /// Only `http` and `https` targets are accepted; anything else is a
    /// construction error, which the gateway reports as a degraded
    /// service rather than a fatal startup failure.
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        let endpoint = Url::parse(raw).map_err(|e| ServiceError::InvalidTarget {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        match endpoint.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ServiceError::InvalidTarget {
                    url: raw.to_string(),
                    reason: format!("unsupported scheme '{other}'"),
                })
            }
        }

        if endpoint.host_str().is_none() {
            return Err(ServiceError::InvalidTarget {
                url: raw.to_string(),
                reason: "missing host".to_string(),
            });
        }

        Ok(Self {
            endpoint,
            options: ConnectOptions::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_http_target() {
        let target = EngineTarget::parse("http://engine.internal:8250").unwrap();
        assert_eq!(target.endpoint.host_str(), Some("engine.internal"));
        assert_eq!(target.endpoint.port(), Some(8250));
    }

    #[test]
    fn rejects_garbage() {
        let err = EngineTarget::parse("not a url").unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTarget { .. }));
    }

    #[test]
    fn rejects_unsupported_scheme() {
        let err = EngineTarget::parse("ftp://engine.internal").unwrap_err();
        assert!(matches!(
            err,
            ServiceError::InvalidTarget { reason, .. } if reason.contains("scheme")
        ));
    }

    #[test]
    fn rejects_missing_host() {
        assert!(EngineTarget::parse("http://").is_err());
    }
}
