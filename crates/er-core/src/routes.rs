//! Explicit route table mapping URL prefixes to sub-routers.
//!
//! The table is built once at startup. Collisions between prefixes are a
//! configuration error detected at insert time, never at request time.
//! Matching is exact-segment: `api` never captures `/apikey/...`, only
//! `/api` and `/api/...`. The mounted sub-router sees paths with the
//! prefix stripped (method and query string untouched), as if it were
//! serving at `/`.

use axum::Router;

use crate::error::ConfigError;

/// Prefix route table, materialised onto an [`axum::Router`] after all
/// services are registered.
#[derive(Default)]
pub struct RouteTable {
    entries: Vec<(String, Router)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `router` under `prefix` (no slashes, e.g. `"api"`).
    ///
    /// Fails when the prefix is malformed or collides with an earlier
    /// registration. Two prefixes collide when their path segments are
    /// equal or one is a leading-segment run of the other: `api` collides
    /// with `api` and with `api/v2`, but not with `apikey`.
    pub fn insert(&mut self, prefix: &str, router: Router) -> Result<(), ConfigError> {
        validate_prefix(prefix)?;
        if let Some((existing, _)) = self.entries.iter().find(|(p, _)| segments_overlap(p, prefix))
        {
            return Err(ConfigError::PrefixCollision {
                new: prefix.to_string(),
                existing: existing.clone(),
            });
        }
        self.entries.push((prefix.to_string(), router));
        Ok(())
    }

    /// Registered prefixes, in registration order.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(p, _)| p.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mount every entry onto `root`. The root router keeps its own
    /// routes and fallback, so it must already carry the catch-all
    /// handlers; nesting performs exact-segment prefix matching, which
    /// keeps the catch-all from shadowing any registered prefix.
    pub fn into_router(self, root: Router) -> Router {
        self.entries
            .into_iter()
            .fold(root, |router, (prefix, sub)| {
                router.nest(&format!("/{prefix}"), sub)
            })
    }
}

fn validate_prefix(prefix: &str) -> Result<(), ConfigError> {
    if prefix.is_empty() {
        return Err(ConfigError::EmptyPrefix);
    }
    if prefix == "/" || prefix.starts_with('/') || prefix.ends_with('/') {
        return Err(ConfigError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason: "must be a bare path segment without leading or trailing '/'".to_string(),
        });
    }
    if prefix.split('/').any(|segment| segment.is_empty()) {
        return Err(ConfigError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason: "must not contain empty path segments".to_string(),
        });
    }
    Ok(())
}

/// Whether one prefix's segment run is a leading run of the other's.
fn segments_overlap(a: &str, b: &str) -> bool {
    let mut a = a.split('/');
    let mut b = b.split('/');
    loop {
        match (a.next(), b.next()) {
            (Some(x), Some(y)) if x == y => continue,
            (Some(_), Some(_)) => return false,
            // One ran out while every shared segment matched.
            _ => return true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;

    fn empty() -> Router {
        Router::new()
    }

    fn handler_router() -> Router {
        Router::new().route("/", get(|| async { "ok" }))
    }

    #[test]
    fn duplicate_prefix_is_a_collision() {
        let mut table = RouteTable::new();
        table.insert("api", empty()).unwrap();
        let err = table.insert("api", empty()).unwrap_err();
        assert!(matches!(err, ConfigError::PrefixCollision { .. }));
    }

    #[test]
    fn nested_prefix_is_a_collision() {
        let mut table = RouteTable::new();
        table.insert("api", empty()).unwrap();
        let err = table.insert("api/v2", empty()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::PrefixCollision { new, existing }
                if new == "api/v2" && existing == "api"
        ));
    }

    #[test]
    fn shared_leading_characters_do_not_collide() {
        let mut table = RouteTable::new();
        table.insert("api", handler_router()).unwrap();
        table.insert("apikey", handler_router()).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn empty_prefix_rejected() {
        let mut table = RouteTable::new();
        assert!(matches!(
            table.insert("", empty()),
            Err(ConfigError::EmptyPrefix)
        ));
    }

    #[test]
    fn slash_wrapped_prefixes_rejected() {
        let mut table = RouteTable::new();
        assert!(table.insert("/", empty()).is_err());
        assert!(table.insert("/api", empty()).is_err());
        assert!(table.insert("api/", empty()).is_err());
        assert!(table.insert("api//v2", empty()).is_err());
    }

    #[test]
    fn prefixes_preserve_registration_order() {
        let mut table = RouteTable::new();
        table.insert("api", empty()).unwrap();
        table.insert("docs", empty()).unwrap();
        table.insert("terminal", empty()).unwrap();
        let prefixes: Vec<_> = table.prefixes().collect();
        assert_eq!(prefixes, ["api", "docs", "terminal"]);
    }
}
