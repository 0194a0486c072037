//! Terminal adapter configuration.

use std::path::{Path, PathBuf};

use er_core::ServiceError;
use serde::Deserialize;

/// Configuration for the terminal service, marshaled by the gateway from
/// operator input and handed to the adapter constructor.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TermConfig {
    /// Shell command to run per connection.
    pub command: String,
    /// Arguments passed to the command.
    pub arguments: Vec<String>,
    /// Working directory the command starts in.
    pub working_dir: PathBuf,
    /// Hostnames permitted to open a websocket connection.
    pub allowed_hostnames: Vec<String>,
    /// Consecutive bridge errors tolerated before the session is closed.
    pub connection_error_limit: u32,
    /// Seconds between keepalive pings on an idle connection.
    pub keepalive_ping_timeout_secs: u64,
    /// Maximum length of a single terminal input chunk.
    pub max_buffer_size_bytes: usize,
}

impl Default for TermConfig {
    fn default() -> Self {
        Self {
            command: "/bin/bash".to_string(),
            arguments: Vec::new(),
            working_dir: PathBuf::from("."),
            allowed_hostnames: vec!["localhost".to_string()],
            connection_error_limit: 10,
            keepalive_ping_timeout_secs: 20,
            max_buffer_size_bytes: 512,
        }
    }
}

impl TermConfig {
    /// Check the parts of the configuration that can be checked without
    /// spawning anything: the working directory must exist and the
    /// command must resolve to an executable file.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if !self.working_dir.is_dir() {
            return Err(ServiceError::WorkingDir(
                self.working_dir.display().to_string(),
            ));
        }
        if resolve_command(&self.command).is_none() {
            return Err(ServiceError::CommandNotFound(self.command.clone()));
        }
        Ok(())
    }

    /// Whether the request host (with any port stripped) is in the
    /// allow-list.
    pub fn host_allowed(&self, host: &str) -> bool {
        let name = hostname(host);
        self.allowed_hostnames.iter().any(|allowed| allowed == name)
    }
}

/// Resolve a command the way the shell would: paths are used as-is,
/// bare names are searched on `PATH`.
fn resolve_command(command: &str) -> Option<PathBuf> {
    let path = Path::new(command);
    if path.components().count() > 1 {
        return path.is_file().then(|| path.to_path_buf());
    }
    let search = std::env::var_os("PATH")?;
    std::env::split_paths(&search)
        .map(|dir| dir.join(command))
        .find(|candidate| candidate.is_file())
}

/// Strip the port from a `Host` header value, handling bracketed IPv6
/// literals.
fn hostname(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        if let Some(end) = rest.find(']') {
            return &rest[..end];
        }
    }
    match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}
