//! erd - entity-resolution service gateway daemon
//!
//! A single-process HTTP front door that mounts the entity-resolution
//! REST API, the API documentation UI and the terminal service behind
//! one listening socket, each under its own URL prefix, plus a status
//! dashboard at `/`.
//!
//! Usage:
//!   erd [OPTIONS]
//!
//! Every flag also binds an `ERD_*` environment variable; an optional
//! TOML file supplies the rest. Precedence: flag > environment > file >
//! built-in default.

use clap::Parser;
use er_gateway::GatewayConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration file consulted when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "erd.toml";

#[derive(Debug, Parser)]
#[command(name = "erd", version, about = "HTTP front door for the entity-resolution toolset")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, env = "ERD_CONFIG")]
    config: Option<String>,

    /// Enable all services
    #[arg(long, env = "ERD_ENABLE_ALL")]
    enable_all: bool,

    /// Enable the entity-resolution REST API service
    #[arg(long, env = "ERD_ENABLE_API")]
    enable_api: bool,

    /// Enable the API documentation UI service
    #[arg(long, env = "ERD_ENABLE_API_DOCS")]
    enable_api_docs: bool,

    /// Enable the terminal service
    #[arg(long, env = "ERD_ENABLE_TERMINAL")]
    enable_terminal: bool,

    /// IP interface the server listens on
    #[arg(long, env = "ERD_BIND_ADDRESS")]
    bind_address: Option<String>,

    /// Port to serve HTTP on
    #[arg(long, env = "ERD_HTTP_PORT")]
    http_port: Option<u16>,

    /// URL of a remote entity-resolution engine; uses the local
    /// in-process engine when absent
    #[arg(long, env = "ERD_ENGINE_URL")]
    engine_url: Option<String>,

    /// Engine initialisation settings, JSON text
    #[arg(long, env = "ERD_ENGINE_SETTINGS")]
    engine_settings: Option<String>,

    /// Identifier this instance reports to the engine
    #[arg(long, env = "ERD_ENGINE_INSTANCE_NAME")]
    engine_instance_name: Option<String>,

    /// Shell command run for each terminal session
    #[arg(long, env = "ERD_TERMINAL_COMMAND")]
    terminal_command: Option<String>,

    /// Working directory for terminal sessions
    #[arg(long, env = "ERD_TERMINAL_WORKDIR")]
    terminal_workdir: Option<String>,

    /// Comma-delimited hostnames permitted to attach a terminal
    #[arg(long, env = "ERD_TERMINAL_ALLOWED_HOSTNAMES", value_delimiter = ',')]
    terminal_allowed_hostnames: Option<Vec<String>>,
}

/// Merge the configuration file (if any) with flag/environment values.
///
/// Enablement flags only ever switch services on, so they OR onto the
/// file's values; everything else replaces the file value when given.
fn resolve_config(cli: Cli) -> anyhow::Result<GatewayConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!(path = %path, "applying configuration file");
            GatewayConfig::load(path)?
        }
        None if std::path::Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            tracing::info!(path = DEFAULT_CONFIG_FILE, "applying configuration file");
            GatewayConfig::load(DEFAULT_CONFIG_FILE)?
        }
        None => GatewayConfig::default(),
    };

    config.enable_all |= cli.enable_all;
    config.enable_api |= cli.enable_api;
    config.enable_api_docs |= cli.enable_api_docs;
    config.enable_terminal |= cli.enable_terminal;

    if let Some(bind_address) = cli.bind_address {
        config.bind_address = bind_address;
    }
    if let Some(http_port) = cli.http_port {
        config.http_port = http_port;
    }
    if let Some(engine_url) = cli.engine_url {
        config.engine.url = Some(engine_url);
    }
    if let Some(settings) = cli.engine_settings {
        config.engine.settings_json = settings;
    }
    if let Some(instance_name) = cli.engine_instance_name {
        config.engine.instance_name = instance_name;
    }
    if let Some(command) = cli.terminal_command {
        config.terminal.command = command;
    }
    if let Some(workdir) = cli.terminal_workdir {
        config.terminal.working_dir = workdir.into();
    }
    if let Some(hostnames) = cli.terminal_allowed_hostnames {
        config.terminal.allowed_hostnames = hostnames;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "erd=info,er_gateway=info,er_engine=info,er_docs=info,er_term=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("starting erd (entity-resolution service gateway)");

    let cli = Cli::parse();
    let config = resolve_config(cli)?;

    er_gateway::serve(config).await?;
    Ok(())
}
