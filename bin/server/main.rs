//! Workspace API Server
//!
//! Serves workspace runs and steps to the dashboard.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tango_viz::config::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_WORKSPACE_ROOT};
use tango_viz::{logging, LogFormat, ServerConfig, VizServer, DEFAULT_CACHE_CAPACITY};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "tango-viz-server")]
#[command(about = "Read-only HTTP API over workspace runs and steps")]
struct Args {
    /// Server port
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "VIZ_PORT")]
    port: u16,

    /// Server host
    #[arg(long, default_value = DEFAULT_HOST, env = "VIZ_HOST")]
    host: String,

    /// Directory holding `<workspace>.json` snapshots
    #[arg(short, long, default_value = DEFAULT_WORKSPACE_ROOT, env = "VIZ_WORKSPACE_ROOT")]
    workspace_root: PathBuf,

    /// Number of open workspaces to keep
    #[arg(long, default_value_t = DEFAULT_CACHE_CAPACITY, env = "VIZ_CACHE_CAPACITY")]
    cache_capacity: usize,

    /// Log format: text or json
    #[arg(long, default_value = "text", env = "VIZ_LOG_FORMAT")]
    log_format: LogFormat,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        ServerConfig {
            host: args.host,
            port: args.port,
            workspace_root: args.workspace_root,
            cache_capacity: args.cache_capacity.max(1),
            log_format: args.log_format,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from(Args::parse());
    logging::init_logging(config.log_format)?;

    info!("Starting workspace API server");
    info!("  Workspace root: {}", config.workspace_root.display());
    info!("  Listening on: {}", config.bind_addr());

    VizServer::from_config(config).start().await
}
