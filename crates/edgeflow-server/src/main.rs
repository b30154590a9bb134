/*!
 * edgeflow adapter type server.
 *
 * Loads configuration, registers the built-in adapter factories and serves
 * the management API plus the configuration frontend until Ctrl-C.
 */
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use edgeflow_adapters::discovery::FactoryRegistry;
use edgeflow_core::config::{ConfigBuilder, SharedConfig, DEFAULT_ENV_PREFIX};
use edgeflow_core::logging;
use edgeflow_schema::AdapterTypeRegistry;
use edgeflow_server::settings::{apply_port_override, resolve_frontend_root};
use edgeflow_server::{spawn_server, AppState, StaticFiles, ADAPTER_TYPES_PATH};
use tokio::runtime::Builder as TokioRuntimeBuilder;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "edgeflow-server", version, about = "edgeflow adapter type server")]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, env = "EDGEFLOW_CONFIG")]
    config: Option<PathBuf>,

    /// Listening port
    #[arg(long, env = "PORT")]
    port: Option<String>,

    /// Directory holding the prebuilt frontend
    #[arg(long, env = "FRONTEND_PATH")]
    frontend_path: Option<String>,

    /// Log level or filter directive
    #[arg(long)]
    log_level: Option<String>,

    /// Cache adapter descriptors until the factory set changes
    #[arg(long)]
    cache_descriptors: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder = ConfigBuilder::new().with_environment_prefix(DEFAULT_ENV_PREFIX);
    if let Some(path) = &cli.config {
        builder = builder.with_config_file(path);
    }
    let mut config = builder.build().context("loading configuration")?;

    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    logging::init_from_config(&config.logging).context("initializing logging")?;

    apply_port_override(&mut config.server, cli.port.as_deref());
    if cli.frontend_path.is_some() {
        config.server.frontend_path = cli.frontend_path.clone();
    }
    if cli.cache_descriptors {
        config.runtime.cache_descriptors = true;
    }

    let mut runtime = TokioRuntimeBuilder::new_multi_thread();
    if config.runtime.worker_threads > 0 {
        runtime.worker_threads(config.runtime.worker_threads);
    }
    let runtime = runtime
        .enable_all()
        .thread_name("edgeflow-worker")
        .build()
        .context("creating tokio runtime")?;

    runtime.block_on(run(SharedConfig::new(config)))
}

async fn run(shared: SharedConfig) -> Result<()> {
    let config = shared.get();
    edgeflow_schema::init().context("initializing schema")?;

    let factories = FactoryRegistry::shared();
    for factory in edgeflow_adapters::builtin_factories() {
        factories.register(factory).context("registering built-in adapters")?;
    }

    let registry = AdapterTypeRegistry::new(factories).with_cache(config.runtime.cache_descriptors);
    let frontend_root = resolve_frontend_root(config.server.frontend_path.as_deref());
    let state = AppState::new(registry, StaticFiles::new(frontend_root.clone()));

    let handle = spawn_server(state, &config.server.bind_address())
        .await
        .context("starting server")?;

    info!("edgeflow adapter type server running on http://{}", handle.addr());
    info!("Adapter types: http://{}{}", handle.addr(), ADAPTER_TYPES_PATH);
    info!("Serving frontend from {}", frontend_root.display());

    tokio::signal::ctrl_c().await.context("waiting for Ctrl-C")?;
    info!("Received Ctrl-C, shutting down");

    handle.shutdown().await.context("stopping server")?;
    Ok(())
}
