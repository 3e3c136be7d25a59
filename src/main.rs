use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

mod api;
mod config;
mod data;
mod handler;
mod http;
mod logger;
mod server;

/// Config file used when no path is given on the command line (`config.toml`)
const DEFAULT_CONFIG_PATH: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Worker threads default to the number of CPU cores
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    // Demo records until a persistent store backs the API
    let provider = Arc::new(data::FixtureProvider::new());
    let state = Arc::new(config::AppState::new(cfg, provider));

    server::start_server_loop(listener, state, Arc::new(AtomicUsize::new(0)), signals).await;
    Ok(())
}
