use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;

use hs_edge::config::{self, AppState, Config};
use hs_edge::logger;
use hs_edge::server::{self, ServerLoopConfig, SignalHandler};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = config_path_from_args(std::env::args().skip(1));
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

/// `hs-edge [--config <path> | <path>]`, path given without extension
fn config_path_from_args(mut args: impl Iterator<Item = String>) -> String {
    match args.next() {
        Some(flag) if flag == "--config" || flag == "-c" => args.next(),
        other => other,
    }
    .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string())
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;
    let state = Arc::new(AppState::new(&cfg)?);

    logger::log_server_start(&addr, &state);

    let signals = Arc::new(SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals))?;

    let loop_config = ServerLoopConfig {
        shutdown: Arc::clone(&signals.shutdown),
        active_connections: Arc::new(AtomicUsize::new(0)),
        // An in-flight upstream call may take up to its own timeout
        drain_timeout: Duration::from_secs(
            cfg.performance
                .read_timeout
                .max(cfg.performance.write_timeout)
                .max(cfg.upstream.timeout_secs),
        ),
    };

    server::run(listener, state, loop_config).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(ToString::to_string).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_config_path_from_args() {
        assert_eq!(config_path_from_args(args(&[])), "config");
        assert_eq!(config_path_from_args(args(&["prod"])), "prod");
        assert_eq!(config_path_from_args(args(&["--config", "etc/edge"])), "etc/edge");
        assert_eq!(config_path_from_args(args(&["--config"])), "config");
    }
}
