// Configuration module entry point
// Loads layered configuration and owns the per-process application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, ProxyConfig, ServerConfig,
    UpstreamConfig,
};

/// Default upstream hosting API
pub const DEFAULT_UPSTREAM: &str = "https://ar-hosting.pages.dev";

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Sources, lowest precedence first: built-in defaults, the optional file,
    /// then `HS_EDGE_*` environment variables (`HS_EDGE_UPSTREAM__BASE_URL`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("HS_EDGE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "hs-edge")?
            .set_default("http.max_body_size", 33_554_432)? // 32MB, multipart overhead included
            .set_default("upstream.base_url", DEFAULT_UPSTREAM)?
            .set_default("upstream.public_origin", DEFAULT_UPSTREAM)?
            .set_default("upstream.timeout_secs", 60)?
            .set_default("upstream.max_upload_bytes", 20_971_520)? // 20MB
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
