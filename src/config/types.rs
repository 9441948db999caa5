// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default tracing filter, overridden by `RUST_LOG`
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    /// Ceiling on the declared Content-Length of any request
    pub max_body_size: u64,
}

/// Upstream hosting API
#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    /// Where upstream calls are sent
    pub base_url: String,
    /// Origin the upstream writes into its JSON bodies; rewritten to the edge origin
    pub public_origin: String,
    pub timeout_secs: u64,
    /// Largest accepted `file` field, inclusive
    pub max_upload_bytes: u64,
}

/// How the edge names its own origin
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProxyConfig {
    /// Fixed origin such as `https://files.example.com`. When unset the origin is
    /// derived per request from forwarding headers and `Host`.
    #[serde(default)]
    pub public_origin: Option<String>,
}
