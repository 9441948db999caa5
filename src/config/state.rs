// Application state module
// Read-only values shared by every connection

use super::types::Config;
use crate::rewrite::DomainRewriter;
use crate::upstream::UpstreamClient;

/// Application state
///
/// Nothing in here is mutated after startup, so requests never contend on it.
pub struct AppState {
    pub config: Config,
    pub upstream: UpstreamClient,
    pub rewriter: DomainRewriter,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let upstream = UpstreamClient::new(&config.upstream)?;
        let rewriter = DomainRewriter::new(config.upstream.public_origin.as_str());

        Ok(Self {
            config: config.clone(),
            upstream,
            rewriter,
        })
    }
}
