//! Public origin of the edge
//!
//! Upstream links are rewritten to this origin. A configured value always wins;
//! otherwise it comes from the request, honouring reverse-proxy forwarding headers.

use hyper::header::HOST;
use hyper::Request;
use std::net::SocketAddr;

use crate::config::ProxyConfig;

const FORWARDED_PROTO: &str = "x-forwarded-proto";
const FORWARDED_HOST: &str = "x-forwarded-host";

/// Origin (`scheme://host[:port]`) clients should see in rewritten bodies
pub fn public_origin<B>(req: &Request<B>, config: &ProxyConfig, local_addr: SocketAddr) -> String {
    if let Some(origin) = config.public_origin.as_deref() {
        return origin.trim_end_matches('/').to_string();
    }

    let scheme = first_header_value(req, FORWARDED_PROTO)
        .map(str::to_ascii_lowercase)
        .filter(|s| s == "http" || s == "https")
        .unwrap_or_else(|| "http".to_string());

    let host = first_header_value(req, FORWARDED_HOST)
        .or_else(|| first_header_value(req, HOST.as_str()))
        .or_else(|| req.uri().authority().map(|a| a.as_str()))
        .filter(|h| is_valid_host(h))
        .map_or_else(|| local_addr.to_string(), ToString::to_string);

    format!("{scheme}://{host}")
}

/// First comma-separated value of a header, trimmed
fn first_header_value<'a, B>(req: &'a Request<B>, name: &str) -> Option<&'a str> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Host or host:port, including bracketed IPv6 literals
fn is_valid_host(host: &str) -> bool {
    host.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':' | '[' | ']'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local() -> SocketAddr {
        "127.0.0.1:8080".parse().unwrap()
    }

    fn request(headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder().uri("/upload");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn test_configured_origin_wins() {
        let config = ProxyConfig {
            public_origin: Some("https://files.example.com/".to_string()),
        };
        let req = request(&[("host", "internal:8080")]);
        assert_eq!(
            public_origin(&req, &config, local()),
            "https://files.example.com"
        );
    }

    #[test]
    fn test_host_header() {
        let req = request(&[("host", "edge.example:8443")]);
        assert_eq!(
            public_origin(&req, &ProxyConfig::default(), local()),
            "http://edge.example:8443"
        );
    }

    #[test]
    fn test_forwarded_headers() {
        let req = request(&[
            ("host", "10.0.0.5:8080"),
            ("x-forwarded-proto", "https, http"),
            ("x-forwarded-host", "example.com"),
        ]);
        assert_eq!(
            public_origin(&req, &ProxyConfig::default(), local()),
            "https://example.com"
        );
    }

    #[test]
    fn test_unknown_scheme_falls_back_to_http() {
        let req = request(&[("host", "example.com"), ("x-forwarded-proto", "gopher")]);
        assert_eq!(
            public_origin(&req, &ProxyConfig::default(), local()),
            "http://example.com"
        );
    }

    #[test]
    fn test_suspicious_host_falls_back_to_local_addr() {
        let req = request(&[("host", "evil.example/path")]);
        assert_eq!(
            public_origin(&req, &ProxyConfig::default(), local()),
            "http://127.0.0.1:8080"
        );
    }
}
