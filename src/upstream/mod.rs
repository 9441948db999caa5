//! Upstream hosting API client
//!
//! Thin wrapper over the three calls the hosting service exposes:
//! `POST /upload`, `GET /hosturl?url=` and `GET /<filename>`.
//! Calls are made once; any failure goes straight back to the caller.

use std::time::Duration;

use hyper::body::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::config::UpstreamConfig;
use crate::error::{ProxyError, Result};

const USER_AGENT: &str = concat!("hs-edge/", env!("CARGO_PKG_VERSION"));

const UPLOAD_OP: &str = "Upload";
const IMPORT_OP: &str = "URL upload";
const FETCH_OP: &str = "File serve";

/// A file body relayed from upstream
#[derive(Debug)]
pub struct UpstreamFile {
    pub data: Bytes,
    /// Content-Type the upstream declared, if any
    pub content_type: Option<String>,
}

/// Client for the upstream hosting API
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> std::result::Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Forward file bytes as a fresh multipart body with a single `file` field
    pub async fn upload(&self, filename: String, data: Vec<u8>) -> Result<Value> {
        let size = data.len();
        let form = Form::new().part("file", Part::bytes(data).file_name(filename));

        tracing::debug!(size, "Forwarding upload to upstream");

        let response = self
            .http_client
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ProxyError::transport(UPLOAD_OP, e))?;

        read_json(UPLOAD_OP, response).await
    }

    /// Ask upstream to fetch and host `media_url`
    pub async fn import_url(&self, media_url: &str) -> Result<Value> {
        tracing::debug!(media_url, "Forwarding URL import to upstream");

        let response = self
            .http_client
            .get(format!("{}/hosturl", self.base_url))
            .query(&[("url", media_url)])
            .send()
            .await
            .map_err(|e| ProxyError::transport(IMPORT_OP, e))?;

        read_json(IMPORT_OP, response).await
    }

    /// Fetch a hosted file. `filename` must already be validated.
    ///
    /// Any non-2xx answer, including server errors, is reported as not found.
    pub async fn fetch_file(&self, filename: &str) -> Result<UpstreamFile> {
        let response = self
            .http_client
            .get(format!("{}/{filename}", self.base_url))
            .send()
            .await
            .map_err(|e| ProxyError::transport(FETCH_OP, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(filename, status = status.as_u16(), "Upstream has no such file");
            return Err(ProxyError::NotFound("File not found".to_string()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(ToString::to_string);

        let data = response
            .bytes()
            .await
            .map_err(|e| ProxyError::transport(FETCH_OP, e))?;

        Ok(UpstreamFile { data, content_type })
    }
}

/// Check the status and parse the JSON body of an upload or import reply
async fn read_json(operation: &'static str, response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        tracing::warn!(operation, status = status.as_u16(), "Upstream rejected request");
        return Err(ProxyError::Upstream {
            operation,
            status: status.as_u16(),
        });
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| ProxyError::transport(operation, e))
}
