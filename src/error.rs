//! Error types for the edge handler
//!
//! Every failure a request can hit ends up as one of these variants, and the router
//! renders it as `{"error": <message>}` with the status from [`ProxyError::status`].

use hyper::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyError {
    /// Missing or malformed client input
    #[error("{0}")]
    Input(String),

    /// Uploaded payload is larger than the configured ceiling
    #[error("File size exceeds {limit_mb}MB limit")]
    SizeLimit { limit_mb: u64 },

    /// Requested file is absent upstream
    #[error("{0}")]
    NotFound(String),

    /// Upstream answered with a non-2xx status
    #[error("{operation} failed: {operation} failed with status: {status}")]
    Upstream { operation: &'static str, status: u16 },

    /// Anything else: transport failures, unreadable upstream bodies
    #[error("{0}")]
    Unhandled(String),
}

impl ProxyError {
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    pub const fn size_limit(limit_bytes: u64) -> Self {
        Self::SizeLimit {
            limit_mb: limit_bytes / (1024 * 1024),
        }
    }

    /// Wrap a transport error. The request URL is stripped so the upstream
    /// location never reaches the caller.
    pub fn transport(operation: &'static str, err: reqwest::Error) -> Self {
        Self::Unhandled(format!("{operation} failed: {}", err.without_url()))
    }

    /// HTTP status this error is surfaced with
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Input(_) | Self::SizeLimit { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream { .. } | Self::Unhandled(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<multer::Error> for ProxyError {
    fn from(err: multer::Error) -> Self {
        Self::Input(format!("Invalid multipart body: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ProxyError::input("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ProxyError::size_limit(20 * 1024 * 1024).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ProxyError::NotFound("File not found".into()).status(),
            StatusCode::NOT_FOUND
        );
        let upstream = ProxyError::Upstream {
            operation: "Upload",
            status: 404,
        };
        assert_eq!(upstream.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ProxyError::Unhandled("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ProxyError::size_limit(20 * 1024 * 1024).to_string(),
            "File size exceeds 20MB limit"
        );
        let upstream = ProxyError::Upstream {
            operation: "URL upload",
            status: 502,
        };
        assert_eq!(upstream.to_string(), "URL upload failed: URL upload failed with status: 502");
    }
}
