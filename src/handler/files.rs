//! File retrieval: `GET /<filename>`
//!
//! Relays a hosted file from upstream. Only plain names are accepted, so the
//! request can never address anything but a single upstream file.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::config::AppState;
use crate::error::{ProxyError, Result};
use crate::http::{self, mime, CachePolicy};

/// Serve the file named by the last `/`-separated segment of the request target
///
/// `target` is the path plus query, so `/a.png?v=1` names `a.png?v=1` and is rejected.
pub async fn serve_file(target: &str, state: &AppState) -> Result<Response<Full<Bytes>>> {
    let filename = validate_filename(last_segment(target))?;
    let file = state.upstream.fetch_file(filename).await?;

    let content_type = file
        .content_type
        .as_deref()
        .unwrap_or_else(|| mime::resolve(filename));

    Ok(http::build_file_response(
        file.data,
        content_type,
        CachePolicy::UPSTREAM_FILE,
    ))
}

fn last_segment(target: &str) -> &str {
    target.rsplit('/').next().unwrap_or_default()
}

/// Accept only non-empty names made of `[A-Za-z0-9._-]`, excluding `.` and `..`
///
/// Percent-encoded input is not decoded first, so `%2F` and friends fail here too.
/// Dot-only names would be resolved against the upstream root by URL normalization.
pub fn validate_filename(name: &str) -> Result<&str> {
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'))
        && !matches!(name, "." | "..");

    if valid {
        Ok(name)
    } else {
        Err(ProxyError::input("Invalid filename"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_names() {
        for name in ["a.png", "IMG_0001.JPG", "my-file.tar.gz", "x"] {
            assert_eq!(validate_filename(name).unwrap(), name);
        }
    }

    #[test]
    fn test_rejects_traversal_and_injection() {
        for name in [
            "../../etc/passwd",
            "a/b.png",
            "a.png?x=1",
            "..%2F..%2Fetc%2Fpasswd",
            "name with space.png",
            "ünïcode.png",
            "",
        ] {
            let err = validate_filename(name).unwrap_err();
            assert_eq!(err.to_string(), "Invalid filename");
            assert_eq!(err.status(), hyper::StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_rejects_dot_segments() {
        for name in [".", ".."] {
            let err = validate_filename(name).unwrap_err();
            assert_eq!(err.to_string(), "Invalid filename");
        }
        for name in ["...", ".hidden", "a..b"] {
            assert_eq!(validate_filename(name).unwrap(), name);
        }
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(last_segment("/a.png"), "a.png");
        assert_eq!(last_segment("/nested/dir/a.png"), "a.png");
        assert_eq!(last_segment("/dir/"), "");
        assert_eq!(last_segment("/a.png?x=1"), "a.png?x=1");
    }
}
