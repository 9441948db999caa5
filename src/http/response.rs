//! HTTP response building module
//!
//! Every builder here starts from [`cors_builder`], so all responses leaving the
//! edge carry the same three cross-origin headers.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE,
};
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};
use serde_json::Value;

use super::cache::CachePolicy;

pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const CORS_ALLOW_HEADERS: &str = "Content-Type, *";

const JSON_CONTENT_TYPE: &str = "application/json";
const NOT_FOUND_MESSAGE: &str = "API endpoint not found";

/// Response builder preloaded with the cross-origin headers
pub fn cors_builder(status: StatusCode) -> Builder {
    Response::builder()
        .status(status)
        .header(ACCESS_CONTROL_ALLOW_ORIGIN, CORS_ALLOW_ORIGIN)
        .header(ACCESS_CONTROL_ALLOW_METHODS, CORS_ALLOW_METHODS)
        .header(ACCESS_CONTROL_ALLOW_HEADERS, CORS_ALLOW_HEADERS)
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response() -> Response<Full<Bytes>> {
    finish(cors_builder(StatusCode::OK), Bytes::new(), "OPTIONS")
}

/// Build the upload page response
pub fn build_html_response(content: &'static str) -> Response<Full<Bytes>> {
    let builder = cors_builder(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header(CONTENT_LENGTH, content.len())
        .header(CACHE_CONTROL, CachePolicy::NoCache.to_header_value());
    finish(builder, Bytes::from_static(content.as_bytes()), "HTML")
}

/// Build JSON response
pub fn build_json_response(status: StatusCode, body: &Value) -> Response<Full<Bytes>> {
    let json = match serde_json::to_vec(body) {
        Ok(j) => j,
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            return build_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            );
        }
    };

    let builder = cors_builder(status)
        .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
        .header(CONTENT_LENGTH, json.len());
    finish(builder, Bytes::from(json), status.as_str())
}

/// Build the `{"error": message}` envelope
pub fn build_error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "error": message }).to_string();
    let builder = cors_builder(status)
        .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
        .header(CONTENT_LENGTH, body.len());
    finish(builder, Bytes::from(body), status.as_str())
}

/// Build 404 for routes that match nothing
pub fn build_not_found_response() -> Response<Full<Bytes>> {
    build_error_response(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    build_error_response(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
}

/// Build a relayed file response
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    cache: CachePolicy,
) -> Response<Full<Bytes>> {
    let builder = cors_builder(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, data.len())
        .header(CACHE_CONTROL, cache.to_header_value());
    finish(builder, data, "file")
}

/// Attach the body, falling back to a bare CORS response if a header value was rejected
fn finish(builder: Builder, body: Bytes, label: &str) -> Response<Full<Bytes>> {
    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error(label, &e);
        let mut fallback = Response::new(Full::new(Bytes::new()));
        *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        let headers = fallback.headers_mut();
        headers.insert(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            hyper::header::HeaderValue::from_static(CORS_ALLOW_ORIGIN),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            hyper::header::HeaderValue::from_static(CORS_ALLOW_METHODS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            hyper::header::HeaderValue::from_static(CORS_ALLOW_HEADERS),
        );
        fallback
    })
}

/// Log response build error
fn log_build_error(label: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {label} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn assert_cors(resp: &Response<Full<Bytes>>) {
        let headers = resp.headers();
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], "GET, POST, OPTIONS");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type, *");
    }

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_options_is_empty_ok() {
        let resp = build_options_response();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_cors(&resp);
        assert!(body_string(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_error_envelope() {
        let resp = build_error_response(StatusCode::BAD_REQUEST, "Invalid \"filename\"");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_cors(&resp);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
        let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Invalid \"filename\"" }));
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let resp = build_not_found_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_string(resp).await,
            r#"{"error":"API endpoint not found"}"#
        );
    }

    #[test]
    fn test_file_response_headers() {
        let resp = build_file_response(
            Bytes::from_static(b"abc"),
            "image/png",
            CachePolicy::UPSTREAM_FILE,
        );
        assert_cors(&resp);
        assert_eq!(resp.headers()[CONTENT_TYPE], "image/png");
        assert_eq!(resp.headers()[CONTENT_LENGTH], "3");
        assert_eq!(resp.headers()[CACHE_CONTROL], "public, max-age=3600");
    }

    #[test]
    fn test_invalid_content_type_falls_back_with_cors() {
        let resp = build_file_response(Bytes::new(), "bad\nvalue", CachePolicy::UPSTREAM_FILE);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&resp);
    }
}
