//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: body-size check, route matching,
//! dispatch, and the single place where delegate errors become JSON envelopes.

use crate::config::AppState;
use crate::handler::{files, hosturl, origin, ui, upload, BoxError, ConnInfo};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderName, HeaderValue, CONTENT_LENGTH, REFERER, SERVER, USER_AGENT};
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;

/// Routes this edge answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Preflight,
    Ui,
    Upload,
    ImportUrl,
    ServeFile,
    NotFound,
}

/// Match method and path to a route
///
/// OPTIONS wins over everything, the UI paths answer any other method, and every
/// other GET is treated as a file name.
pub fn match_route(method: &Method, path: &str) -> Route {
    if *method == Method::OPTIONS {
        return Route::Preflight;
    }
    if path == "/" || path == "/index.html" {
        return Route::Ui;
    }
    match (method, path) {
        (&Method::POST, "/upload") => Route::Upload,
        (&Method::GET, "/hosturl") => Route::ImportUrl,
        (&Method::GET, _) => Route::ServeFile,
        _ => Route::NotFound,
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    conn: ConnInfo,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes> + Send + Unpin + 'static,
    B::Error: Into<BoxError> + 'static,
{
    let started = Instant::now();
    let access_entry = state
        .config
        .logging
        .access_log
        .then(|| access_entry_for(&req, &conn));

    let rejected = check_body_size(&req, state.config.http.max_body_size);
    let mut response = match rejected {
        Some(resp) => resp,
        None => route_request(req, &state, conn).await,
    };

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if let Some(mut entry) = access_entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get(CONTENT_LENGTH)?;
    let Ok(size_str) = content_length.to_str() else {
        logger::log_warning("Content-Length header contains non-ASCII characters");
        return None;
    };
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_warning(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(http::build_413_response())
        }
        Ok(_) => None,
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            None
        }
    }
}

/// Dispatch to the matched route; every failure ends here as an error envelope
async fn route_request<B>(req: Request<B>, state: &AppState, conn: ConnInfo) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes> + Send + Unpin + 'static,
    B::Error: Into<BoxError> + 'static,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let result = match match_route(&method, &path) {
        Route::Preflight => Ok(http::build_options_response()),
        Route::Ui => Ok(http::build_html_response(ui::UPLOAD_PAGE)),
        Route::Upload => {
            let origin = origin::public_origin(&req, &state.config.proxy, conn.local_addr);
            upload::upload_file(req, state, &origin)
                .await
                .map(|body| http::build_json_response(StatusCode::OK, &body))
        }
        Route::ImportUrl => {
            let origin = origin::public_origin(&req, &state.config.proxy, conn.local_addr);
            hosturl::import_from_url(req.uri().query(), state, &origin)
                .await
                .map(|body| http::build_json_response(StatusCode::OK, &body))
        }
        Route::ServeFile => {
            let target = req
                .uri()
                .path_and_query()
                .map_or_else(|| path.clone(), ToString::to_string);
            files::serve_file(&target, state).await
        }
        Route::NotFound => Ok(http::build_not_found_response()),
    };

    result.unwrap_or_else(|err| {
        let status = err.status();
        let message = err.to_string();
        logger::log_request_failure(method.as_str(), &path, status.as_u16(), &message);
        http::build_error_response(status, &message)
    })
}

fn access_entry_for<B>(req: &Request<B>, conn: &ConnInfo) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        conn.peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry
}
