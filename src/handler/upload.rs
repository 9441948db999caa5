//! Direct upload: `POST /upload`
//!
//! Reads the `file` field of a multipart body, enforces the size ceiling and
//! forwards the bytes upstream under their original filename.

use http_body_util::BodyExt;
use hyper::body::{Body, Bytes};
use hyper::header::CONTENT_TYPE;
use hyper::Request;
use serde_json::Value;

use super::BoxError;
use crate::config::AppState;
use crate::error::{ProxyError, Result};

const FILE_FIELD: &str = "file";
/// Name browsers give a file part that carries none
const DEFAULT_FILENAME: &str = "blob";

/// File part pulled out of an inbound multipart body
#[derive(Debug)]
pub struct ReceivedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Upload the request's `file` field and return the rewritten upstream reply
pub async fn upload_file<B>(req: Request<B>, state: &AppState, origin: &str) -> Result<Value>
where
    B: Body<Data = Bytes> + Send + Unpin + 'static,
    B::Error: Into<BoxError> + 'static,
{
    let file = read_file_field(req, state.config.upstream.max_upload_bytes).await?;
    let body = state.upstream.upload(file.filename, file.data).await?;
    Ok(state.rewriter.rewrite(body, origin))
}

/// Read the first `file` field, failing once it grows past `max_bytes`
///
/// A body that is not multipart at all has no file either.
pub async fn read_file_field<B>(req: Request<B>, max_bytes: u64) -> Result<ReceivedFile>
where
    B: Body<Data = Bytes> + Send + Unpin + 'static,
    B::Error: Into<BoxError> + 'static,
{
    let boundary = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| ProxyError::input("No file provided"))?;

    let limit = usize::try_from(max_bytes).unwrap_or(usize::MAX);
    let mut multipart = multer::Multipart::new(req.into_body().into_data_stream(), boundary);

    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            while field.chunk().await?.is_some() {}
            continue;
        }

        let filename = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_FILENAME)
            .to_string();

        let mut data = Vec::new();
        while let Some(chunk) = field.chunk().await? {
            if data.len() + chunk.len() > limit {
                tracing::debug!(filename = %filename, limit, "Upload rejected by size ceiling");
                return Err(ProxyError::size_limit(max_bytes));
            }
            data.extend_from_slice(&chunk);
        }

        return Ok(ReceivedFile { filename, data });
    }

    Err(ProxyError::input("No file provided"))
}
