//! URL import: `GET /hosturl?url=<media url>`

use serde_json::Value;
use url::Url;

use crate::config::AppState;
use crate::error::{ProxyError, Result};

/// Validate the `url` query parameter, have upstream import it, rewrite the reply
pub async fn import_from_url(query: Option<&str>, state: &AppState, origin: &str) -> Result<Value> {
    let media_url = media_url_param(query)?;
    let body = state.upstream.import_url(&media_url).await?;
    Ok(state.rewriter.rewrite(body, origin))
}

/// Extract and syntax-check the `url` parameter. Never touches the network.
pub fn media_url_param(query: Option<&str>) -> Result<String> {
    let media_url = query
        .and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == "url")
                .map(|(_, value)| value.into_owned())
        })
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ProxyError::input("URL parameter is required"))?;

    // Absolute URLs only: parsing without a base rejects relative input
    Url::parse(&media_url).map_err(|_| ProxyError::input("Invalid URL format"))?;

    Ok(media_url)
}
