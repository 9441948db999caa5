//! MIME type detection module
//!
//! Maps a requested filename to a Content-Type. Only used when the upstream
//! does not declare one itself.

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Resolve the Content-Type for a filename from its last extension
///
/// # Examples
/// ```
/// use hs_edge::http::mime::resolve;
/// assert_eq!(resolve("a.b.JPG"), "image/jpeg");
/// assert_eq!(resolve("clip.mp4"), "video/mp4");
/// assert_eq!(resolve("noext"), "application/octet-stream");
/// ```
pub fn resolve(filename: &str) -> &'static str {
    match filename.rsplit_once('.') {
        Some((_, ext)) => content_type_for(&ext.to_ascii_lowercase()),
        None => DEFAULT_CONTENT_TYPE,
    }
}

fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "html" | "htm" => "text/html",
        "txt" => "text/plain",
        "json" => "application/json",

        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",

        "mp4" => "video/mp4",
        "mp3" => "audio/mpeg",

        "pdf" => "application/pdf",
        "zip" => "application/zip",

        _ => DEFAULT_CONTENT_TYPE,
    }
}
