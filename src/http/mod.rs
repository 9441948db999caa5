//! HTTP protocol layer module
//!
//! Response builders, CORS headers, cache policy and MIME lookup shared by every route.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use cache::CachePolicy;
pub use response::{
    build_413_response, build_error_response, build_file_response, build_html_response,
    build_json_response, build_not_found_response, build_options_response,
};
