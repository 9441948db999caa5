//! hs-edge: an edge handler in front of the HS Hosting file API
//!
//! Serves the upload page, proxies uploads, URL imports and file downloads to the
//! upstream hosting service, and rewrites the upstream origin in JSON replies to the
//! origin the client actually used. Every response carries permissive CORS headers.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod rewrite;
pub mod server;
pub mod upstream;
