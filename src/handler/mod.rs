//! Request handler module
//!
//! Routing dispatch plus the three proxied operations (upload, URL import,
//! file serving) and the embedded upload page.

pub mod files;
pub mod hosturl;
pub mod origin;
pub mod router;
pub mod ui;
pub mod upload;

use std::net::SocketAddr;

// Re-export main entry point
pub use router::handle_request;

/// Addresses of the connection a request arrived on
#[derive(Debug, Clone, Copy)]
pub struct ConnInfo {
    pub peer_addr: SocketAddr,
    pub local_addr: SocketAddr,
}

/// Error type a request body may yield; matches what `multer` accepts
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
