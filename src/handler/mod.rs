//! Request handler module
//!
//! Routes each request to a fixed-payload API endpoint or to the static
//! asset / SPA fallback resolver.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
