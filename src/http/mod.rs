//! HTTP protocol layer module
//!
//! Protocol helpers shared by the asset resolver and the JSON API, decoupled
//! from routing.

pub mod cache;
pub mod cors;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used items
pub use cors::{allowed_origin, apply_cors_headers};
pub use range::parse_range_header;
pub use response::{
    build_304_response, build_405_response, build_413_response, build_416_response,
    build_options_response, build_text_response,
};
