//! HTTP protocol layer module
//!
//! Protocol-level helpers shared by the file handler and the server:
//! content types, HTTP dates, response builders and the no-cache decorator.

pub mod date;
pub mod mime;
pub mod no_cache;
pub mod response;

// Re-export commonly used items
pub use no_cache::{apply_no_cache_headers, NoCache};
pub use response::{
    build_304_response, build_error_response, build_file_response, build_html_response,
    build_redirect_response,
};
