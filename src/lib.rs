//! Local static file server that disables client-side caching.
//!
//! Every response carries `Cache-Control: no-cache, no-store, must-revalidate`,
//! `Pragma: no-cache` and `Expires: 0`, so front-end assets are always
//! fetched fresh while developing.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use crate::config::{AppState, Config};
pub use crate::error::ServeError;
