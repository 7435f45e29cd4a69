//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, then the
//! static file handler.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{IF_MODIFIED_SINCE, IF_NONE_MATCH};
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) URI path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<&'a str>,
    pub has_if_none_match: bool,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, _) = req.into_parts();
    let is_head = parts.method == Method::HEAD;

    if let Some(resp) = check_http_method(&parts.method) {
        return Ok(resp);
    }

    let ctx = RequestContext {
        path: parts.uri.path(),
        query: parts.uri.query(),
        is_head,
        if_modified_since: parts
            .headers
            .get(IF_MODIFIED_SINCE)
            .and_then(|v| v.to_str().ok()),
        has_if_none_match: parts.headers.contains_key(IF_NONE_MATCH),
    };

    Ok(static_files::serve_path(&ctx, &state).await)
}

/// Only GET and HEAD are served; anything else is 501
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        _ => {
            logger::log_warning(&format!("Unsupported method: {method}"));
            Some(http::build_error_response(
                StatusCode::NOT_IMPLEMENTED,
                Some(&format!("Unsupported method ('{method}')")),
                false,
            ))
        }
    }
}
