// Connection handling module
// Serves a single accepted TCP connection on its own task

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use hyper::body::{Body, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Uri};
use hyper_util::rt::TokioIo;
use hyper_util::server::graceful::GracefulShutdown;

use crate::config::AppState;
use crate::handler;
use crate::http::NoCache;
use crate::logger::{self, AccessLogEntry};

/// Spawn a task serving `stream` over HTTP/1.
///
/// The connection is registered with `graceful` so shutdown can wait for
/// the response it is currently writing.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    graceful: &GracefulShutdown,
) {
    let state = Arc::clone(state);
    let io = TokioIo::new(stream);

    let service = service_fn(move |req: Request<Incoming>| {
        let state = Arc::clone(&state);
        async move {
            let entry = state.access_log.then(|| {
                let mut entry = AccessLogEntry::new(
                    peer_addr,
                    req.method().to_string(),
                    request_target(req.uri()),
                );
                entry.http_version = logger::version_token(req.version());
                entry
            });

            let resp = handler::handle_request(req, state).await?;

            if let Some(mut entry) = entry {
                entry.status = resp.status().as_u16();
                entry.body_bytes = resp.body().size_hint().exact();
                logger::log_access(&entry);
            }
            Ok::<_, Infallible>(resp)
        }
    });

    let conn = http1::Builder::new()
        .keep_alive(true)
        .serve_connection(io, NoCache::new(service));
    let conn = graceful.watch(conn);

    tokio::spawn(async move {
        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
    });
}

/// Path plus query, as it appeared in the request line
fn request_target(uri: &Uri) -> String {
    uri.path_and_query()
        .map_or_else(|| uri.to_string(), ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_target() {
        let uri: Uri = "/search?q=rust".parse().unwrap();
        assert_eq!(request_target(&uri), "/search?q=rust");
        let uri: Uri = "/".parse().unwrap();
        assert_eq!(request_target(&uri), "/");
    }
}
