// Server loop module
// Accepts connections until the shutdown future resolves, then drains

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Configuration for server loop behavior
#[derive(Debug, Clone, Copy)]
pub struct ServerLoopConfig {
    /// How long to wait for open connections once shutdown starts
    pub drain_timeout: Duration,
}

/// Accept loop.
///
/// Every accepted connection runs on its own task. When `shutdown`
/// completes the listener is closed, so new connections are refused, and
/// the loop waits (at most `drain_timeout`) for open connections to finish
/// the response they are writing.
pub async fn start_server_loop<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    config: ServerLoopConfig,
    shutdown: F,
) where
    F: Future<Output = ()>,
{
    let graceful = GracefulShutdown::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &graceful);
                    }
                    Err(e) => logger::log_accept_error(&e),
                }
            }

            () = &mut shutdown => break,
        }
    }

    drop(listener);

    tokio::select! {
        () = graceful.shutdown() => logger::log_drain_complete(),
        () = tokio::time::sleep(config.drain_timeout) => {
            logger::log_drain_timeout(config.drain_timeout.as_secs());
        }
    }
}
