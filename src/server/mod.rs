// Server module entry point
// Listener setup, connection serving and shutdown on signal

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as server_loop
#[path = "loop.rs"]
pub mod server_loop;

use std::sync::Arc;
use std::time::Duration;

use crate::config::{AppState, Config};
use crate::error::ServeError;
use crate::logger;

// Re-export commonly used types
pub use listener::create_listener;
pub use server_loop::{start_server_loop, ServerLoopConfig};
pub use signal::ShutdownSignal;

/// Serve `config.root` until SIGINT/SIGTERM.
///
/// Prints the startup banner once the port is bound and the shutdown notice
/// after open connections have drained.
pub async fn run(config: &Config) -> Result<(), ServeError> {
    let state = AppState::new(config)?;
    let addr = config.get_socket_addr()?;

    // Install handlers before binding so an early Ctrl+C is never fatal
    let signal = ShutdownSignal::register()?;
    let listener = create_listener(addr)?;
    let local_addr = listener.local_addr()?;

    logger::log_server_start(&local_addr, &state.root, config);
    println!("Server running at http://localhost:{}/", local_addr.port());
    println!("Press Ctrl+C to stop the server");

    let loop_config = ServerLoopConfig {
        drain_timeout: Duration::from_secs(config.shutdown.drain_timeout_secs),
    };
    start_server_loop(listener, Arc::new(state), loop_config, async move {
        let name = signal.recv().await;
        logger::log_shutdown_requested(name);
    })
    .await;

    println!("\nServer stopped.");
    Ok(())
}
