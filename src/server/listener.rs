// Listener module
// Creates the TCP listener through socket2 so socket options are explicit

use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::error::ServeError;

const BACKLOG: i32 = 128;

/// Bind a `TcpListener` on `addr`.
///
/// Only `SO_REUSEADDR` is set (on Unix, so a restart can reuse a port stuck
/// in `TIME_WAIT`). `SO_REUSEPORT` stays off: a second instance on the same
/// port must fail with [`ServeError::Bind`].
///
/// Must be called from within a tokio runtime.
pub fn create_listener(addr: SocketAddr) -> Result<TcpListener, ServeError> {
    bind_socket(addr).map_err(|source| ServeError::Bind { addr, source })
}

fn bind_socket(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    #[cfg(unix)]
    socket.set_reuse_address(true)?;

    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(BACKLOG)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
