//! Loopback socket helpers.

use std::{
    io,
    net::{Ipv4Addr, SocketAddr, TcpListener as StdTcpListener},
};

use tokio::net::{TcpListener, TcpStream};

/// Result type for fallible tests.
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Create a TCP listener bound to a free local port.
///
/// # Errors
///
/// Returns any IO error encountered while binding to an ephemeral localhost
/// port.
pub fn unused_listener() -> io::Result<StdTcpListener> {
    let addr = SocketAddr::new(Ipv4Addr::LOCALHOST.into(), 0);
    StdTcpListener::bind(addr)
}

/// Connect a client socket to a freshly accepted server socket on loopback.
///
/// Returns `(client, server)`.
///
/// # Errors
///
/// Returns any IO error raised while binding, connecting or accepting.
pub async fn tcp_pair() -> io::Result<(TcpStream, TcpStream)> {
    let listener = unused_listener()?;
    listener.set_nonblocking(true)?;
    let listener = TcpListener::from_std(listener)?;
    let addr = listener.local_addr()?;
    let (client, accepted) = tokio::join!(TcpStream::connect(addr), listener.accept());
    let (server, _) = accepted?;
    Ok((client?, server))
}
