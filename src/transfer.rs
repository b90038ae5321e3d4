//! Retry-until-complete transfer loops shared by every frame field.
//!
//! Every loop keeps calling the transport until the requested bytes have
//! moved, the peer closes the stream, the transport fails or (for reads) a
//! readiness wait expires. The flag byte and the length field use the slice
//! loops; received payloads go through [`read_to_vec`], which fills spare
//! capacity as data arrives.

use std::{io, time::Duration};

use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    time::timeout,
};

/// Outcome of a single transfer loop.
#[derive(Debug)]
pub enum Transfer {
    /// Every requested byte moved.
    Complete(usize),
    /// A wait expired after the given number of bytes.
    Partial(usize),
    /// The peer closed the stream after the given number of bytes.
    Closed(usize),
    /// The transport reported an error.
    Failed(io::Error),
}

impl Transfer {
    /// Bytes moved before the loop stopped. Failures report zero.
    #[must_use]
    pub fn moved(&self) -> usize {
        match self {
            Self::Complete(n) | Self::Partial(n) | Self::Closed(n) => *n,
            Self::Failed(_) => 0,
        }
    }

    /// Returns true if every requested byte moved.
    #[must_use]
    pub fn is_complete(&self) -> bool { matches!(self, Self::Complete(_)) }
}

/// Read exactly `buf.len()` bytes, waiting at most `wait` before each attempt.
///
/// An expired wait is not an error: the loop stops and reports the bytes read
/// so far as [`Transfer::Partial`].
///
/// ```
/// use std::time::Duration;
///
/// use tokenframe::transfer::{Transfer, read_all};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut src: &[u8] = b"abc";
/// let mut buf = [0u8; 5];
/// let outcome = read_all(&mut src, &mut buf, Duration::from_secs(1)).await;
/// assert!(matches!(outcome, Transfer::Closed(3)));
/// # }
/// ```
pub async fn read_all<R>(reader: &mut R, buf: &mut [u8], wait: Duration) -> Transfer
where
    R: AsyncRead + Unpin,
{
    let wanted = buf.len();
    let mut read = 0;
    while read < wanted {
        match timeout(wait, reader.read(&mut buf[read..])).await {
            Err(_elapsed) => return Transfer::Partial(read),
            Ok(Ok(0)) => return Transfer::Closed(read),
            Ok(Ok(n)) => read += n,
            Ok(Err(e)) if e.kind() == io::ErrorKind::Interrupted => {}
            Ok(Err(e)) => return Transfer::Failed(e),
        }
    }
    Transfer::Complete(read)
}

/// Append exactly `len` bytes to `buf`, waiting at most `wait` before each
/// attempt.
///
/// Bytes land in the vector's spare capacity as they arrive, so a large
/// reservation costs nothing until the peer actually sends data. Outcomes
/// match [`read_all`]; on anything but [`Transfer::Complete`] the vector holds
/// just the bytes received.
///
/// ```
/// use std::time::Duration;
///
/// use tokenframe::transfer::{Transfer, read_to_vec};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut src: &[u8] = b"abcdef";
/// let mut buf = Vec::with_capacity(4);
/// let outcome = read_to_vec(&mut src, &mut buf, 4, Duration::from_secs(1)).await;
/// assert!(matches!(outcome, Transfer::Complete(4)));
/// assert_eq!(buf, b"abcd");
/// # }
/// ```
pub async fn read_to_vec<R>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    len: usize,
    wait: Duration,
) -> Transfer
where
    R: AsyncRead + Unpin,
{
    let mut read = 0;
    while read < len {
        let limit = u64::try_from(len - read).unwrap_or(u64::MAX);
        let mut limited = (&mut *reader).take(limit);
        match timeout(wait, limited.read_buf(buf)).await {
            Err(_elapsed) => return Transfer::Partial(read),
            Ok(Ok(0)) => return Transfer::Closed(read),
            Ok(Ok(n)) => read += n,
            Ok(Err(e)) if e.kind() == io::ErrorKind::Interrupted => {}
            Ok(Err(e)) => return Transfer::Failed(e),
        }
    }
    Transfer::Complete(read)
}

/// Write all of `buf`, optionally bounding each attempt by `limit`.
///
/// Without a limit a stalled peer blocks the caller until the transport
/// itself gives up.
pub async fn write_all<W>(writer: &mut W, buf: &[u8], limit: Option<Duration>) -> Transfer
where
    W: AsyncWrite + Unpin,
{
    let wanted = buf.len();
    let mut written = 0;
    while written < wanted {
        let attempt = writer.write(&buf[written..]);
        let result = match limit {
            Some(limit) => match timeout(limit, attempt).await {
                Ok(result) => result,
                Err(_elapsed) => return Transfer::Partial(written),
            },
            None => attempt.await,
        };
        match result {
            Ok(0) => return Transfer::Closed(written),
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Transfer::Failed(e),
        }
    }
    Transfer::Complete(written)
}
