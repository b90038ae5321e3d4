//! Per-connection token framing.
//!
//! [`TokenChannel`] wraps one byte-stream transport and carries everything a
//! frame operation needs: the [`FrameConfig`], the [`DiagnosticSink`] and the
//! code of the most recent transport failure. One channel handles one frame
//! at a time; `&mut self` on every operation rules out overlapping sends or
//! receives on the same transport.

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, ReadHalf, WriteHalf, split};

use crate::{
    config::FrameConfig,
    diagnostics::{Diagnostic, DiagnosticSink, TracingSink},
    error::FrameError,
    metrics,
    stage::Stage,
    transfer::Transfer,
};

mod recv;
mod send;
mod tracing_helpers;

/// A transport paired with its framing state.
///
/// `send_token` needs only [`AsyncWrite`] and `recv_token` only
/// [`AsyncRead`], so the halves produced by [`TokenChannel::split`] can be
/// driven from separate tasks.
///
/// # Examples
///
/// ```
/// use tokenframe::{Token, TokenChannel, TokenFlags};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), tokenframe::FrameError> {
/// let (client, server) = tokio::io::duplex(64);
/// let mut client = TokenChannel::new(client);
/// let mut server = TokenChannel::new(server);
///
/// client.send_token(TokenFlags::new(2), &Token::from(&b"hello"[..])).await?;
/// let (flags, token) = server.recv_token().await?;
/// assert_eq!(flags, TokenFlags::new(2));
/// assert_eq!(token.as_bytes(), b"hello");
/// token.release();
/// # Ok(())
/// # }
/// ```
pub struct TokenChannel<T> {
    transport: T,
    config: FrameConfig,
    sink: Arc<dyn DiagnosticSink>,
    last_error: Option<i32>,
}

impl<T> TokenChannel<T> {
    /// Wrap `transport` with the default configuration and a tracing sink.
    pub fn new(transport: T) -> Self { Self::with_config(transport, FrameConfig::default()) }

    /// Wrap `transport` with `config` and a tracing sink.
    pub fn with_config(transport: T, config: FrameConfig) -> Self {
        Self {
            transport,
            config,
            sink: Arc::new(TracingSink),
            last_error: None,
        }
    }

    /// Replace the diagnostic sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Configuration in effect for this channel.
    pub fn config(&self) -> &FrameConfig { &self.config }

    /// Raw platform code of the most recent transport failure.
    ///
    /// The code persists across later successful operations, mirroring a
    /// socket's last-error slot, until [`TokenChannel::clear_last_error`].
    pub fn last_error(&self) -> Option<i32> { self.last_error }

    /// Forget the recorded transport failure.
    pub fn clear_last_error(&mut self) { self.last_error = None; }

    /// Borrow the transport.
    pub fn get_ref(&self) -> &T { &self.transport }

    /// Mutably borrow the transport.
    ///
    /// Reading or writing through this reference mid-frame corrupts the
    /// stream for the peer.
    pub fn get_mut(&mut self) -> &mut T { &mut self.transport }

    /// Unwrap the transport.
    pub fn into_inner(self) -> T { self.transport }

    /// Convert a failed transfer into an error, reporting it on the way.
    fn fail(&mut self, stage: Stage, outcome: Transfer, expected: usize) -> FrameError {
        let error = match outcome {
            Transfer::Failed(source) => {
                self.last_error = source.raw_os_error();
                self.sink.report(&Diagnostic::TransportError {
                    stage,
                    code: self.last_error,
                    message: source.to_string(),
                });
                FrameError::Transport { stage, source }
            }
            Transfer::Complete(got) | Transfer::Partial(got) | Transfer::Closed(got) => {
                self.sink.report(&Diagnostic::ShortTransfer {
                    stage,
                    done: got,
                    expected,
                });
                FrameError::ShortTransfer {
                    stage,
                    got,
                    expected,
                }
            }
        };
        metrics::inc_errors(stage.direction, Some(stage));
        error
    }
}

impl<T> TokenChannel<T>
where
    T: AsyncRead + AsyncWrite,
{
    /// Split a duplex transport into a receiving and a sending channel.
    ///
    /// Both halves share this channel's configuration and sink. One send and
    /// one receive may then run concurrently.
    pub fn split(self) -> (TokenChannel<ReadHalf<T>>, TokenChannel<WriteHalf<T>>) {
        let (reader, writer) = split(self.transport);
        let recv = TokenChannel {
            transport: reader,
            config: self.config,
            sink: Arc::clone(&self.sink),
            last_error: self.last_error,
        };
        let send = TokenChannel {
            transport: writer,
            config: self.config,
            sink: self.sink,
            last_error: self.last_error,
        };
        (recv, send)
    }
}
