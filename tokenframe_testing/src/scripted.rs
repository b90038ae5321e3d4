//! In-memory transport with scripted misbehaviour.
//!
//! `ScriptedStream` serves a fixed input buffer, at most `chunk` bytes per
//! read or write call, and then ends the way the script says: a clean close,
//! an indefinite stall or a transport error.

use std::{
    io,
    pin::Pin,
    task::{Context, Poll},
};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

/// What a read sees once the scripted input is exhausted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReadEnd {
    /// Report end of stream.
    #[default]
    Close,
    /// Never become ready again.
    Stall,
    /// Fail with the given raw OS error code.
    Fail(i32),
}

/// How the write side behaves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WriteEnd {
    /// Accept every byte.
    #[default]
    Unlimited,
    /// Accept this many bytes, then report `Ok(0)`.
    CloseAfter(usize),
    /// Accept this many bytes, then block forever.
    StallAfter(usize),
    /// Accept this many bytes, then fail with the raw OS error code.
    FailAfter(usize, i32),
}

/// Scripted duplex transport.
#[derive(Debug)]
pub struct ScriptedStream {
    input: Vec<u8>,
    pos: usize,
    chunk: usize,
    read_end: ReadEnd,
    write_end: WriteEnd,
    written: Vec<u8>,
    read_calls: usize,
    write_calls: usize,
}

impl ScriptedStream {
    /// Start building a stream. Defaults: no input, unlimited chunk size,
    /// close on exhaustion, unlimited writes.
    #[must_use]
    pub fn builder() -> ScriptedStreamBuilder { ScriptedStreamBuilder::default() }

    /// Bytes accepted by the write side so far.
    #[must_use]
    pub fn written(&self) -> &[u8] { &self.written }

    /// Number of read calls that returned data.
    #[must_use]
    pub fn read_calls(&self) -> usize { self.read_calls }

    /// Number of write calls that accepted data.
    #[must_use]
    pub fn write_calls(&self) -> usize { self.write_calls }

    /// Input bytes not yet consumed.
    #[must_use]
    pub fn remaining_input(&self) -> &[u8] { &self.input[self.pos..] }

    fn write_allowance(&self) -> Result<usize, Poll<io::Result<usize>>> {
        let limit = match self.write_end {
            WriteEnd::Unlimited => return Ok(usize::MAX),
            WriteEnd::CloseAfter(limit)
            | WriteEnd::StallAfter(limit)
            | WriteEnd::FailAfter(limit, _) => limit,
        };
        let left = limit.saturating_sub(self.written.len());
        if left > 0 {
            return Ok(left);
        }
        Err(match self.write_end {
            WriteEnd::StallAfter(_) => Poll::Pending,
            WriteEnd::FailAfter(_, code) => Poll::Ready(Err(io::Error::from_raw_os_error(code))),
            WriteEnd::CloseAfter(_) | WriteEnd::Unlimited => Poll::Ready(Ok(0)),
        })
    }
}

impl AsyncRead for ScriptedStream {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let remaining = this.input.len() - this.pos;
        if remaining > 0 {
            let n = remaining.min(this.chunk).min(buf.remaining());
            buf.put_slice(&this.input[this.pos..this.pos + n]);
            this.pos += n;
            this.read_calls += 1;
            return Poll::Ready(Ok(()));
        }
        match this.read_end {
            ReadEnd::Close => Poll::Ready(Ok(())),
            ReadEnd::Stall => Poll::Pending,
            ReadEnd::Fail(code) => Poll::Ready(Err(io::Error::from_raw_os_error(code))),
        }
    }
}

impl AsyncWrite for ScriptedStream {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        let allowance = match this.write_allowance() {
            Ok(allowance) => allowance,
            Err(poll) => return poll,
        };
        let n = buf.len().min(this.chunk).min(allowance);
        this.written.extend_from_slice(&buf[..n]);
        this.write_calls += 1;
        Poll::Ready(Ok(n))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Builder for [`ScriptedStream`].
#[derive(Debug)]
pub struct ScriptedStreamBuilder {
    input: Vec<u8>,
    chunk: usize,
    read_end: ReadEnd,
    write_end: WriteEnd,
}

impl Default for ScriptedStreamBuilder {
    fn default() -> Self {
        Self {
            input: Vec::new(),
            chunk: usize::MAX,
            read_end: ReadEnd::Close,
            write_end: WriteEnd::Unlimited,
        }
    }
}

impl ScriptedStreamBuilder {
    /// Bytes served to readers.
    #[must_use]
    pub fn input(mut self, input: impl Into<Vec<u8>>) -> Self {
        self.input = input.into();
        self
    }

    /// Maximum bytes moved per read or write call.
    ///
    /// # Panics
    ///
    /// Panics if `chunk` is zero.
    #[must_use]
    pub fn chunk(mut self, chunk: usize) -> Self {
        assert!(chunk > 0, "chunk size must be positive");
        self.chunk = chunk;
        self
    }

    /// Behaviour once the input is exhausted.
    #[must_use]
    pub fn read_end(mut self, end: ReadEnd) -> Self {
        self.read_end = end;
        self
    }

    /// Behaviour of the write side.
    #[must_use]
    pub fn write_end(mut self, end: WriteEnd) -> Self {
        self.write_end = end;
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> ScriptedStream {
        ScriptedStream {
            input: self.input,
            pos: 0,
            chunk: self.chunk,
            read_end: self.read_end,
            write_end: self.write_end,
            written: Vec::new(),
            read_calls: 0,
            write_calls: 0,
        }
    }
}
