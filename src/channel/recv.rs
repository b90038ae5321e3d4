//! Frame reader.

use tokio::io::AsyncRead;
use tracing::Instrument;

use super::{
    TokenChannel,
    tracing_helpers::{record_result, recv_span},
};
use crate::{
    byte_order::{LENGTH_FIELD_LEN, decode_length},
    diagnostics::Diagnostic,
    error::{FrameError, Result},
    metrics,
    stage::{Direction, Stage},
    token::{Token, TokenFlags},
    transfer::{read_all, read_to_vec},
};

/// Reserve room for `len` payload bytes without touching it.
///
/// At least one byte is reserved so an empty token still owns an allocation.
/// The buffer starts empty and only grows as payload bytes are read into it.
pub(super) fn allocate(len: usize) -> Option<Vec<u8>> {
    let mut value = Vec::new();
    value.try_reserve_exact(len.max(1)).ok()?;
    Some(value)
}

impl<T> TokenChannel<T>
where
    T: AsyncRead + Unpin,
{
    /// Receive one frame and return its flags and token.
    ///
    /// The first byte decides the frame layout. A non-zero byte is the flag
    /// and a full four-byte length follows. A zero byte is taken as the
    /// high-order byte of the length itself, so only three more length bytes
    /// are read. A sender that transmits a zero flag byte is therefore
    /// indistinguishable from one that sends no flag at all; both arrive as
    /// [`TokenFlags::NONE`].
    ///
    /// Every read attempt waits at most
    /// [`FrameConfig::recv_timeout`](crate::config::FrameConfig::recv_timeout)
    /// for data.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ShortTransfer`] if the peer closes or falls
    /// silent mid-frame (including before the first byte),
    /// [`FrameError::Transport`] if the transport fails, or
    /// [`FrameError::AllocationFailure`] if the declared length cannot be
    /// allocated.
    pub async fn recv_token(&mut self) -> Result<(TokenFlags, Token)> {
        let span = recv_span();
        let result = self.read_frame().instrument(span.clone()).await;
        record_result(&span, &result);
        if let Ok((flags, token)) = &result {
            span.record("flags", tracing::field::display(flags));
            span.record("token.bytes", token.len());
            metrics::inc_tokens(Direction::Inbound, token.len());
        }
        result
    }

    async fn read_frame(&mut self) -> Result<(TokenFlags, Token)> {
        let wait = self.config.recv_timeout();

        let mut first = [0u8; 1];
        let outcome = read_all(&mut self.transport, &mut first, wait).await;
        if !outcome.is_complete() {
            return Err(self.fail(Stage::RECV_FLAGS, outcome, 1));
        }
        let flags = TokenFlags::new(first[0]);

        // A zero first byte doubles as the high-order length byte.
        let mut lenbuf = [0u8; LENGTH_FIELD_LEN];
        let field = if flags.is_none() {
            &mut lenbuf[1..]
        } else {
            &mut lenbuf[..]
        };
        let expected = field.len();
        let outcome = read_all(&mut self.transport, field, wait).await;
        if !outcome.is_complete() {
            return Err(self.fail(Stage::RECV_LENGTH, outcome, expected));
        }

        let declared = decode_length(lenbuf);
        let len = usize::try_from(declared).unwrap_or(usize::MAX);
        let Some(mut value) = allocate(len) else {
            self.sink
                .report(&Diagnostic::AllocationFailure { requested: len });
            metrics::inc_errors(Direction::Inbound, None);
            return Err(FrameError::AllocationFailure { requested: len });
        };

        let outcome = read_to_vec(&mut self.transport, &mut value, len, wait).await;
        if !outcome.is_complete() {
            drop(value);
            return Err(self.fail(Stage::RECV_DATA, outcome, len));
        }

        let token = Token::new(value);
        if self.config.verbose() {
            tracing::debug!(flags = %flags, len, "received token\n{}", token.hex_dump());
        }
        Ok((flags, token))
    }
}
