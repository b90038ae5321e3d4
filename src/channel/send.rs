//! Frame writer.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::Instrument;

use super::{
    TokenChannel,
    tracing_helpers::{record_result, send_span},
};
use crate::{
    byte_order::encode_length,
    config::OversizePolicy,
    error::{FrameError, Result},
    metrics,
    stage::{Direction, Stage},
    token::{Token, TokenFlags},
    transfer::{Transfer, write_all},
};

/// Validate that a token length fits the 32-bit length field.
///
/// Under [`OversizePolicy::Abort`] an oversized length terminates the
/// process; it is never truncated.
pub(super) fn checked_length(len: usize, policy: OversizePolicy) -> Result<u32> {
    match u32::try_from(len) {
        Ok(len) => Ok(len),
        Err(_) => match policy {
            OversizePolicy::Abort => {
                tracing::error!(len, "token exceeds the 32-bit length field; aborting");
                std::process::abort()
            }
            OversizePolicy::Error => Err(FrameError::OversizedToken { len }),
        },
    }
}

impl<T> TokenChannel<T>
where
    T: AsyncWrite + Unpin,
{
    /// Send `token` preceded by `flags`.
    ///
    /// A zero flag is omitted from the wire entirely, so the frame starts with
    /// the length field. The flag, length and payload are each written in
    /// full; a short write at any stage fails the frame without retrying
    /// earlier stages, and the transport is left as is.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Transport`] if the transport fails,
    /// [`FrameError::ShortTransfer`] if the peer stops accepting bytes, or
    /// [`FrameError::OversizedToken`] under [`OversizePolicy::Error`].
    ///
    /// # Panics
    ///
    /// Does not panic, but aborts the process when the token exceeds
    /// `u32::MAX` bytes under the default [`OversizePolicy::Abort`].
    pub async fn send_token(&mut self, flags: impl Into<TokenFlags>, token: &Token) -> Result<()> {
        let flags = flags.into();
        let span = send_span(flags, token.len());
        let result = self.write_frame(flags, token).instrument(span.clone()).await;
        record_result(&span, &result);
        match &result {
            Ok(()) => metrics::inc_tokens(Direction::Outbound, token.len()),
            Err(FrameError::OversizedToken { .. }) => {
                metrics::inc_errors(Direction::Outbound, None);
            }
            Err(_) => {}
        }
        result
    }

    async fn write_frame(&mut self, flags: TokenFlags, token: &Token) -> Result<()> {
        let len = checked_length(token.len(), self.config.oversize_policy())?;
        let limit = self.config.send_timeout();

        if !flags.is_none() {
            let outcome = write_all(&mut self.transport, &[flags.bits()], limit).await;
            if !outcome.is_complete() {
                return Err(self.fail(Stage::SEND_FLAGS, outcome, 1));
            }
        }

        let lenbuf = encode_length(len);
        let outcome = write_all(&mut self.transport, &lenbuf, limit).await;
        if !outcome.is_complete() {
            return Err(self.fail(Stage::SEND_LENGTH, outcome, lenbuf.len()));
        }

        let outcome = write_all(&mut self.transport, token.as_bytes(), limit).await;
        if !outcome.is_complete() {
            return Err(self.fail(Stage::SEND_DATA, outcome, token.len()));
        }

        if let Err(source) = self.transport.flush().await {
            return Err(self.fail(Stage::SEND_DATA, Transfer::Failed(source), token.len()));
        }

        if self.config.verbose() {
            tracing::debug!(flags = %flags, len, "sent token\n{}", token.hex_dump());
        }
        Ok(())
    }
}
