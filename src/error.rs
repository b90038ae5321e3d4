//! Error types for token framing.
//!
//! Every failure names the [`Stage`] it happened in. Transport failures keep
//! the underlying [`io::Error`] so the platform error code survives, while a
//! clean end of stream or an expired receive wait surfaces as
//! [`FrameError::ShortTransfer`] with the byte counts reached.

use std::io;

use thiserror::Error;

use crate::stage::Stage;

/// Errors returned by [`TokenChannel`](crate::TokenChannel) operations.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The transport reported a send or receive failure.
    #[error("{stage}: transport error: {source}")]
    Transport {
        /// Stage that was in progress.
        stage: Stage,
        /// Error reported by the transport.
        #[source]
        source: io::Error,
    },

    /// The connection closed or the receive wait expired mid-field.
    #[error("{stage}: {got} of {expected} bytes transferred")]
    ShortTransfer {
        /// Stage that was in progress.
        stage: Stage,
        /// Bytes moved before the transfer stopped.
        got: usize,
        /// Bytes the field required.
        expected: usize,
    },

    /// The receive buffer for a declared length could not be allocated.
    #[error("out of memory allocating {requested} bytes of token data")]
    AllocationFailure {
        /// Declared token length.
        requested: usize,
    },

    /// The token is longer than a 32-bit length field can describe.
    ///
    /// This is a programming error on the sending side and is only returned
    /// when the channel is configured with
    /// [`OversizePolicy::Error`](crate::config::OversizePolicy::Error).
    #[error("token of {len} bytes exceeds the 32-bit length field")]
    OversizedToken {
        /// Length of the rejected token.
        len: usize,
    },
}

impl FrameError {
    /// Stage the error happened in, if it is tied to a single field.
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Transport { stage, .. } | Self::ShortTransfer { stage, .. } => Some(*stage),
            Self::AllocationFailure { .. } | Self::OversizedToken { .. } => None,
        }
    }

    /// Raw platform error code of a transport failure.
    #[must_use]
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Transport { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }

    /// Returns true if the error indicates a bug rather than a runtime fault.
    #[must_use]
    pub fn is_unrecoverable(&self) -> bool { matches!(self, Self::OversizedToken { .. }) }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FrameError>;

#[cfg(test)]
mod tests {
    use std::io;

    use rstest::rstest;

    use super::FrameError;
    use crate::stage::Stage;

    #[test]
    fn short_transfer_reports_counts() {
        let err = FrameError::ShortTransfer {
            stage: Stage::RECV_LENGTH,
            got: 0,
            expected: 4,
        };
        assert_eq!(err.to_string(), "reading token length: 0 of 4 bytes transferred");
        assert_eq!(err.stage(), Some(Stage::RECV_LENGTH));
        assert!(!err.is_unrecoverable());
    }

    #[test]
    fn transport_error_keeps_os_code() {
        let err = FrameError::Transport {
            stage: Stage::SEND_DATA,
            source: io::Error::from_raw_os_error(104),
        };
        assert_eq!(err.code(), Some(104));
        assert!(err.to_string().starts_with("sending token data: transport error"));
    }

    #[rstest]
    #[case(FrameError::OversizedToken { len: usize::MAX }, true)]
    #[case(FrameError::AllocationFailure { requested: 8 }, false)]
    fn only_oversize_is_unrecoverable(#[case] err: FrameError, #[case] expected: bool) {
        assert_eq!(err.is_unrecoverable(), expected);
        assert_eq!(err.stage(), None);
        assert_eq!(err.code(), None);
    }
}
