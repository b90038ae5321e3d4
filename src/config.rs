//! Per-channel configuration.
//!
//! [`FrameConfig`] replaces the process-wide knobs of a classic token-exchange
//! helper (the verbose toggle and the fixed receive wait) with explicit values
//! carried by each [`TokenChannel`](crate::TokenChannel).

use std::time::Duration;

/// Default bound on each readiness wait before a receive attempt.
pub const DEFAULT_RECV_TIMEOUT: Duration = Duration::from_secs(10);

/// Behaviour when asked to send a token longer than `u32::MAX` bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OversizePolicy {
    /// Log the violation and abort the process.
    #[default]
    Abort,
    /// Return [`FrameError::OversizedToken`](crate::FrameError::OversizedToken).
    Error,
}

/// Tunables for a [`TokenChannel`](crate::TokenChannel).
///
/// The defaults reproduce the reference behaviour: a ten second wait before
/// every receive attempt, no bound on sends, abort on oversized tokens and no
/// verbose output.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use tokenframe::config::{FrameConfig, OversizePolicy};
///
/// let config = FrameConfig::default()
///     .with_recv_timeout(Duration::from_millis(250))
///     .with_oversize_policy(OversizePolicy::Error)
///     .with_verbose(true);
/// assert_eq!(config.recv_timeout(), Duration::from_millis(250));
/// assert!(config.verbose());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameConfig {
    recv_timeout: Duration,
    send_timeout: Option<Duration>,
    oversize_policy: OversizePolicy,
    verbose: bool,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            recv_timeout: DEFAULT_RECV_TIMEOUT,
            send_timeout: None,
            oversize_policy: OversizePolicy::Abort,
            verbose: false,
        }
    }
}

impl FrameConfig {
    /// Bound each readiness wait before a receive attempt.
    #[must_use]
    pub fn with_recv_timeout(mut self, timeout: Duration) -> Self {
        self.recv_timeout = timeout;
        self
    }

    /// Bound each send attempt. `None` lets a stuck send block indefinitely.
    #[must_use]
    pub fn with_send_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.send_timeout = timeout;
        self
    }

    /// Choose how oversized tokens are handled.
    #[must_use]
    pub fn with_oversize_policy(mut self, policy: OversizePolicy) -> Self {
        self.oversize_policy = policy;
        self
    }

    /// Log a hex dump of every token sent or received.
    ///
    /// Diagnostics for failed transfers reach the sink regardless.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Bound on each readiness wait before a receive attempt.
    #[must_use]
    pub fn recv_timeout(&self) -> Duration { self.recv_timeout }

    /// Bound on each send attempt, if any.
    #[must_use]
    pub fn send_timeout(&self) -> Option<Duration> { self.send_timeout }

    /// Handling of tokens longer than `u32::MAX` bytes.
    #[must_use]
    pub fn oversize_policy(&self) -> OversizePolicy { self.oversize_policy }

    /// Whether tokens are hex dumped.
    #[must_use]
    pub fn verbose(&self) -> bool { self.verbose }
}
