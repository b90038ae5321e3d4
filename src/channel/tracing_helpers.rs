//! Span helpers for token channel operations.

use tracing::Span;

use crate::token::TokenFlags;

/// Create a span for the `send_token` operation.
pub(super) fn send_span(flags: TokenFlags, token_bytes: usize) -> Span {
    tracing::debug_span!(
        "token.send",
        flags = %flags,
        token.bytes = token_bytes,
        result = tracing::field::Empty
    )
}

/// Create a span for the `recv_token` operation.
///
/// `flags`, `token.bytes` and `result` are recorded as the frame arrives.
pub(super) fn recv_span() -> Span {
    tracing::debug_span!(
        "token.recv",
        flags = tracing::field::Empty,
        token.bytes = tracing::field::Empty,
        result = tracing::field::Empty
    )
}

/// Record the outcome of an operation on its span.
pub(super) fn record_result<T, E>(span: &Span, result: &Result<T, E>) {
    span.record("result", if result.is_ok() { "ok" } else { "err" });
}
