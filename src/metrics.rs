//! Metric helpers for `tokenframe`.
//!
//! This module defines metric names and thin wrappers around the
//! [`metrics`](https://docs.rs/metrics) crate. Without the `metrics` feature
//! the helpers compile to no-ops.

use crate::stage::{Direction, Stage};

/// Name of the counter tracking framed tokens.
pub const TOKENS_TOTAL: &str = "tokenframe_tokens_total";
/// Name of the counter tracking payload bytes carried by tokens.
pub const TOKEN_BYTES_TOTAL: &str = "tokenframe_token_bytes_total";
/// Name of the counter tracking failed frame operations.
pub const ERRORS_TOTAL: &str = "tokenframe_errors_total";

/// Record a token that was fully sent or received.
#[cfg(feature = "metrics")]
pub fn inc_tokens(direction: Direction, payload_len: usize) {
    metrics::counter!(TOKENS_TOTAL, "direction" => direction.as_str()).increment(1);
    metrics::counter!(TOKEN_BYTES_TOTAL, "direction" => direction.as_str())
        .increment(u64::try_from(payload_len).unwrap_or(u64::MAX));
}

#[cfg(not(feature = "metrics"))]
pub fn inc_tokens(_direction: Direction, _payload_len: usize) {}

/// Record a failed frame operation, labelled by the stage when known.
#[cfg(feature = "metrics")]
pub fn inc_errors(direction: Direction, stage: Option<Stage>) {
    let field = stage.map_or("token", |stage| stage.field.as_str());
    metrics::counter!(
        ERRORS_TOTAL,
        "direction" => direction.as_str(),
        "field" => field
    )
    .increment(1);
}

#[cfg(not(feature = "metrics"))]
pub fn inc_errors(_direction: Direction, _stage: Option<Stage>) {}
