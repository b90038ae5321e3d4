#![doc(html_root_url = "https://docs.rs/tokenframe/latest")]
//! Public API for the `tokenframe` library.
//!
//! This crate moves opaque security-context tokens across a byte-stream
//! connection. Each token travels as one frame:
//!
//! ```text
//! zero-flag frame:     length[4 bytes BE] payload[length bytes]
//! nonzero-flag frame:  flag[1 byte] length[4 bytes BE] payload[length bytes]
//! ```
//!
//! [`TokenChannel`] writes and reads frames over any `tokio` stream,
//! tolerating short reads and writes and bounding every receive attempt with
//! a timeout.

pub mod byte_order;
pub mod channel;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod metrics;
pub mod stage;
pub mod token;
pub mod transfer;

pub use channel::TokenChannel;
pub use config::{FrameConfig, OversizePolicy};
pub use diagnostics::{Diagnostic, DiagnosticSink, NullSink, TracingSink};
pub use error::{FrameError, Result};
pub use stage::{Direction, Field, Stage};
pub use token::{Token, TokenFlags};
pub use transfer::Transfer;
