//! Utilities for exercising a [`TokenChannel`](tokenframe::TokenChannel)
//! against misbehaving transports during tests.
//!
//! [`ScriptedStream`] trickles bytes one call at a time, stalls, closes or
//! fails on demand; [`RecordingSink`] captures diagnostics; [`tcp_pair`]
//! yields a connected loopback socket pair.
//!
//! ```rust
//! use tokenframe::{Token, TokenChannel};
//! use tokenframe_testing::ScriptedStream;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let stream = ScriptedStream::builder().chunk(1).build();
//! let mut channel = TokenChannel::new(stream);
//! channel.send_token(3u8, &Token::from(&b"hi"[..])).await.unwrap();
//! assert_eq!(channel.get_ref().written(), [3, 0, 0, 0, 2, b'h', b'i']);
//! # }
//! ```

pub mod logging;
pub mod scripted;
pub mod sink;
pub mod socket;

pub use logging::{LoggerHandle, logger};
pub use scripted::{ReadEnd, ScriptedStream, ScriptedStreamBuilder, WriteEnd};
pub use sink::RecordingSink;
pub use socket::{TestResult, tcp_pair, unused_listener};

/// Encode a frame by hand, independently of the library's writer.
///
/// A zero `flags` value omits the flag byte.
#[must_use]
pub fn frame_bytes(flags: u8, payload: &[u8]) -> Vec<u8> {
    let len = u32::try_from(payload.len()).expect("test payload fits in u32");
    let mut out = Vec::with_capacity(payload.len() + 5);
    if flags != 0 {
        out.push(flags);
    }
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(payload);
    out
}
