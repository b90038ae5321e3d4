//! Owned token buffers and the flag byte that accompanies them.
//!
//! A [`Token`] owns its storage outright. Releasing it consumes the value, so
//! a released token can be neither read nor released a second time.

use std::fmt::{self, Write as _};

use bytes::Bytes;

use crate::byte_order::truncate_flag;

/// Protocol-control byte sent ahead of a token.
///
/// The framer treats the bits as opaque. A value of zero is never written to
/// the wire, so the receiving side cannot tell a zero flag from no flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TokenFlags(u8);

impl TokenFlags {
    /// No flag byte; the frame starts with the length field.
    pub const NONE: TokenFlags = TokenFlags(0);

    /// Wrap a raw flag byte.
    #[must_use]
    pub const fn new(bits: u8) -> Self { Self(bits) }

    /// Build flags from an integer, keeping only its low eight bits.
    ///
    /// ```
    /// use tokenframe::TokenFlags;
    ///
    /// assert_eq!(TokenFlags::truncate(0x1_02).bits(), 0x02);
    /// ```
    #[must_use]
    pub const fn truncate(flags: u32) -> Self { Self(truncate_flag(flags)) }

    /// Raw flag byte.
    #[must_use]
    pub const fn bits(self) -> u8 { self.0 }

    /// Returns true when no flag byte will be put on the wire.
    #[must_use]
    pub const fn is_none(self) -> bool { self.0 == 0 }
}

impl From<u8> for TokenFlags {
    fn from(bits: u8) -> Self { Self(bits) }
}

impl From<TokenFlags> for u8 {
    fn from(flags: TokenFlags) -> Self { flags.0 }
}

impl fmt::Display for TokenFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{:#04x}", self.0) }
}

/// An opaque security token.
///
/// Tokens are produced by the caller before sending or allocated by
/// [`TokenChannel::recv_token`](crate::TokenChannel::recv_token). Either way
/// the holder owns the buffer until [`Token::release`] or drop.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Token {
    value: Vec<u8>,
}

impl Token {
    /// Wrap an owned buffer.
    #[must_use]
    pub fn new(value: Vec<u8>) -> Self { Self { value } }

    /// A zero-length token.
    #[must_use]
    pub fn empty() -> Self { Self::default() }

    /// Number of payload bytes.
    #[must_use]
    pub fn len(&self) -> usize { self.value.len() }

    /// Returns true if the token carries no payload.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.value.is_empty() }

    /// Borrow the payload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] { &self.value }

    /// Take the payload as an owned vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> { self.value }

    /// Take the payload as shared [`Bytes`].
    #[must_use]
    pub fn into_bytes(self) -> Bytes { Bytes::from(self.value) }

    /// Release the token's storage.
    ///
    /// The token is consumed; the compiler rejects any later use.
    ///
    /// ```compile_fail
    /// use tokenframe::Token;
    ///
    /// let token = Token::from(&b"abc"[..]);
    /// token.release();
    /// token.release();
    /// ```
    pub fn release(self) { drop(self); }

    /// Render the payload as hex, sixteen bytes per line.
    ///
    /// ```
    /// use tokenframe::Token;
    ///
    /// let token = Token::from(&[0x00, 0xab, 0x10][..]);
    /// assert_eq!(token.hex_dump(), "00 ab 10 \n");
    /// ```
    #[must_use]
    pub fn hex_dump(&self) -> String {
        let mut out = String::with_capacity(self.value.len() * 3 + self.value.len() / 16 + 1);
        for (i, byte) in self.value.iter().enumerate() {
            let _ = write!(out, "{byte:02x} ");
            if i % 16 == 15 {
                out.push('\n');
            }
        }
        if self.value.len() % 16 != 0 || self.value.is_empty() {
            out.push('\n');
        }
        out
    }

    /// Capacity of the backing allocation.
    pub(crate) fn capacity(&self) -> usize { self.value.capacity() }
}

impl From<Vec<u8>> for Token {
    fn from(value: Vec<u8>) -> Self { Self::new(value) }
}

impl From<&[u8]> for Token {
    fn from(value: &[u8]) -> Self { Self::new(value.to_vec()) }
}

impl From<Bytes> for Token {
    fn from(value: Bytes) -> Self { Self::new(value.into()) }
}

impl AsRef<[u8]> for Token {
    fn as_ref(&self) -> &[u8] { &self.value }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token").field("len", &self.value.len()).finish()
    }
}
