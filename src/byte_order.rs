//! Explicit network byte-order codec for the token length field.
//!
//! The length is shifted out one byte at a time rather than reinterpreted
//! through a host integer, so the wire layout does not depend on the target's
//! endianness.

/// Width of the length field on the wire.
pub const LENGTH_FIELD_LEN: usize = 4;

#[expect(
    clippy::cast_possible_truncation,
    reason = "the value is masked to its low eight bits first"
)]
const fn low_byte(value: u32) -> u8 { (value & 0xff) as u8 }

/// Serialise a token length as four big-endian bytes.
///
/// # Examples
///
/// ```
/// use tokenframe::byte_order::encode_length;
///
/// assert_eq!(encode_length(0x1234_5678), [0x12, 0x34, 0x56, 0x78]);
/// ```
#[must_use]
pub const fn encode_length(len: u32) -> [u8; LENGTH_FIELD_LEN] {
    [
        low_byte(len >> 24),
        low_byte(len >> 16),
        low_byte(len >> 8),
        low_byte(len),
    ]
}

/// Parse a token length from its four big-endian wire bytes.
///
/// # Examples
///
/// ```
/// use tokenframe::byte_order::decode_length;
///
/// assert_eq!(decode_length([0x12, 0x34, 0x56, 0x78]), 0x1234_5678);
/// ```
#[must_use]
pub fn decode_length(bytes: [u8; LENGTH_FIELD_LEN]) -> u32 {
    (u32::from(bytes[0]) << 24)
        | (u32::from(bytes[1]) << 16)
        | (u32::from(bytes[2]) << 8)
        | u32::from(bytes[3])
}

/// Keep only the low eight bits of an integer flag value.
#[must_use]
pub const fn truncate_flag(flags: u32) -> u8 { low_byte(flags) }
