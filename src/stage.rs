//! Names for the fields of a frame and the direction they travel.
//!
//! Diagnostics, errors and metrics all label a failure with the [`Stage`] it
//! happened in so callers can report "n of m bytes" per field.

use std::fmt;

/// Direction a frame travels relative to the local endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Frames read from the peer.
    Inbound,
    /// Frames written to the peer.
    Outbound,
}

impl Direction {
    /// Short label used for metrics and structured log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

/// Field of a frame that an operation was transferring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// The optional one-byte flag.
    Flags,
    /// The four-byte length prefix.
    Length,
    /// The token payload.
    Data,
}

impl Field {
    /// Short label used for metrics and structured log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Field::Flags => "flags",
            Field::Length => "length",
            Field::Data => "data",
        }
    }
}

/// A field paired with the direction it was moving in.
///
/// # Examples
///
/// ```
/// use tokenframe::stage::Stage;
///
/// assert_eq!(Stage::SEND_LENGTH.to_string(), "sending token length");
/// assert_eq!(Stage::RECV_FLAGS.to_string(), "reading token flags");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Stage {
    /// Direction of the transfer.
    pub direction: Direction,
    /// Field being transferred.
    pub field: Field,
}

impl Stage {
    /// Writing the flag byte.
    pub const SEND_FLAGS: Stage = Stage::new(Direction::Outbound, Field::Flags);
    /// Writing the length field.
    pub const SEND_LENGTH: Stage = Stage::new(Direction::Outbound, Field::Length);
    /// Writing the payload.
    pub const SEND_DATA: Stage = Stage::new(Direction::Outbound, Field::Data);
    /// Reading the first byte of a frame.
    pub const RECV_FLAGS: Stage = Stage::new(Direction::Inbound, Field::Flags);
    /// Reading the length field.
    pub const RECV_LENGTH: Stage = Stage::new(Direction::Inbound, Field::Length);
    /// Reading the payload.
    pub const RECV_DATA: Stage = Stage::new(Direction::Inbound, Field::Data);

    /// Pair a direction with a field.
    #[must_use]
    pub const fn new(direction: Direction, field: Field) -> Self { Self { direction, field } }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.direction {
            Direction::Inbound => "reading",
            Direction::Outbound => "sending",
        };
        write!(f, "{verb} token {}", self.field.as_str())
    }
}
