//! System Exclusive Messages

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::cursor::TrackCursor;
use crate::error::ReadResult;

/// Status introducing a complete or first-packet system exclusive message
pub const SYSEX_START: u8 = 0xF0;
/// Status introducing a continuation packet or an escaped sequence
pub const SYSEX_ESCAPE: u8 = 0xF7;

/// A midi system exclusive event message. In a file the payload is length prefixed, so it is
/// framed without scanning for the 0xF7 terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SysexEvent {
    /// The introducing status, 0xF0 or 0xF7
    pub status: u8,
    /// Data payload to be parsed on a per-system basis
    pub payload: Vec<u8>,
}

/// A manufacturer's ID. Can be either a 1 byte variant or 3 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ManufactureId {
    /// One byte ID
    OneByte(u8),
    /// Three byte ID
    ThreeByte([u8; 3]),
}

impl ManufactureId {
    /// Reads an ID off the front of a sysex payload
    pub fn from_payload(payload: &[u8]) -> Option<Self> {
        match payload {
            [0x00, second, third, ..] => Some(ManufactureId::ThreeByte([0x00, *second, *third])),
            [0x00, ..] => None,
            [first, ..] => Some(ManufactureId::OneByte(*first)),
            [] => None,
        }
    }
}

impl SysexEvent {
    /// Reads a variable length size and that many payload bytes. The status has already been
    /// consumed.
    pub(crate) fn read(status: u8, cursor: &mut TrackCursor<'_>) -> ReadResult<Self> {
        let length = cursor.expect_vlq()? as usize;
        let payload = cursor.take(length)?.to_vec();

        Ok(Self { status, payload })
    }

    /// True if this is an 0xF7 escape rather than an 0xF0 message
    pub fn is_escape(&self) -> bool {
        self.status == SYSEX_ESCAPE
    }

    /// The manufacturer ID at the front of an 0xF0 message's payload
    pub fn manufacture_id(&self) -> Option<ManufactureId> {
        if self.is_escape() {
            return None;
        }

        ManufactureId::from_payload(&self.payload)
    }
}
