//! Channel voice messages, the events selected by status nibbles 0x8 through 0xE

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::cursor::TrackCursor;
use crate::error::ReadResult;

/// A channel voice event: the channel from the status byte's low nibble and its message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelEvent {
    /// MIDI channel, 0 through 15
    pub channel: u8,
    /// The message carried on the channel
    pub message: ChannelMessage,
}

/// A MIDI Message Status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChannelMessage {
    /// Turn Off event
    /// This message is sent when a note is released
    NoteOff(NoteMeta),
    /// Turn On event
    /// This message is sent when a note is depressed
    NoteOn(NoteMeta),
    /// Polyphonic Key Pressure
    /// This message is most often sent by pressing down a key after it "bottoms out"
    PolyPressure {
        /// Note key
        key: u8,
        /// Pressure amount
        amount: u8,
    },
    /// Control change
    /// This message is sent when a controller value changes. Controllers include devices such as
    /// pedals and levers. Certain controller numbers are reserved.
    Controller(ControlChange),
    /// Program change.
    /// This message is sent when the patch number changes
    ProgramChange(u8),
    /// Channel Pressure
    /// This message is most often sent by pressing down on a key after it "bottoms out"
    ChannelPressure(u8),
    /// Pitch Wheel Change, as the two 7 bit halves of a fourteen bit value
    PitchBend {
        /// Least significant 7 bits
        lsb: u8,
        /// Most significant 7 bits
        msb: u8,
    },
}

impl ChannelMessage {
    /// Status nibble identifying the message
    pub fn status_nibble(&self) -> u8 {
        match self {
            Self::NoteOff(_) => 0x8,
            Self::NoteOn(_) => 0x9,
            Self::PolyPressure { .. } => 0xA,
            Self::Controller(_) => 0xB,
            Self::ProgramChange(_) => 0xC,
            Self::ChannelPressure(_) => 0xD,
            Self::PitchBend { .. } => 0xE,
        }
    }
}

/// Metadata for a note's relative info, key and velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NoteMeta {
    /// Note key
    pub key: u8,
    /// Note velocity
    pub velocity: u8,
}

/// Metadata for changing a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlChange {
    /// Controller number
    pub controller_number: u8,
    /// New value
    pub new_value: u8,
}

impl ChannelEvent {
    /// Reads the data bytes for a channel voice `status`. The status byte itself has already
    /// been consumed or inferred from running status.
    ///
    /// Returns `None` if `status` is not a channel voice status.
    pub(crate) fn read(status: u8, cursor: &mut TrackCursor<'_>) -> ReadResult<Option<Self>> {
        let channel = status & 0x0F;

        let message = match status >> 4 {
            0x8 => {
                let reads = cursor.take(2)?;
                ChannelMessage::NoteOff(NoteMeta {
                    key: reads[0],
                    velocity: reads[1],
                })
            }

            0x9 => {
                let reads = cursor.take(2)?;
                ChannelMessage::NoteOn(NoteMeta {
                    key: reads[0],
                    velocity: reads[1],
                })
            }

            0xA => {
                let reads = cursor.take(2)?;
                ChannelMessage::PolyPressure {
                    key: reads[0],
                    amount: reads[1],
                }
            }

            0xB => {
                let reads = cursor.take(2)?;
                ChannelMessage::Controller(ControlChange {
                    controller_number: reads[0],
                    new_value: reads[1],
                })
            }

            0xC => ChannelMessage::ProgramChange(cursor.expect_byte()?),

            0xD => ChannelMessage::ChannelPressure(cursor.expect_byte()?),

            0xE => {
                let reads = cursor.take(2)?;
                ChannelMessage::PitchBend {
                    lsb: reads[0],
                    msb: reads[1],
                }
            }

            _ => return Ok(None),
        };

        Ok(Some(Self { channel, message }))
    }

    /// Fourteen bit pitch bend value, centered at 0x2000
    pub fn pitch_bend(&self) -> Option<u16> {
        const MASK: u8 = 0x7F;

        match self.message {
            ChannelMessage::PitchBend { lsb, msb } => {
                Some((((msb & MASK) as u16) << 7) | (lsb & MASK) as u16)
            }
            _ => None,
        }
    }
}
