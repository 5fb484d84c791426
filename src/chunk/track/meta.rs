//! Meta Event Structs and Parsing

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::cursor::TrackCursor;
use crate::error::{FormatError, ReadResult};

/// Meta type of the track name event
pub const TRACK_NAME: u8 = 0x03;
/// Meta type of the set tempo event
pub const SET_TEMPO: u8 = 0x51;

/// A meta level event
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MetaEvent {
    /// Sequence Number, tag 0x00
    SequenceNumber(u16),
    /// Text metadata, tag 0x01
    Text(String),
    /// Copyright, tag 0x02
    Copyright(String),
    /// Track name, tag 0x03
    TrackName(String),
    /// Instrument name, tag 0x04
    InstrumentName(String),
    /// Lyric, tag 0x05
    Lyric(String),
    /// Marker, tag 0x06
    Marker(String),
    /// Cue Point, tag 0x07
    CuePoint(Vec<u8>),
    /// Midi Channel Prefix, tag 0x20
    MidiChannelPrefix(u8),
    /// End of Track Identifier, tag 0x2F
    EndOfTrack,
    /// Tempo in microseconds per quarter note, tag 0x51
    Tempo(u32),
    /// Smpte Offset, tag 0x54
    SmpteOffset(SmpteOffset),
    /// Time signature, tag 0x58
    TimeSignature(TimeSignature),
    /// Key Signature, tag 0x59
    KeySignature(KeySignature),
    /// Sequencer Specific, tag 0x7f
    SequencerSpecific(Vec<u8>),
    /// A meta event outside the known table, kept as its type and raw payload
    UnknownRaw(u8, Vec<u8>),
}

impl MetaEvent {
    /// Returns the specific event's tag
    pub fn get_tag(&self) -> u8 {
        match self {
            Self::SequenceNumber(_) => 0x00,
            Self::Text(_) => 0x01,
            Self::Copyright(_) => 0x02,
            Self::TrackName(_) => TRACK_NAME,
            Self::InstrumentName(_) => 0x04,
            Self::Lyric(_) => 0x05,
            Self::Marker(_) => 0x06,
            Self::CuePoint(_) => 0x07,
            Self::MidiChannelPrefix(_) => 0x20,
            Self::EndOfTrack => 0x2F,
            Self::Tempo(_) => SET_TEMPO,
            Self::SmpteOffset(_) => 0x54,
            Self::TimeSignature(_) => 0x58,
            Self::KeySignature(_) => 0x59,
            Self::SequencerSpecific(_) => 0x7F,
            Self::UnknownRaw(tag, _) => *tag,
        }
    }

    /// Reads a meta event body: the type byte, a variable length size and that many bytes.
    /// The 0xFF status byte has already been consumed.
    pub(crate) fn read(cursor: &mut TrackCursor<'_>) -> ReadResult<Self> {
        let event_tag = cursor.expect_byte()?;
        let length = cursor.expect_vlq()? as usize;
        let data = cursor.take(length)?;

        macro_rules! meta_event {
            ($name: expr_2021, $value: expr_2021) => {{
                match fixed_length(event_tag) {
                    Some(len) if data.len() != len => {
                        Ok(MetaEvent::UnknownRaw(event_tag, data.to_vec()))
                    }
                    _ => Ok($name($value)),
                }
            }};
        }

        match event_tag {
            0x00 => meta_event!(
                MetaEvent::SequenceNumber,
                u16::from_be_bytes([data[0], data[1]])
            ),
            0x01 => Ok(MetaEvent::Text(text(data))),
            0x02 => Ok(MetaEvent::Copyright(text(data))),
            TRACK_NAME => Ok(MetaEvent::TrackName(text(data))),
            0x04 => Ok(MetaEvent::InstrumentName(text(data))),
            0x05 => Ok(MetaEvent::Lyric(text(data))),
            0x06 => Ok(MetaEvent::Marker(text(data))),
            0x07 => Ok(MetaEvent::CuePoint(data.to_vec())),

            0x20 => meta_event!(MetaEvent::MidiChannelPrefix, data[0]),
            0x2F => Ok(MetaEvent::EndOfTrack),

            SET_TEMPO => match data {
                [high, mid, low] => {
                    Ok(MetaEvent::Tempo(u32::from_be_bytes([0, *high, *mid, *low])))
                }
                _ => Err(FormatError::InvalidMetaLength {
                    meta_type: SET_TEMPO,
                    expected: 3,
                    found: data.len(),
                }
                .into()),
            },
            0x54 => meta_event!(
                MetaEvent::SmpteOffset,
                SmpteOffset {
                    hours: data[0],
                    minutes: data[1],
                    seconds: data[2],
                    frames: data[3],
                    subframes: data[4]
                }
            ),
            0x58 => meta_event!(
                MetaEvent::TimeSignature,
                TimeSignature {
                    numerator: data[0],
                    denominator_power: data[1],
                    clocks_per_tick: data[2],
                    thirty_second_notes_per_quarter: data[3],
                }
            ),
            0x59 => meta_event!(
                MetaEvent::KeySignature,
                KeySignature {
                    sharps_flats: data[0] as i8,
                    minor: data[1] != 0
                }
            ),

            0x7F => Ok(MetaEvent::SequencerSpecific(data.to_vec())),

            _ => Ok(MetaEvent::UnknownRaw(event_tag, data.to_vec())),
        }
    }
}

/// Payload size of the meta types that carry a fixed layout
pub fn fixed_length(meta_type: u8) -> Option<usize> {
    match meta_type {
        0x00 => Some(2),
        0x20 => Some(1),
        SET_TEMPO => Some(3),
        0x54 => Some(5),
        0x58 => Some(4),
        0x59 => Some(2),
        _ => None,
    }
}

/// Text payloads are not guaranteed to be UTF-8, so invalid sequences are replaced
fn text(data: &[u8]) -> String {
    String::from_utf8_lossy(data).into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
/// A key signature
pub struct KeySignature {
    /// Sharps when positive, flats when negative
    pub sharps_flats: i8,
    /// True if in minor, false if in major
    pub minor: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
/// An SMPTE Offset
pub struct SmpteOffset {
    /// Hours of offset
    pub hours: u8,
    /// Minutes of offset
    pub minutes: u8,
    /// Seconds of offset
    pub seconds: u8,
    /// Frames of offset
    pub frames: u8,
    /// Subframes of offset
    pub subframes: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
/// A Time Signature
pub struct TimeSignature {
    /// The time signature's numerator
    pub numerator: u8,
    /// The denominator as a power of two
    pub denominator_power: u8,
    /// Clocks per tick
    pub clocks_per_tick: u8,
    /// Thirty second notes per quarter
    pub thirty_second_notes_per_quarter: u8,
}

impl TimeSignature {
    /// The time signature's denominator, if it fits in 32 bits
    pub fn denominator(&self) -> Option<u32> {
        1u32.checked_shl(self.denominator_power as u32)
    }
}
