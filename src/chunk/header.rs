//! Header Chunk Enum and Struct Definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    chunk::chunk_types::HEADER_CHUNK,
    diagnostic::{Diagnostic, Diagnostics},
    error::{FormatError, ReadResult},
    Chunk,
};

/// Minimum header payload: format, ntrks and division
const HEADER_LEN: usize = 6;

/// Header chunk data, including format, ntrks and division as 3 16 bit unsigned integers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeaderChunk {
    /// The MIDI format
    format: Format,
    /// Number of tracks
    track_count: u16,
    /// Time signature/division
    division: Division,
}

impl HeaderChunk {
    /// Decodes the `MThd` chunk. An SMPTE based division is reported to `diagnostics`
    /// rather than resolved.
    pub fn decode(chunk: &Chunk, diagnostics: &mut Diagnostics) -> ReadResult<Self> {
        if chunk.chunk_type != HEADER_CHUNK {
            return Err(FormatError::UnexpectedChunk {
                expected: HEADER_CHUNK,
                found: chunk.chunk_type,
            }
            .into());
        }

        let data = &chunk.data;
        if data.len() < HEADER_LEN {
            return Err(FormatError::HeaderTooShort(data.len()).into());
        }

        let format = u16::from_be_bytes([data[0], data[1]]);
        let track_count = u16::from_be_bytes([data[2], data[3]]);
        let division = u16::from_be_bytes([data[4], data[5]]);

        let header = Self::try_from((format, track_count, division))?;

        if let Division::TimeCodeBased(ticks) = header.division {
            diagnostics.report(Diagnostic::SmpteDivision(ticks));
        }

        log::debug!(
            "Decoded header: format {:?}, {} tracks, division {:?}",
            header.format,
            header.track_count,
            header.division
        );

        Ok(header)
    }

    /// The file's track organization
    pub fn format(&self) -> Format {
        self.format
    }

    /// Number of tracks the header declares
    pub fn track_count(&self) -> u16 {
        self.track_count
    }

    /// Meaning of the delta-times
    pub fn division(&self) -> Division {
        self.division
    }
}

impl TryFrom<(u16, u16, u16)> for HeaderChunk {
    type Error = FormatError;
    fn try_from(value: (u16, u16, u16)) -> Result<Self, Self::Error> {
        let (format, track_count, division) = value;

        Ok(Self {
            format: format.try_into()?,
            track_count,
            division: division.into(),
        })
    }
}

/// The overall organization of the MIDI file. Only three values are valid, making most of the 16
/// bits irrelevant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Format {
    /// The file contains a single multi-channel track
    SingleTrack,
    /// The file contains one or more simultaneous tracks (or MIDI outputs) of a sequence
    Simultaneous,
    /// The file contains one or more sequentially independent single-track patterns
    Sequential,
}

impl Format {
    /// The format number as written in the header
    pub fn value(self) -> u16 {
        match self {
            Format::SingleTrack => 0,
            Format::Simultaneous => 1,
            Format::Sequential => 2,
        }
    }
}

impl TryFrom<u16> for Format {
    type Error = FormatError;
    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Format::SingleTrack),
            1 => Ok(Format::Simultaneous),
            2 => Ok(Format::Sequential),
            other => Err(FormatError::InvalidFormat(other)),
        }
    }
}

/// The meaning of the delta-times in the MIDI sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Division {
    /// When bit 15 is a 0, bits 14-0 represent ticks per quarter note
    Metrical(u16),
    /// When bit 15 is 1, bits 14-8 represent the negative SMPTE format,
    /// and bits 7-0 represent ticks per frame
    TimeCodeBased(SmpteTicks),
}

impl Division {
    /// The division exactly as it was stored in the header
    pub fn raw(self) -> u16 {
        match self {
            Self::Metrical(ticks) => ticks,
            Self::TimeCodeBased(smpte) => smpte.raw(),
        }
    }

    /// Ticks per quarter note, if the division is metrical
    pub fn ticks_per_quarter(self) -> Option<u16> {
        match self {
            Self::Metrical(ticks) => Some(ticks),
            Self::TimeCodeBased(_) => None,
        }
    }
}

/// Division defined by time-code-based time. Kept as read; converting it into absolute time
/// units is left to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SmpteTicks {
    /// High byte of the division, a negative frame rate in two's complement
    smpte: i8,
    /// 8 bits of ticks per frame
    tpf: u8,
}

impl SmpteTicks {
    /// Frames per second, the negation of the stored SMPTE format
    pub fn frames_per_second(self) -> i16 {
        -(self.smpte as i16)
    }

    /// Ticks per frame
    pub fn ticks_per_frame(self) -> u8 {
        self.tpf
    }

    /// The 16 bit division these ticks were decoded from
    pub fn raw(self) -> u16 {
        u16::from_be_bytes([self.smpte as u8, self.tpf])
    }
}

impl From<u16> for Division {
    fn from(value: u16) -> Self {
        const SMPTE_FLAG: u16 = 0x8000;

        if value & SMPTE_FLAG == 0 {
            Division::Metrical(value)
        } else {
            let [high, low] = value.to_be_bytes();
            // Bit 15 is set, so the high byte read as i8 is already the negative format
            Division::TimeCodeBased(SmpteTicks {
                smpte: high as i8,
                tpf: low,
            })
        }
    }
}
