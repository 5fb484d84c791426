//! Error types produced while decoding a MIDI stream

use thiserror::Error;

/// The Read Result type (see [`MidiError`])
pub type ReadResult<T> = Result<T, MidiError>;

/// Any error that aborts decoding a MIDI file
#[derive(Debug, Error)]
pub enum MidiError {
    /// The underlying source could not be opened or read
    #[error("Failed to read MIDI source: {0}")]
    Input(#[from] std::io::Error),
    /// The bytes do not follow the Standard MIDI File layout
    #[error("Invalid MIDI data: {0}")]
    Format(#[from] FormatError),
    /// A declared or implied length runs past the bytes actually available
    #[error("Unexpected end of input, needed {needed} bytes but only {available} were available")]
    Truncated {
        /// Bytes the decoder required
        needed: usize,
        /// Bytes that were left in the source
        available: usize,
    },
    /// A status byte outside the recognized event table
    #[error("Unrecognized status byte {status:#04X}")]
    UnknownEvent {
        /// The offending status byte
        status: u8,
    },
}

impl MidiError {
    /// Creates a truncation error
    pub const fn truncated(needed: usize, available: usize) -> Self {
        Self::Truncated { needed, available }
    }

    /// Shifts a truncation error by bytes that were already consumed before the failing read
    pub(crate) fn after_consumed(self, consumed: usize) -> Self {
        match self {
            Self::Truncated { needed, available } => Self::Truncated {
                needed: needed + consumed,
                available: available + consumed,
            },
            other => other,
        }
    }
}

/// Structural problems with otherwise readable bytes
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// A chunk carried a different tag than the decoder expected
    #[error(
        "Expected a `{}` chunk but found `{}`",
        tag_name(.expected),
        tag_name(.found)
    )]
    UnexpectedChunk {
        /// Tag the decoder was looking for
        expected: [char; 4],
        /// Tag that was read
        found: [char; 4],
    },
    /// The header chunk holds fewer than the 6 required bytes
    #[error("Header chunk is {0} bytes long, at least 6 are required")]
    HeaderTooShort(usize),
    /// A payload too large for the 32 bit chunk length
    #[error("Chunk payload of {0} bytes does not fit a 32 bit length")]
    ChunkTooLarge(usize),
    /// Header format outside of 0, 1 and 2
    #[error("Invalid header format {0}")]
    InvalidFormat(u16),
    /// A data byte appeared before any status byte in the track
    #[error("Data byte {0:#04X} with no running status to apply")]
    MissingRunningStatus(u8),
    /// A variable length quantity longer than 4 bytes
    #[error("Variable length quantity exceeds 4 bytes")]
    VlqTooLong,
    /// A tempo meta event declared a payload other than 3 bytes
    #[error("Meta event {meta_type:#04X} must be {expected} bytes long, found {found}")]
    InvalidMetaLength {
        /// The meta type byte
        meta_type: u8,
        /// Length this meta type requires
        expected: usize,
        /// Length that was declared
        found: usize,
    },
    /// Decoded track count differs from the header's declaration
    #[error("Header declares {declared} tracks but {found} were decoded")]
    TrackCountMismatch {
        /// Track count from the header
        declared: u16,
        /// Track chunks actually decoded
        found: usize,
    },
}

/// Renders a chunk tag for error messages
fn tag_name(tag: &[char; 4]) -> String {
    tag.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::{FormatError, MidiError};

    #[test]
    fn unexpected_chunk_displays_tags() {
        let error = FormatError::UnexpectedChunk {
            expected: ['M', 'T', 'r', 'k'],
            found: ['R', 'I', 'F', 'F'],
        };

        assert_eq!(
            error.to_string(),
            "Expected a `MTrk` chunk but found `RIFF`"
        )
    }

    #[test]
    fn truncation_shifts_by_consumed_bytes() {
        let error = MidiError::truncated(7, 2).after_consumed(1);

        assert!(matches!(
            error,
            MidiError::Truncated {
                needed: 8,
                available: 3
            }
        ))
    }

    #[test]
    fn other_errors_are_not_shifted() {
        let error = MidiError::UnknownEvent { status: 0xF4 }.after_consumed(4);
        assert!(matches!(error, MidiError::UnknownEvent { status: 0xF4 }))
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn oversized_chunk_names_its_length() {
        let error = FormatError::ChunkTooLarge(1 << 32);

        assert_eq!(
            error.to_string(),
            "Chunk payload of 4294967296 bytes does not fit a 32 bit length"
        )
    }
}
