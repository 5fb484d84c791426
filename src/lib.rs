//! # midiscan
//!
//! A Standard MIDI File decoder. It turns a raw byte stream into a header, an ordered list of
//! tracks and the timed events inside each track, handling variable length delta-times,
//! running status and the meta event taxonomy along the way.
//!
//! ## Overview
//!
//! MIDI files are structured as a series of chunks. Each chunk contains a 4-character ASCII
//! type identifier and a 32-bit length that specifies how many bytes of data follow. The
//! first chunk is always the `MThd` header, followed by any number of `MTrk` track chunks.
//!
//! - **Streaming-friendly**: decoding reads from any [`reader::ByteSource`], and every
//!   [`std::io::Read`] implementor can be wrapped as one.
//! - **Strict by default**: malformed data aborts the decode with a [`MidiError`]. Conditions
//!   that are odd but harmless are collected as [`Diagnostic`]s instead, and mirrored to the
//!   `log` facade.
//!
//! ## Example Usage
//!
//! ```rust
//! use midiscan::MidiFile;
//!
//! let bytes = [
//!     b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0x01, 0xE0, // header
//!     b'M', b'T', b'r', b'k', 0, 0, 0, 8, // track
//!     0x00, 0x90, 0x3C, 0x40, // note on
//!     0x60, 0x80, 0x3C, 0x00, // note off
//! ];
//!
//! let midi = MidiFile::from_bytes(&bytes).expect("Decode MIDI bytes");
//! assert_eq!(midi.tracks.len(), 1);
//! assert_eq!(midi.tracks[0].events.len(), 2);
//! assert_eq!(midi.tracks[0].name, "untitled");
//! ```
//!
//! ## Library Structure
//!
//! - **[`chunk`]**: header and track chunk decoding, including the track event taxonomy.
//! - **[`reader`]**: byte sources and chunk reading.
//! - **[`file`]**: assembles a whole [`MidiFile`] from a source.
//! - **[`options`]** and **[`diagnostic`]**: decoder configuration and non-fatal reporting.

pub mod chunk;
pub mod diagnostic;
pub mod error;
pub mod file;
pub mod options;
pub mod reader;

pub use diagnostic::{Diagnostic, Diagnostics};
pub use error::{FormatError, MidiError, ReadResult};
pub use file::MidiFile;
pub use options::{ReadOptions, UnknownStatusPolicy};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents a raw MIDI Chunk.
/// A MIDI Chunk consists of a 4-character ASCII type identifier, a 32-bit unsigned integer
/// specifying the length of its data, and exactly that many data bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Chunk {
    /// 4 character ASCII chunk type
    pub chunk_type: [char; 4],
    /// Length of the data that follows
    length: u32,
    /// The chunk's payload
    pub data: Vec<u8>,
}

impl Chunk {
    /// Bytes taken by the type and length prefix of every chunk
    pub const PREFIX_LEN: usize = 8;

    /// Creates a chunk around its payload, which must fit the 32 bit length field
    pub fn new(chunk_type: [char; 4], data: Vec<u8>) -> Result<Self, FormatError> {
        let length =
            u32::try_from(data.len()).map_err(|_| FormatError::ChunkTooLarge(data.len()))?;

        Ok(Self {
            chunk_type,
            length,
            data,
        })
    }

    /// Gets the length of the chunk as a usize
    pub fn len(&self) -> usize {
        self.length as usize
    }

    /// Returns if the chunk has no attributed data
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The raw 32 bit declared length
    pub fn declared_length(&self) -> u32 {
        self.length
    }
}
