//! Assembles a whole MIDI file from a byte source: one header chunk, then every track chunk
//! until the source ends

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    chunk::{
        chunk_types,
        header::HeaderChunk,
        track::{TrackChunk, TrackEvent},
    },
    diagnostic::{Diagnostic, Diagnostics},
    error::{FormatError, ReadResult},
    options::ReadOptions,
    reader::{ByteSource, IoSource, MidiReadable, MidiStream},
};

/// A decoded Standard MIDI File
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MidiFile {
    /// The file's header
    pub header: HeaderChunk,
    /// Tracks in the order they appear in the file
    pub tracks: Vec<TrackChunk>,
}

impl MidiFile {
    /// Decodes a file with the default options. Diagnostics are only logged.
    pub fn open<SOURCE: ByteSource + ?Sized>(source: &mut SOURCE) -> ReadResult<Self> {
        Self::open_with(source, &ReadOptions::default()).map(|(file, _)| file)
    }

    /// Decodes a file, returning it along with every diagnostic raised on the way
    pub fn open_with<SOURCE: ByteSource + ?Sized>(
        source: &mut SOURCE,
        options: &ReadOptions,
    ) -> ReadResult<(Self, Diagnostics)> {
        let mut diagnostics = Diagnostics::default();

        let header = HeaderChunk::decode(&source.read_chunk()?, &mut diagnostics)?;
        let mut tracks = vec![];

        while let Some(chunk) = source.next_chunk()? {
            if options.skip_alien_chunks && !chunk_types::is_known(&chunk.chunk_type) {
                diagnostics.report(Diagnostic::AlienChunkSkipped {
                    chunk_type: chunk.chunk_type,
                    length: chunk.declared_length(),
                });
                continue;
            }

            tracks.push(TrackChunk::decode(&chunk, options, &mut diagnostics)?);
        }

        let declared = header.track_count();
        if tracks.len() != declared as usize {
            if options.enforce_track_count {
                return Err(FormatError::TrackCountMismatch {
                    declared,
                    found: tracks.len(),
                }
                .into());
            }

            diagnostics.report(Diagnostic::TrackCountMismatch {
                declared,
                found: tracks.len(),
            });
        }

        Ok((Self { header, tracks }, diagnostics))
    }

    /// Decodes a file held in memory
    pub fn from_bytes(bytes: &[u8]) -> ReadResult<Self> {
        Self::open(&mut IoSource::new(bytes))
    }

    /// Opens and decodes a file on disk
    pub fn from_path(path: impl MidiReadable) -> ReadResult<Self> {
        Self::open(&mut path.get_midi_source()?)
    }

    /// Iterates every track's events, tagged with the index of their track
    pub fn events(&self) -> impl Iterator<Item = (usize, &TrackEvent)> {
        self.tracks
            .iter()
            .enumerate()
            .flat_map(|(index, track)| track.events.iter().map(move |event| (index, event)))
    }
}

#[cfg(test)]
mod tests {
    use super::MidiFile;
    use crate::{
        diagnostic::Diagnostic, error::FormatError, options::ReadOptions, reader::IoSource,
        MidiError,
    };

    /// A header chunk declaring `ntrks` tracks at 96 ticks per quarter
    fn header(ntrks: u16) -> Vec<u8> {
        let mut bytes = b"MThd\0\0\0\x06\0\x01".to_vec();
        bytes.extend(ntrks.to_be_bytes());
        bytes.extend([0x00, 0x60]);
        bytes
    }

    fn chunk(tag: &[u8; 4], data: &[u8]) -> Vec<u8> {
        let mut bytes = tag.to_vec();
        bytes.extend((data.len() as u32).to_be_bytes());
        bytes.extend(data);
        bytes
    }

    #[test]
    fn tracks_keep_encounter_order() {
        let mut bytes = header(2);
        bytes.extend(chunk(b"MTrk", &[0x00, 0xFF, 0x03, 0x01, b'A']));
        bytes.extend(chunk(b"MTrk", &[0x00, 0xFF, 0x03, 0x01, b'B']));

        let midi = MidiFile::from_bytes(&bytes).expect("Decode file");
        let names: Vec<_> = midi.tracks.iter().map(|t| t.name.as_str()).collect();

        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(midi.events().count(), 2);
        assert_eq!(midi.events().last().map(|(index, _)| index), Some(1));
    }

    #[test]
    fn empty_source_is_truncation() {
        assert!(matches!(
            MidiFile::from_bytes(&[]),
            Err(MidiError::Truncated {
                needed: 8,
                available: 0
            })
        ))
    }

    #[test]
    fn first_chunk_must_be_header() {
        let bytes = chunk(b"MTrk", &[]);
        assert!(matches!(
            MidiFile::from_bytes(&bytes),
            Err(MidiError::Format(FormatError::UnexpectedChunk { .. }))
        ))
    }

    #[test]
    fn alien_chunks_fail_unless_skipped() {
        let mut bytes = header(1);
        bytes.extend(chunk(b"XFIH", &[1, 2, 3]));
        bytes.extend(chunk(b"MTrk", &[0x00, 0x90, 0x3C, 0x40]));

        assert!(matches!(
            MidiFile::from_bytes(&bytes),
            Err(MidiError::Format(FormatError::UnexpectedChunk { .. }))
        ));

        let options = ReadOptions::new().with_skip_alien_chunks(true);
        let (midi, diagnostics) =
            MidiFile::open_with(&mut IoSource::new(&bytes[..]), &options).expect("Skip chunk");

        assert_eq!(midi.tracks.len(), 1);
        assert_eq!(
            diagnostics.into_vec(),
            vec![Diagnostic::AlienChunkSkipped {
                chunk_type: ['X', 'F', 'I', 'H'],
                length: 3
            }]
        );
    }

    #[test]
    fn second_header_is_not_skipped_as_alien() {
        let mut bytes = header(1);
        bytes.extend(header(1));

        let options = ReadOptions::lenient();
        let result = MidiFile::open_with(&mut IoSource::new(&bytes[..]), &options);
        assert!(matches!(
            result,
            Err(MidiError::Format(FormatError::UnexpectedChunk { .. }))
        ))
    }

    #[test]
    fn track_count_mismatch_warns_by_default() {
        let mut bytes = header(3);
        bytes.extend(chunk(b"MTrk", &[]));

        let (midi, diagnostics) =
            MidiFile::open_with(&mut IoSource::new(&bytes[..]), &ReadOptions::default())
                .expect("Mismatch is not fatal");

        assert_eq!(midi.tracks.len(), 1);
        assert_eq!(
            diagnostics.into_vec(),
            vec![Diagnostic::TrackCountMismatch {
                declared: 3,
                found: 1
            }]
        );
    }

    #[test]
    fn track_count_mismatch_fails_when_enforced() {
        let mut bytes = header(3);
        bytes.extend(chunk(b"MTrk", &[]));

        let options = ReadOptions::new().with_enforce_track_count(true);
        let result = MidiFile::open_with(&mut IoSource::new(&bytes[..]), &options);

        assert!(matches!(
            result,
            Err(MidiError::Format(FormatError::TrackCountMismatch {
                declared: 3,
                found: 1
            }))
        ))
    }

    #[test]
    fn truncated_track_chunk_aborts_decode() {
        let mut bytes = header(1);
        bytes.extend(b"MTrk\0\0\0\x10\0\x90");

        assert!(matches!(
            MidiFile::from_bytes(&bytes),
            Err(MidiError::Truncated {
                needed: 16,
                available: 2
            })
        ))
    }
}
