//! MIDI byte sources and chunk reading. Anything implementing [`std::io::Read`] can be decoded,
//! whether it is a file on disk or a span of bytes in memory.

use std::{
    fs::File,
    io::{BufReader, Cursor, ErrorKind, Read},
    path::Path,
};

use crate::{
    error::{MidiError, ReadResult},
    Chunk,
};

/// Upper bound on bytes preallocated for a single read, so a bogus chunk length cannot
/// reserve gigabytes before the source runs dry
const MAX_PREALLOCATION: usize = 64 * 1024;

/// A forward-only source of MIDI bytes
pub trait ByteSource {
    /// Reads exactly `n` bytes, failing with [`MidiError::Truncated`] if fewer remain
    fn read_exact_bytes(&mut self, n: usize) -> ReadResult<Vec<u8>>;
    /// Reads a single byte, returning `None` on a clean end of input
    fn read_byte(&mut self) -> ReadResult<Option<u8>>;
}

/// [`ByteSource`] over any reader
#[derive(Debug)]
pub struct IoSource<R> {
    /// The wrapped reader
    reader: R,
    /// Bytes consumed so far
    position: u64,
}

impl<R: Read> IoSource<R> {
    /// Wraps a reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            position: 0,
        }
    }

    /// Number of bytes read from the source so far
    pub fn position(&self) -> u64 {
        self.position
    }
}

impl<R: Read> ByteSource for IoSource<R> {
    fn read_exact_bytes(&mut self, n: usize) -> ReadResult<Vec<u8>> {
        let mut bytes = Vec::with_capacity(n.min(MAX_PREALLOCATION));
        let read = (&mut self.reader).take(n as u64).read_to_end(&mut bytes)?;
        self.position += read as u64;

        if read < n {
            return Err(MidiError::truncated(n, read));
        }

        Ok(bytes)
    }

    fn read_byte(&mut self) -> ReadResult<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.position += 1;
                    return Ok(Some(byte[0]));
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Chunk level reads on top of a [`ByteSource`]
pub trait MidiStream: ByteSource {
    /// Reads the next chunk, treating a clean end of input as truncation
    fn read_chunk(&mut self) -> ReadResult<Chunk> {
        self.next_chunk()?.ok_or_else(|| MidiError::truncated(Chunk::PREFIX_LEN, 0))
    }

    /// Reads the next chunk, or `None` if the source ended exactly on a chunk boundary
    fn next_chunk(&mut self) -> ReadResult<Option<Chunk>> {
        let Some(first) = self.read_byte()? else {
            return Ok(None);
        };

        let rest = self
            .read_exact_bytes(Chunk::PREFIX_LEN - 1)
            .map_err(|e| e.after_consumed(1))?;

        let chunk_type = [first as char, rest[0] as char, rest[1] as char, rest[2] as char];
        let length = u32::from_be_bytes([rest[3], rest[4], rest[5], rest[6]]);
        let data = self.read_exact_bytes(length as usize)?;

        Ok(Some(Chunk {
            chunk_type,
            length,
            data,
        }))
    }
}

impl<SOURCE: ByteSource + ?Sized> MidiStream for SOURCE {}

/// Trait that allows for different types to be translated to a MIDI parseable source
pub trait MidiReadable {
    /// Reader backing the produced source
    type Reader: Read;
    /// Opens the type as a byte source
    fn get_midi_source(self) -> ReadResult<IoSource<Self::Reader>>;
}

/// Wrapper struct to allow passing Vec<u8> to MidiReadable trait
pub struct MidiData(pub Vec<u8>);

impl MidiReadable for MidiData {
    type Reader = Cursor<Vec<u8>>;
    fn get_midi_source(self) -> ReadResult<IoSource<Self::Reader>> {
        Ok(IoSource::new(Cursor::new(self.0)))
    }
}

impl<PATH> MidiReadable for PATH
where
    PATH: AsRef<Path>,
{
    type Reader = BufReader<File>;
    fn get_midi_source(self) -> ReadResult<IoSource<Self::Reader>> {
        let file = File::open(self.as_ref())?;
        Ok(IoSource::new(BufReader::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::{ByteSource, IoSource, MidiData, MidiReadable, MidiStream};
    use crate::{chunk::chunk_types::HEADER_CHUNK, MidiError};

    #[test]
    fn exact_reads_advance_position() {
        let bytes = [1u8, 2, 3, 4, 5];
        let mut source = IoSource::new(&bytes[..]);

        assert_eq!(source.read_exact_bytes(3).unwrap(), vec![1, 2, 3]);
        assert_eq!(source.read_byte().unwrap(), Some(4));
        assert_eq!(source.position(), 4);
    }

    #[test]
    fn short_exact_read_is_truncation() {
        let bytes = [1u8, 2];
        let mut source = IoSource::new(&bytes[..]);

        let result = source.read_exact_bytes(4);
        assert!(matches!(
            result,
            Err(MidiError::Truncated {
                needed: 4,
                available: 2
            })
        ))
    }

    #[test]
    fn read_byte_signals_clean_end() {
        let mut source = IoSource::new(&[0u8; 0][..]);
        assert_eq!(source.read_byte().unwrap(), None);
    }

    #[test]
    fn chunk_reads_tag_length_and_data() {
        let bytes = [b'M', b'T', b'h', b'd', 0, 0, 0, 2, 0xAB, 0xCD, 0xFF];
        let mut source = IoSource::new(&bytes[..]);

        let chunk = source.read_chunk().expect("Read chunk");
        assert_eq!(chunk.chunk_type, HEADER_CHUNK);
        assert_eq!(chunk.len(), 2);
        assert_eq!(chunk.data, vec![0xAB, 0xCD]);
        assert_eq!(source.position(), 10);
    }

    #[test]
    fn next_chunk_on_empty_source_is_none() {
        let mut source = IoSource::new(&[0u8; 0][..]);
        assert!(source.next_chunk().unwrap().is_none());
    }

    #[test]
    fn partial_chunk_prefix_is_truncation() {
        let bytes = [b'M', b'T', b'r'];
        let mut source = IoSource::new(&bytes[..]);

        let result = source.next_chunk();
        assert!(matches!(
            result,
            Err(MidiError::Truncated {
                needed: 8,
                available: 3
            })
        ))
    }

    #[test]
    fn chunk_with_short_data_is_truncation() {
        let bytes = [b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 1, 0, 4];
        let mut source = IoSource::new(&bytes[..]);

        let result = source.read_chunk();
        assert!(matches!(
            result,
            Err(MidiError::Truncated {
                needed: 6,
                available: 4
            })
        ))
    }

    #[test]
    fn midi_data_opens_as_source() {
        let mut source = MidiData(vec![0x90])
            .get_midi_source()
            .expect("Open in memory data");

        assert_eq!(source.read_byte().unwrap(), Some(0x90));
    }

    #[test]
    fn missing_file_is_input_error() {
        let result = "test/does-not-exist.mid".get_midi_source();
        assert!(matches!(result, Err(MidiError::Input(_))))
    }
}
