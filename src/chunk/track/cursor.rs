//! Buffered cursor over a track chunk's payload, with the single byte rewind running status
//! needs and variable length quantity reads

use crate::error::{FormatError, MidiError, ReadResult};

/// Mask for the 7 value bits of a variable length quantity byte
const VLQ_MASK: u8 = 0x7F;
/// The Standard MIDI File format caps variable length quantities at 4 bytes (0x0FFFFFFF)
const MAX_VLQ_BYTES: usize = 4;

/// Forward reader over a borrowed byte span
#[derive(Debug, Clone)]
pub struct TrackCursor<'a> {
    /// Bytes being decoded
    data: &'a [u8],
    /// Index of the next unread byte
    position: usize,
}

impl<'a> TrackCursor<'a> {
    /// Starts a cursor at the beginning of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Offset of the next unread byte
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// True once every byte has been consumed
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Reads one byte, or `None` at the end of the span
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.position)?;
        self.position += 1;
        Some(byte)
    }

    /// Reads one byte that the current event requires
    pub fn expect_byte(&mut self) -> ReadResult<u8> {
        self.next_byte().ok_or(MidiError::truncated(1, 0))
    }

    /// Steps back over the byte just read so it can be read again
    pub fn rewind(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    /// Reads exactly `n` bytes
    pub fn take(&mut self, n: usize) -> ReadResult<&'a [u8]> {
        let available = self.remaining();
        if n > available {
            return Err(MidiError::truncated(n, available));
        }

        let bytes = &self.data[self.position..self.position + n];
        self.position += n;
        Ok(bytes)
    }

    /// Reads up to `n` bytes, stopping early at the end of the span
    pub fn take_up_to(&mut self, n: usize) -> &'a [u8] {
        let n = n.min(self.remaining());
        let bytes = &self.data[self.position..self.position + n];
        self.position += n;
        bytes
    }

    /// Reads a variable length quantity. `None` means the span ended before its first byte;
    /// running out after that is truncation.
    pub fn read_vlq(&mut self) -> ReadResult<Option<u32>> {
        let Some(mut byte) = self.next_byte() else {
            return Ok(None);
        };

        let mut result = (byte & VLQ_MASK) as u32;
        let mut count = 1;

        // The msb flags that another byte follows
        while msb_is_one(byte) {
            if count == MAX_VLQ_BYTES {
                return Err(FormatError::VlqTooLong.into());
            }

            byte = self.expect_byte()?;
            result = (result << 7) | (byte & VLQ_MASK) as u32;
            count += 1;
        }

        Ok(Some(result))
    }

    /// Reads a variable length quantity that the current event requires
    pub fn expect_vlq(&mut self) -> ReadResult<u32> {
        self.read_vlq()?.ok_or_else(|| MidiError::truncated(1, 0))
    }
}

/// Returns true if the msb of a byte is 1
pub fn msb_is_one(byte: u8) -> bool {
    byte >> 7 == 1
}

#[cfg(test)]
mod tests {
    use super::TrackCursor;
    use crate::error::{FormatError, MidiError};

    /// Encodes a value as a minimal variable length quantity
    fn to_vlq(mut value: u32) -> Vec<u8> {
        let mut bytes = vec![(value & 0x7F) as u8];
        value >>= 7;

        while value > 0 {
            bytes.push((value & 0x7F) as u8 | 0x80);
            value >>= 7;
        }

        bytes.reverse();
        bytes
    }

    #[test]
    fn delta_time_parsed() {
        let bytes = [0x81, 0x40];
        let mut cursor = TrackCursor::new(&bytes);

        assert_eq!(cursor.read_vlq().unwrap(), Some(192));
        assert!(cursor.is_exhausted())
    }

    #[test]
    fn vlq_stops_at_terminating_byte() {
        let bytes = [0x00, 0x90, 0x7F, 0xFF, 0x7F, 0x3C];
        let mut cursor = TrackCursor::new(&bytes);

        assert_eq!(cursor.read_vlq().unwrap(), Some(0));
        assert_eq!(cursor.next_byte(), Some(0x90));
        assert_eq!(cursor.read_vlq().unwrap(), Some(0x7F));
        assert_eq!(cursor.read_vlq().unwrap(), Some(0x3FFF));
        assert_eq!(cursor.next_byte(), Some(0x3C));
    }

    #[test]
    fn vlq_boundaries_decode_with_minimal_length() {
        let cases = [
            (0u32, 1usize),
            (0x7F, 1),
            (0x80, 2),
            (0x2000, 2),
            (0x3FFF, 2),
            (0x4000, 3),
            (0x1F_FFFF, 3),
            (0x20_0000, 4),
            (0x0FFF_FFFF, 4),
        ];

        for (value, length) in cases {
            let bytes = to_vlq(value);
            assert_eq!(bytes.len(), length, "encoding of {value:#X}");

            let mut cursor = TrackCursor::new(&bytes);
            assert_eq!(cursor.read_vlq().unwrap(), Some(value));
            assert_eq!(cursor.position(), length);
        }
    }

    #[test]
    fn vlq_on_empty_span_is_none() {
        let mut cursor = TrackCursor::new(&[]);
        assert_eq!(cursor.read_vlq().unwrap(), None)
    }

    #[test]
    fn vlq_cut_short_is_truncation() {
        let bytes = [0x81, 0x80];
        let mut cursor = TrackCursor::new(&bytes);

        assert!(matches!(
            cursor.read_vlq(),
            Err(MidiError::Truncated { .. })
        ))
    }

    #[test]
    fn vlq_longer_than_four_bytes_is_rejected() {
        let bytes = [0x81, 0x81, 0x81, 0x81, 0x01];
        let mut cursor = TrackCursor::new(&bytes);

        assert!(matches!(
            cursor.read_vlq(),
            Err(MidiError::Format(FormatError::VlqTooLong))
        ))
    }

    #[test]
    fn rewind_rereads_last_byte() {
        let bytes = [0x3C, 0x40];
        let mut cursor = TrackCursor::new(&bytes);

        assert_eq!(cursor.next_byte(), Some(0x3C));
        cursor.rewind();
        assert_eq!(cursor.take(2).unwrap(), &[0x3C, 0x40]);
    }

    #[test]
    fn take_past_end_is_truncation() {
        let bytes = [0x01, 0x02];
        let mut cursor = TrackCursor::new(&bytes);

        assert!(matches!(
            cursor.take(3),
            Err(MidiError::Truncated {
                needed: 3,
                available: 2
            })
        ));
        assert_eq!(cursor.take_up_to(3), &[0x01, 0x02]);
    }
}
