//! Track chunk data enums and structs, and the event decoder that fills them

use channel::{ChannelEvent, ChannelMessage as Message};
use cursor::{msb_is_one, TrackCursor};
use meta::MetaEvent;
use sysex::{SysexEvent, SYSEX_ESCAPE, SYSEX_START};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    chunk::chunk_types::TRACK_DATA_CHUNK,
    diagnostic::{Diagnostic, Diagnostics},
    error::{FormatError, MidiError, ReadResult},
    options::{ReadOptions, UnknownStatusPolicy},
    Chunk,
};

pub mod channel;
pub mod cursor;
pub mod meta;
pub mod sysex;

/// Name of a track that carries no track name meta event
pub const DEFAULT_TRACK_NAME: &str = "untitled";
/// Status byte introducing a meta event
pub const META_STATUS: u8 = 0xFF;

/// Converts microseconds per quarter note into beats per minute
const MICROSECONDS_PER_MINUTE: u32 = 60_000_000;

/// A track chunk, containing one or more MTrk events
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackChunk {
    /// Name from the last track name meta event, or "untitled"
    pub name: String,
    /// Beats per minute from the last tempo meta event
    pub tempo: Option<u32>,
    /// All associated track events to this chunk, in file order
    pub events: Vec<TrackEvent>,
}

impl Default for TrackChunk {
    fn default() -> Self {
        Self {
            name: DEFAULT_TRACK_NAME.to_string(),
            tempo: None,
            events: vec![],
        }
    }
}

impl TrackChunk {
    /// Decodes an `MTrk` chunk's payload into its events. Decoding stops successfully once the
    /// payload is exhausted where the next delta-time would begin.
    pub fn decode(
        chunk: &Chunk,
        options: &ReadOptions,
        diagnostics: &mut Diagnostics,
    ) -> ReadResult<Self> {
        if chunk.chunk_type != TRACK_DATA_CHUNK {
            return Err(FormatError::UnexpectedChunk {
                expected: TRACK_DATA_CHUNK,
                found: chunk.chunk_type,
            }
            .into());
        }

        let mut cursor = TrackCursor::new(&chunk.data);
        let mut status = RunningStatus::default();
        let mut track = Self::default();

        while let Some(delta_time) = cursor.read_vlq()? {
            let (event, next) = Event::read(&mut cursor, status, options, diagnostics)?;
            status = next;

            if let Event::Meta(meta) = &event {
                track.apply_meta(meta, diagnostics);
            }

            track.events.push(TrackEvent { delta_time, event });
        }

        log::debug!(
            "Decoded track `{}`: {} events, tempo {:?}",
            track.name,
            track.events.len(),
            track.tempo
        );

        Ok(track)
    }

    /// Applies the meta events that describe the track itself
    fn apply_meta(&mut self, meta: &MetaEvent, diagnostics: &mut Diagnostics) {
        match meta {
            MetaEvent::TrackName(name) => self.name = name.clone(),
            MetaEvent::Tempo(0) => diagnostics.report(Diagnostic::ZeroTempo),
            MetaEvent::Tempo(micros) => self.tempo = Some(MICROSECONDS_PER_MINUTE / micros),
            MetaEvent::UnknownRaw(meta_type, data) => match meta::fixed_length(*meta_type) {
                Some(expected) => diagnostics.report(Diagnostic::MalformedMeta {
                    meta_type: *meta_type,
                    expected,
                    found: data.len(),
                }),
                None => diagnostics.report(Diagnostic::UnrecognizedMeta {
                    meta_type: *meta_type,
                    length: data.len(),
                }),
            },
            _ => {}
        }
    }
}

/// The most recent status byte of a track. Threaded through each event read so every track
/// starts from its own state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningStatus(Option<u8>);

impl RunningStatus {
    /// The status byte in effect, if any has been seen
    pub fn current(self) -> Option<u8> {
        self.0
    }

    /// Reads the next byte as a status. A data byte is put back for the event's arguments and
    /// the running status is reused.
    fn resolve(self, cursor: &mut TrackCursor<'_>) -> ReadResult<u8> {
        let byte = cursor.expect_byte()?;

        if msb_is_one(byte) {
            return Ok(byte);
        }

        cursor.rewind();
        self.0.ok_or_else(|| FormatError::MissingRunningStatus(byte).into())
    }
}

/// A MIDI Event with a DeltaTime and an attached Event
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackEvent {
    /// Delta time is a variable-length representation of how much time to wait in ticks before the
    /// event follows.
    pub delta_time: u32,
    /// The event that occurs after the delta time is waited for
    pub event: Event,
}

impl TrackEvent {
    /// Classification of the event
    pub fn kind(&self) -> EventKind {
        self.event.kind()
    }

    /// Channel of a channel voice event
    pub fn channel(&self) -> Option<u8> {
        self.event.channel()
    }
}

/// Any event that may occur
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Event {
    /// A channel voice event
    Channel(ChannelEvent),
    /// A system exclusive event
    Sysex(SysexEvent),
    /// Specifies non-MIDI information useful to this format or to sequencers
    Meta(MetaEvent),
    /// A status outside the event table, kept when unknown statuses are skipped
    Unknown(UnknownEvent),
}

/// An unrecognized status and the bytes skipped after it
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnknownEvent {
    /// The status byte
    pub status: u8,
    /// Data bytes skipped after the status
    pub data: Vec<u8>,
}

/// Flat classification of an [`Event`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EventKind {
    /// Note released
    NoteOff,
    /// Note pressed
    NoteOn,
    /// Per key aftertouch
    PolyPressure,
    /// Controller change
    Controller,
    /// Patch change
    ProgramChange,
    /// Channel aftertouch
    ChannelPressure,
    /// Pitch wheel change
    PitchBend,
    /// System exclusive
    SysEx,
    /// File meta data
    Meta,
    /// Unrecognized status
    Unknown,
}

impl Event {
    /// Classification of the event
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Channel(event) => match event.message {
                Message::NoteOff(_) => EventKind::NoteOff,
                Message::NoteOn(_) => EventKind::NoteOn,
                Message::PolyPressure { .. } => EventKind::PolyPressure,
                Message::Controller(_) => EventKind::Controller,
                Message::ProgramChange(_) => EventKind::ProgramChange,
                Message::ChannelPressure(_) => EventKind::ChannelPressure,
                Message::PitchBend { .. } => EventKind::PitchBend,
            },
            Self::Sysex(_) => EventKind::SysEx,
            Self::Meta(_) => EventKind::Meta,
            Self::Unknown(_) => EventKind::Unknown,
        }
    }

    /// Channel of a channel voice event, `None` for every other kind
    pub fn channel(&self) -> Option<u8> {
        match self {
            Self::Channel(event) => Some(event.channel),
            _ => None,
        }
    }

    /// Reads one event after its delta-time, returning it with the running status that
    /// follows it
    fn read(
        cursor: &mut TrackCursor<'_>,
        running: RunningStatus,
        options: &ReadOptions,
        diagnostics: &mut Diagnostics,
    ) -> ReadResult<(Self, RunningStatus)> {
        let status = running.resolve(cursor)?;
        let next = RunningStatus(Some(status));

        if let Some(event) = ChannelEvent::read(status, cursor)? {
            return Ok((Event::Channel(event), next));
        }

        let event = match status {
            META_STATUS => Event::Meta(MetaEvent::read(cursor)?),
            SYSEX_START | SYSEX_ESCAPE => Event::Sysex(SysexEvent::read(status, cursor)?),
            _ => match options.unknown_status {
                UnknownStatusPolicy::Fail => return Err(MidiError::UnknownEvent { status }),
                UnknownStatusPolicy::Skip => {
                    let data = cursor.take_up_to(system_data_len(status)).to_vec();
                    diagnostics.report(Diagnostic::UnknownStatusSkipped {
                        status,
                        skipped: data.len(),
                    });
                    Event::Unknown(UnknownEvent { status, data })
                }
            },
        };

        Ok((event, next))
    }
}

/// Data bytes following a system common or real time status
fn system_data_len(status: u8) -> usize {
    match status {
        // MIDI time code quarter frame, song select
        0xF1 | 0xF3 => 1,
        // Song position pointer
        0xF2 => 2,
        _ => 0,
    }
}
