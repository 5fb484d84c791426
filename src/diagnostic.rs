//! Non-fatal conditions found while decoding. These never abort a decode; they are collected
//! for the caller and mirrored to the `log` facade.

use crate::chunk::header::SmpteTicks;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A condition worth reporting that does not stop decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Diagnostic {
    /// The header division is SMPTE based and delta-times are left unresolved
    SmpteDivision(SmpteTicks),
    /// A meta event type outside the known table, kept as raw bytes
    UnrecognizedMeta {
        /// The meta type byte
        meta_type: u8,
        /// Length of the skipped payload
        length: usize,
    },
    /// A fixed layout meta event whose declared length does not match, kept as raw bytes
    MalformedMeta {
        /// The meta type byte
        meta_type: u8,
        /// Payload size of this meta type
        expected: usize,
        /// Declared payload length
        found: usize,
    },
    /// A tempo meta event of 0 microseconds per quarter note, which has no BPM
    ZeroTempo,
    /// An unknown status byte that was skipped instead of failing
    UnknownStatusSkipped {
        /// The status byte
        status: u8,
        /// Data bytes skipped after it
        skipped: usize,
    },
    /// A chunk that is neither a header nor a track, skipped whole
    AlienChunkSkipped {
        /// Tag of the skipped chunk
        chunk_type: [char; 4],
        /// Length of the skipped chunk
        length: u32,
    },
    /// Decoded track count differs from the header's declaration
    TrackCountMismatch {
        /// Track count from the header
        declared: u16,
        /// Track chunks actually decoded
        found: usize,
    },
}

impl core::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SmpteDivision(ticks) => write![
                f,
                "Division is SMPTE based ({} fps, {} ticks per frame), delta-times are not resolved",
                ticks.frames_per_second(),
                ticks.ticks_per_frame()
            ],
            Self::UnrecognizedMeta { meta_type, length } => {
                write![f, "Unrecognized meta event {meta_type:#04X} ({length} bytes)"]
            }
            Self::MalformedMeta {
                meta_type,
                expected,
                found,
            } => write![
                f,
                "Meta event {meta_type:#04X} should carry {expected} bytes, found {found}"
            ],
            Self::ZeroTempo => write![f, "Tempo of 0 microseconds per quarter note ignored"],
            Self::UnknownStatusSkipped { status, skipped } => write![
                f,
                "Skipped unknown status {status:#04X} and {skipped} data bytes"
            ],
            Self::AlienChunkSkipped { chunk_type, length } => write![
                f,
                "Skipped unknown `{}` chunk of {length} bytes",
                chunk_type.iter().collect::<String>()
            ],
            Self::TrackCountMismatch { declared, found } => write![
                f,
                "Header declares {declared} tracks but {found} were decoded"
            ],
        }
    }
}

/// Ordered list of diagnostics collected during one decode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// Records a diagnostic and logs it as a warning
    pub fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!("{diagnostic}");
        self.0.push(diagnostic);
    }

    /// Iterates diagnostics in the order they were reported
    pub fn iter(&self) -> core::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    /// Number of diagnostics reported
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when decoding raised nothing worth reporting
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Counts diagnostics matching a predicate
    pub fn count(&self, predicate: impl Fn(&Diagnostic) -> bool) -> usize {
        self.0.iter().filter(|d| predicate(d)).count()
    }

    /// Consumes the list into its diagnostics
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = core::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{Diagnostic, Diagnostics};

    #[test]
    fn diagnostics_keep_report_order() {
        let mut diagnostics = Diagnostics::default();
        diagnostics.report(Diagnostic::ZeroTempo);
        diagnostics.report(Diagnostic::UnrecognizedMeta {
            meta_type: 0x99,
            length: 3,
        });

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            diagnostics.into_vec(),
            vec![
                Diagnostic::ZeroTempo,
                Diagnostic::UnrecognizedMeta {
                    meta_type: 0x99,
                    length: 3
                }
            ]
        )
    }

    #[test]
    fn alien_chunk_display_names_the_tag() {
        let diagnostic = Diagnostic::AlienChunkSkipped {
            chunk_type: ['X', 'F', 'I', 'H'],
            length: 12,
        };

        assert_eq!(
            diagnostic.to_string(),
            "Skipped unknown `XFIH` chunk of 12 bytes"
        )
    }

    #[test]
    fn malformed_meta_display_names_both_lengths() {
        let diagnostic = Diagnostic::MalformedMeta {
            meta_type: 0x59,
            expected: 2,
            found: 3,
        };

        assert_eq!(
            diagnostic.to_string(),
            "Meta event 0x59 should carry 2 bytes, found 3"
        )
    }
}
