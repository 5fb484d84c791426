//! Decoder configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What the track decoder does with a status byte outside the event table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnknownStatusPolicy {
    /// Abort the decode with [`crate::MidiError::UnknownEvent`]
    #[default]
    Fail,
    /// Emit an unknown event, skip its system common data bytes and keep going
    Skip,
}

/// Options controlling how strictly a MIDI stream is decoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReadOptions {
    /// Handling of unrecognized status bytes
    pub unknown_status: UnknownStatusPolicy,
    /// Skip chunks tagged neither `MThd` nor `MTrk` instead of failing on them
    pub skip_alien_chunks: bool,
    /// Fail when the decoded track count differs from the header's, rather than warn
    pub enforce_track_count: bool,
}

impl ReadOptions {
    /// Strict defaults: unknown statuses and alien chunks fail, track count is not enforced
    pub const fn new() -> Self {
        Self {
            unknown_status: UnknownStatusPolicy::Fail,
            skip_alien_chunks: false,
            enforce_track_count: false,
        }
    }

    /// Tolerant decoding: unknown statuses and alien chunks are skipped with a diagnostic
    pub const fn lenient() -> Self {
        Self {
            unknown_status: UnknownStatusPolicy::Skip,
            skip_alien_chunks: true,
            enforce_track_count: false,
        }
    }

    /// Sets the unknown status policy
    pub const fn with_unknown_status(mut self, policy: UnknownStatusPolicy) -> Self {
        self.unknown_status = policy;
        self
    }

    /// Sets whether alien chunks are skipped
    pub const fn with_skip_alien_chunks(mut self, skip: bool) -> Self {
        self.skip_alien_chunks = skip;
        self
    }

    /// Sets whether the header's track count is enforced
    pub const fn with_enforce_track_count(mut self, enforce: bool) -> Self {
        self.enforce_track_count = enforce;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{ReadOptions, UnknownStatusPolicy};

    #[test]
    fn default_options_are_strict() {
        assert_eq!(ReadOptions::default(), ReadOptions::new());
        assert_eq!(ReadOptions::new().unknown_status, UnknownStatusPolicy::Fail);
    }

    #[test]
    fn builders_override_single_fields() {
        let options = ReadOptions::new()
            .with_unknown_status(UnknownStatusPolicy::Skip)
            .with_enforce_track_count(true);

        assert_eq!(options.unknown_status, UnknownStatusPolicy::Skip);
        assert!(options.enforce_track_count);
        assert!(!options.skip_alien_chunks);
    }
}
