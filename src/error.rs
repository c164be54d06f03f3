// src/error.rs

use thiserror::Error;

/// Errors produced while loading, parsing or combining MIDI data
#[derive(Debug, Error)]
pub enum MidiError {
    #[error("failed to decode MIDI data: {0}")]
    Decode(#[from] midly::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("type 2 MIDI files are not supported")]
    UnsupportedFormat,

    #[error("SMPTE time-code MIDI files are not supported")]
    UnsupportedTiming,

    /// A note-off (or velocity 0 note-on) arrived with no open note-on for its key
    #[error(
        "note-off with no matching note-on (channel {channel}, note {note}, at {time:.3}s); \
         the MIDI file may be corrupt"
    )]
    MalformedNoteEvent { channel: u8, note: u8, time: f64 },

    #[error("track name '{0}' does not exist")]
    TrackNotFound(String),

    #[error("failed to merge tracks '{first}' & '{second}': {source}")]
    MergeFailure {
        first: String,
        second: String,
        #[source]
        source: Box<MidiError>,
    },

    #[error("track '{track}' contains an invalid event time ({time})")]
    InvalidTiming { track: String, time: f64 },

    #[error("'{0}' is not a valid note number or note name")]
    InvalidNoteName(String),

    #[error("program change number {0} is out of range (0-127)")]
    InvalidProgram(u8),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MidiError>;
