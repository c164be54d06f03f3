// src/midi/pairing.rs

use super::note::MidiNote;
use super::track::MidiTrack;
use crate::error::{MidiError, Result};
use std::collections::{HashMap, VecDeque};

/// In-flight notes of one track, keyed by (channel, note number).
///
/// Each queue holds indices into the track's note list, oldest first. The
/// table only lives for the duration of a parse.
#[derive(Debug, Default)]
pub struct NoteTable {
    open: HashMap<(u8, u8), VecDeque<usize>>,
}

impl NoteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new, unresolved note to `track` and queue it for pairing
    pub fn note_on(&mut self, track: &mut MidiTrack, channel: u8, note: u8, velocity: u8, time: f64) {
        let index = track.notes.len();
        track.notes.push(MidiNote::new(channel, note, velocity, time));
        self.open.entry((channel, note)).or_default().push_back(index);
    }

    /// Close the oldest open note for (channel, note)
    pub fn note_off(&mut self, track: &mut MidiTrack, channel: u8, note: u8, time: f64) -> Result<()> {
        let index = self
            .open
            .get_mut(&(channel, note))
            .and_then(VecDeque::pop_front)
            .ok_or(MidiError::MalformedNoteEvent { channel, note, time })?;

        track.notes[index].time_off = time;
        Ok(())
    }

    /// Number of notes still waiting for a note-off
    pub fn pending(&self) -> usize {
        self.open.values().map(VecDeque::len).sum()
    }
}
