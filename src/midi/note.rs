// src/midi/note.rs

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// `time_off` value of a note whose note-off has not been seen yet
pub const TIME_OFF_PENDING: f64 = -1.0;

/// A note with both its on and off times resolved to seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MidiNote {
    /// MIDI channel, 0-15
    pub channel: u8,
    /// MIDI note number, 0-127
    pub note_number: u8,
    /// Velocity at note-on, 0-127
    pub velocity: u8,
    /// Time the note was turned on, in seconds
    pub time_on: f64,
    /// Time the note was turned off, in seconds ([`TIME_OFF_PENDING`] while unresolved)
    pub time_off: f64,
}

impl MidiNote {
    /// Create a note that is still waiting for its note-off
    pub fn new(channel: u8, note_number: u8, velocity: u8, time_on: f64) -> Self {
        MidiNote {
            channel,
            note_number,
            velocity,
            time_on,
            time_off: TIME_OFF_PENDING,
        }
    }

    /// Create a fully resolved note
    pub fn with_off(channel: u8, note_number: u8, velocity: u8, time_on: f64, time_off: f64) -> Self {
        MidiNote {
            channel,
            note_number,
            velocity,
            time_on,
            time_off,
        }
    }

    /// Whether a note-off has been paired with this note
    pub fn is_resolved(&self) -> bool {
        self.time_off >= 0.0
    }

    /// Length of the note in seconds, `None` while unresolved
    pub fn duration(&self) -> Option<f64> {
        self.is_resolved().then(|| self.time_off - self.time_on)
    }

    /// Order by onset time
    pub fn cmp_onset(&self, other: &Self) -> Ordering {
        self.time_on.total_cmp(&other.time_on)
    }
}

impl fmt::Display for MidiNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MidiNote(channel={}, note={}, velocity={}, on={:.4}, off={:.4})",
            self.channel, self.note_number, self.velocity, self.time_on, self.time_off
        )
    }
}

/// A timed controller, pitch-wheel or aftertouch value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MidiEvent {
    pub channel: u8,
    /// CC value 0-127, signed pitch-wheel value or aftertouch pressure
    pub value: i32,
    /// Time the event occurred, in seconds
    pub time: f64,
}

impl MidiEvent {
    pub fn new(channel: u8, value: i32, time: f64) -> Self {
        MidiEvent { channel, value, time }
    }

    pub fn cmp_time(&self, other: &Self) -> Ordering {
        self.time.total_cmp(&other.time)
    }
}

impl fmt::Display for MidiEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MidiEvent(channel={}, value={}, time={:.4})",
            self.channel, self.value, self.time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_creation() {
        let note = MidiNote::new(0, 60, 100, 1.0);
        assert_eq!(note.channel, 0);
        assert_eq!(note.note_number, 60);
        assert_eq!(note.velocity, 100);
        assert_eq!(note.time_on, 1.0);
        assert_eq!(note.time_off, TIME_OFF_PENDING);
        assert!(!note.is_resolved());
        assert_eq!(note.duration(), None);
    }

    #[test]
    fn test_duration() {
        let note = MidiNote::with_off(0, 60, 100, 1.0, 1.5);
        assert!(note.is_resolved());
        assert_eq!(note.duration(), Some(0.5));
    }

    #[test]
    fn test_onset_ordering() {
        let early = MidiNote::with_off(3, 72, 10, 0.5, 4.0);
        let late = MidiNote::with_off(0, 60, 100, 1.0, 1.5);
        assert_eq!(early.cmp_onset(&late), Ordering::Less);
        assert_eq!(late.cmp_onset(&early), Ordering::Greater);

        let a = MidiEvent::new(0, 64, 2.0);
        let b = MidiEvent::new(0, 0, 1.0);
        assert_eq!(a.cmp_time(&b), Ordering::Greater);
    }
}
