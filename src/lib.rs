// src/lib.rs

//! Standard MIDI File decoding into tracks of paired notes and controller
//! streams, timed in seconds.

pub mod config;
pub mod error;
pub mod midi;

pub use error::{MidiError, Result};
pub use midi::{MidiEvent, MidiFile, MidiNote, MidiTrack};
