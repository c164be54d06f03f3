// src/midi/mod.rs

pub mod file;
pub mod gm;
pub mod message;
pub mod names;
pub mod note;
pub mod pairing;
pub mod parser;
pub mod tempo;
pub mod track;

#[cfg(test)]
pub(crate) mod test_support;

pub use file::MidiFile;
pub use gm::gm_program_to_name;
pub use message::{Message, MessageKind};
pub use names::{name_to_note, note_to_name, parse_note_numbers};
pub use note::{MidiEvent, MidiNote, TIME_OFF_PENDING};
pub use parser::SmfFormat;
pub use tempo::{TempoMap, TempoPoint, TimeResolver};
pub use track::MidiTrack;
