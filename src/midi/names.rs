// src/midi/names.rs

//! Note number <-> note name conversion, with middle C (60) named `C3`.

use crate::error::{MidiError, Result};

const NOTE_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

/// `note_to_name(60)` returns `"C3"`
pub fn note_to_name(note: u8) -> String {
    let octave = (note / 12) as i32 - 2;
    format!("{}{}", NOTE_NAMES[(note % 12) as usize], octave)
}

/// `name_to_note("C3")` returns `60`
pub fn name_to_note(name: &str) -> Result<u8> {
    let invalid = || MidiError::InvalidNoteName(name.to_string());

    let trimmed = name.trim();
    let mut chars = trimmed.chars();
    let letter = chars.next().ok_or_else(invalid)?.to_ascii_uppercase();
    let rest = chars.as_str();
    let (pitch, octave) = match rest.strip_prefix('#') {
        Some(octave) => (format!("{}#", letter), octave),
        None => (letter.to_string(), rest),
    };

    let index = NOTE_NAMES
        .iter()
        .position(|candidate| *candidate == pitch)
        .ok_or_else(invalid)?;
    let octave: i32 = octave.parse().map_err(|_| invalid())?;

    let number = index as i32 + (octave + 2) * 12;
    u8::try_from(number)
        .ok()
        .filter(|number| *number <= 127)
        .ok_or_else(invalid)
}

/// Parse a note number, a note name or a comma separated list of either
pub fn parse_note_numbers(input: &str) -> Result<Vec<u8>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            if part.chars().all(|c| c.is_ascii_digit()) {
                part.parse::<u8>()
                    .ok()
                    .filter(|number| *number <= 127)
                    .ok_or_else(|| MidiError::InvalidNoteName(part.to_string()))
            } else {
                name_to_note(part)
            }
        })
        .collect::<Result<Vec<_>>>()
        .and_then(|notes| {
            if notes.is_empty() {
                Err(MidiError::InvalidNoteName(input.to_string()))
            } else {
                Ok(notes)
            }
        })
}
