// src/midi/track.rs

use super::note::{MidiEvent, MidiNote};
use crate::error::{MidiError, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Notes and controller streams of one logical track
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MidiTrack {
    pub name: String,
    /// Paired notes, sorted by onset once parsing is done
    pub notes: Vec<MidiNote>,
    /// Control change events per controller number
    pub control_change: BTreeMap<u8, Vec<MidiEvent>>,
    pub pitchwheel: Vec<MidiEvent>,
    pub aftertouch: Vec<MidiEvent>,
}

impl MidiTrack {
    pub fn new(name: impl Into<String>) -> Self {
        MidiTrack {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn add_control_change(&mut self, control: u8, channel: u8, value: i32, time: f64) {
        self.control_change
            .entry(control)
            .or_default()
            .push(MidiEvent::new(channel, value, time));
    }

    pub fn add_pitchwheel(&mut self, channel: u8, value: i32, time: f64) {
        self.pitchwheel.push(MidiEvent::new(channel, value, time));
    }

    pub fn add_aftertouch(&mut self, channel: u8, value: i32, time: f64) {
        self.aftertouch.push(MidiEvent::new(channel, value, time));
    }

    /// True when the track holds no notes and no events of any kind
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
            && self.control_change.is_empty()
            && self.pitchwheel.is_empty()
            && self.aftertouch.is_empty()
    }

    /// Distinct note numbers used by the track, ascending
    pub fn all_used_notes(&self) -> Vec<u8> {
        self.notes
            .iter()
            .map(|note| note.note_number)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Stable sort of the notes by onset time
    pub fn sort_notes(&mut self) {
        self.notes.sort_by(MidiNote::cmp_onset);
    }

    /// Combine two tracks into a new one.
    ///
    /// Notes, pitch wheel and aftertouch are merged by time. Control change
    /// streams are merged per controller number. The result is named
    /// `"<first> & <second>"` unless `name` is given.
    pub fn merge(first: &MidiTrack, second: &MidiTrack, name: Option<&str>) -> Result<MidiTrack> {
        log::info!("Merging tracks '{}' & '{}'", first.name, second.name);

        first
            .validate()
            .and_then(|_| second.validate())
            .map_err(|source| MidiError::MergeFailure {
                first: first.name.clone(),
                second: second.name.clone(),
                source: Box::new(source),
            })?;

        let name = match name {
            Some(name) => name.to_string(),
            None => format!("{} & {}", first.name, second.name),
        };

        let mut notes = [first.notes.as_slice(), second.notes.as_slice()].concat();
        notes.sort_by(MidiNote::cmp_onset);

        let mut control_change = first.control_change.clone();
        for (control, events) in &second.control_change {
            let merged = control_change.entry(*control).or_default();
            merged.extend_from_slice(events);
            merged.sort_by(MidiEvent::cmp_time);
        }

        Ok(MidiTrack {
            name,
            notes,
            control_change,
            pitchwheel: merge_events(&first.pitchwheel, &second.pitchwheel),
            aftertouch: merge_events(&first.aftertouch, &second.aftertouch),
        })
    }

    /// Check that every time in the track is usable
    fn validate(&self) -> Result<()> {
        let invalid = |time: f64| MidiError::InvalidTiming {
            track: self.name.clone(),
            time,
        };

        for note in &self.notes {
            if !note.time_on.is_finite() || note.time_on < 0.0 {
                return Err(invalid(note.time_on));
            }
            if !note.time_off.is_finite() || (note.is_resolved() && note.time_off < note.time_on) {
                return Err(invalid(note.time_off));
            }
        }

        let events = self
            .control_change
            .values()
            .flatten()
            .chain(&self.pitchwheel)
            .chain(&self.aftertouch);
        for event in events {
            if !event.time.is_finite() {
                return Err(invalid(event.time));
            }
        }

        Ok(())
    }
}

fn merge_events(first: &[MidiEvent], second: &[MidiEvent]) -> Vec<MidiEvent> {
    let mut events = [first, second].concat();
    events.sort_by(MidiEvent::cmp_time);
    events
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T], indent: &str) -> fmt::Result {
    for item in items {
        writeln!(f, "{}{},", indent, item)?;
    }
    Ok(())
}

impl fmt::Display for MidiTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MidiTrack(name='{}',", self.name)?;
        writeln!(f, "notes=[")?;
        write_list(f, &self.notes, "\t")?;
        writeln!(f, "],")?;
        writeln!(f, "controlChange={{")?;
        for (control, events) in &self.control_change {
            writeln!(f, "\tcontrol_number={}:", control)?;
            write_list(f, events, "\t\t")?;
        }
        writeln!(f, "}},")?;
        writeln!(f, "aftertouch=[")?;
        write_list(f, &self.aftertouch, "\t")?;
        writeln!(f, "],")?;
        writeln!(f, "pitchwheel=[")?;
        write_list(f, &self.pitchwheel, "\t")?;
        write!(f, "])")
    }
}
