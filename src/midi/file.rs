// src/midi/file.rs

use super::parser::{parse_smf, SmfFormat};
use super::tempo::TempoMap;
use super::track::MidiTrack;
use crate::error::{MidiError, Result};
use midly::Smf;
use std::fmt;
use std::path::Path;

/// A parsed Standard MIDI File: its tracks with notes and events in seconds
#[derive(Debug, Clone)]
pub struct MidiFile {
    format: SmfFormat,
    ticks_per_beat: u16,
    tempo_map: Option<TempoMap>,
    tracks: Vec<MidiTrack>,
}

impl MidiFile {
    /// Parse a complete SMF held in memory
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let smf = Smf::parse(bytes)?;
        log::info!(
            "Parsing MIDI file: {:?}, {} chunk(s)",
            smf.header.format,
            smf.tracks.len()
        );

        let parsed = parse_smf(&smf)?;
        log::info!(
            "Loaded type {} MIDI file at {} ticks per beat with {} track(s)",
            parsed.format.as_type(),
            parsed.ticks_per_beat,
            parsed.tracks.len()
        );

        Ok(MidiFile {
            format: parsed.format,
            ticks_per_beat: parsed.ticks_per_beat,
            tempo_map: parsed.tempo_map,
            tracks: parsed.tracks,
        })
    }

    /// Read a whole file from disk and parse it
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading MIDI file: {}", path.display());
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn tracks(&self) -> &[MidiTrack] {
        &self.tracks
    }

    pub fn into_tracks(self) -> Vec<MidiTrack> {
        self.tracks
    }

    pub fn format(&self) -> SmfFormat {
        self.format
    }

    pub fn ticks_per_beat(&self) -> u16 {
        self.ticks_per_beat
    }

    /// Tempo changes of a type 1 file
    pub fn tempo_map(&self) -> Option<&TempoMap> {
        self.tempo_map.as_ref()
    }

    /// First track with the given name
    pub fn find_track(&self, name: &str) -> Result<&MidiTrack> {
        self.tracks
            .iter()
            .find(|track| track.name == name)
            .ok_or_else(|| MidiError::TrackNotFound(name.to_string()))
    }

    pub fn list_track_names(&self) -> Vec<String> {
        self.tracks.iter().map(|track| track.name.clone()).collect()
    }

    /// Merge two tracks into a new one, see [`MidiTrack::merge`]
    pub fn merge_tracks(&self, first: &MidiTrack, second: &MidiTrack, name: Option<&str>) -> Result<MidiTrack> {
        MidiTrack::merge(first, second, name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MidiTrack> {
        self.tracks.iter()
    }
}

impl<'a> IntoIterator for &'a MidiFile {
    type Item = &'a MidiTrack;
    type IntoIter = std::slice::Iter<'a, MidiTrack>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter()
    }
}

impl fmt::Display for MidiFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, track) in self.tracks.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", track)?;
        }
        Ok(())
    }
}
