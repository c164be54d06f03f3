// src/midi/parser.rs

//! Single pass over the merged message stream that routes every message to
//! its track, resolves times and pairs notes.

use super::gm::program_track_name;
use super::message::{merge_tracks, Message, MessageKind};
use super::pairing::NoteTable;
use super::tempo::{TempoMap, TimeResolver};
use super::track::MidiTrack;
use crate::error::{MidiError, Result};
use midly::{Format, Smf, Timing};
use serde::Serialize;

/// Number of MIDI channels, and of candidate tracks in a type 0 file
pub const CHANNEL_COUNT: usize = 16;

/// Supported Standard MIDI File layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SmfFormat {
    /// Type 0: one chunk, tracks are split by channel
    SingleTrack,
    /// Type 1: one track per chunk
    Parallel,
}

impl SmfFormat {
    pub fn from_header(format: Format) -> Result<Self> {
        match format {
            Format::SingleTrack => Ok(SmfFormat::SingleTrack),
            Format::Parallel => Ok(SmfFormat::Parallel),
            Format::Sequential => Err(MidiError::UnsupportedFormat),
        }
    }

    /// The SMF type number, 0 or 1
    pub fn as_type(self) -> u8 {
        match self {
            SmfFormat::SingleTrack => 0,
            SmfFormat::Parallel => 1,
        }
    }
}

/// Result of parsing a decoded file
#[derive(Debug, Clone)]
pub struct ParsedSmf {
    pub format: SmfFormat,
    pub ticks_per_beat: u16,
    /// Tempo changes, only built for type 1 files
    pub tempo_map: Option<TempoMap>,
    /// Non-empty tracks with their notes sorted by onset
    pub tracks: Vec<MidiTrack>,
}

/// Parse a decoded SMF into tracks
pub fn parse_smf(smf: &Smf<'_>) -> Result<ParsedSmf> {
    let format = SmfFormat::from_header(smf.header.format)?;
    let ticks_per_beat = match smf.header.timing {
        Timing::Metrical(ticks) => ticks.as_int(),
        Timing::Timecode(..) => return Err(MidiError::UnsupportedTiming),
    };

    let messages = merge_tracks(&smf.tracks);
    let tempo_map = match format {
        SmfFormat::SingleTrack => None,
        SmfFormat::Parallel => Some(TempoMap::build(&messages, ticks_per_beat)),
    };

    let resolver = match &tempo_map {
        None => TimeResolver::running(ticks_per_beat),
        Some(map) => TimeResolver::with_map(ticks_per_beat, map.clone()),
    };

    let candidates = route(&messages, format, smf.tracks.len(), resolver)?;
    let tracks = drop_empty(candidates);

    Ok(ParsedSmf {
        format,
        ticks_per_beat,
        tempo_map,
        tracks,
    })
}

/// Run the routing pass and return every candidate track, empty ones included
pub fn route(
    messages: &[Message],
    format: SmfFormat,
    chunk_count: usize,
    resolver: TimeResolver,
) -> Result<Vec<MidiTrack>> {
    let state = ParserState::new(format, chunk_count, resolver, messages);
    let state = messages.iter().try_fold(state, ParserState::step)?;
    Ok(state.finish())
}

fn drop_empty(tracks: Vec<MidiTrack>) -> Vec<MidiTrack> {
    tracks
        .into_iter()
        .filter(|track| {
            if track.is_empty() {
                log::debug!("Dropping empty track '{}'", track.name);
            }
            !track.is_empty()
        })
        .collect()
}

fn default_track_name(channel: usize) -> String {
    format!("Track {}", channel + 1)
}

/// Everything the pass carries from one message to the next
struct ParserState {
    format: SmfFormat,
    resolver: TimeResolver,
    tracks: Vec<MidiTrack>,
    /// Open notes per track, dropped in `finish`
    tables: Vec<NoteTable>,
    /// Track selected by the last channel message (type 0)
    current: usize,
}

impl ParserState {
    fn new(format: SmfFormat, chunk_count: usize, resolver: TimeResolver, messages: &[Message]) -> Self {
        let track_count = match format {
            SmfFormat::SingleTrack => CHANNEL_COUNT,
            SmfFormat::Parallel => chunk_count,
        };

        let mut tracks: Vec<MidiTrack> = (0..track_count).map(|_| MidiTrack::new("")).collect();
        let tables = (0..track_count).map(|_| NoteTable::new()).collect();

        // A chunk's declared name is its first track name message. In a type 0
        // file it lands on the channel selected before any message, channel 0.
        let mut named = vec![false; chunk_count];
        for message in messages {
            if let MessageKind::TrackName(name) = &message.kind {
                if named[message.track] {
                    continue;
                }
                named[message.track] = true;
                let target = match format {
                    SmfFormat::SingleTrack => 0,
                    SmfFormat::Parallel => message.track,
                };
                if !name.is_empty() && tracks[target].name.is_empty() {
                    tracks[target].name = name.clone();
                }
            }
        }

        ParserState {
            format,
            resolver,
            tracks,
            tables,
            current: 0,
        }
    }

    fn step(mut self, message: &Message) -> Result<Self> {
        let time = self.resolver.advance(message.delta);

        let target = match self.format {
            SmfFormat::SingleTrack => {
                if let Some(channel) = message.kind.channel() {
                    self.current = channel as usize;
                }
                self.current
            }
            SmfFormat::Parallel => message.track,
        };

        let track = &mut self.tracks[target];
        let table = &mut self.tables[target];

        match message.kind {
            MessageKind::NoteOn {
                channel,
                note,
                velocity,
            } if velocity > 0 => table.note_on(track, channel, note, velocity, time),
            MessageKind::NoteOn { channel, note, .. } | MessageKind::NoteOff { channel, note, .. } => {
                table.note_off(track, channel, note, time)?
            }
            MessageKind::ControlChange {
                channel,
                control,
                value,
            } => track.add_control_change(control, channel, value as i32, time),
            MessageKind::PitchWheel { channel, value } => track.add_pitchwheel(channel, value as i32, time),
            MessageKind::Aftertouch { channel, value } => track.add_aftertouch(channel, value as i32, time),
            MessageKind::ProgramChange { channel, program } => {
                let unnamed = track.name.is_empty()
                    || (self.format == SmfFormat::SingleTrack && track.name == default_track_name(target));
                if unnamed {
                    track.name = program_track_name(channel, program)?.to_string();
                }
            }
            MessageKind::SetTempo(tempo) => self.resolver.set_tempo(tempo),
            MessageKind::EndOfTrack => {
                if self.format == SmfFormat::Parallel {
                    log::debug!(
                        "End of track chunk {} ('{}') at {:.4}s",
                        message.track,
                        track.name,
                        time
                    );
                }
            }
            MessageKind::TrackName(_) | MessageKind::Other { .. } => {}
        }

        Ok(self)
    }

    fn finish(self) -> Vec<MidiTrack> {
        let format = self.format;

        self.tracks
            .into_iter()
            .zip(self.tables)
            .enumerate()
            .map(|(index, (mut track, table))| {
                let pending = table.pending();
                if pending > 0 {
                    log::warn!(
                        "Track '{}' has {} note-on message(s) without a note-off",
                        track.name,
                        pending
                    );
                }
                if format == SmfFormat::SingleTrack && track.name.is_empty() {
                    track.name = default_track_name(index);
                }
                track.sort_notes();
                track
            })
            .collect()
    }
}
