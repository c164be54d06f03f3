// src/midi/message.rs

//! Owned view of the events decoded by `midly`, and chronological merging
//! of a file's track chunks.

use midly::{MetaMessage, MidiMessage, TrackEvent, TrackEventKind};

/// Every kind of message the parser reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum MessageKind {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8, velocity: u8 },
    ControlChange { channel: u8, control: u8, value: u8 },
    /// Signed bend, centre 0, -8192..=8191
    PitchWheel { channel: u8, value: i16 },
    /// Channel pressure
    Aftertouch { channel: u8, value: u8 },
    ProgramChange { channel: u8, program: u8 },
    /// Microseconds per beat
    SetTempo(u32),
    TrackName(String),
    EndOfTrack,
    /// Anything else; `channel` is set for channel voice messages
    Other { channel: Option<u8> },
}

impl MessageKind {
    /// Channel of a channel voice message, `None` for meta and sysex messages
    pub fn channel(&self) -> Option<u8> {
        match *self {
            MessageKind::NoteOn { channel, .. }
            | MessageKind::NoteOff { channel, .. }
            | MessageKind::ControlChange { channel, .. }
            | MessageKind::PitchWheel { channel, .. }
            | MessageKind::Aftertouch { channel, .. }
            | MessageKind::ProgramChange { channel, .. } => Some(channel),
            MessageKind::Other { channel, .. } => channel,
            MessageKind::SetTempo(_) | MessageKind::TrackName(_) | MessageKind::EndOfTrack => None,
        }
    }
}

impl<'a> From<&TrackEventKind<'a>> for MessageKind {
    fn from(kind: &TrackEventKind<'a>) -> Self {
        match *kind {
            TrackEventKind::Midi { channel, message } => {
                let channel = channel.as_int();
                match message {
                    MidiMessage::NoteOn { key, vel } => MessageKind::NoteOn {
                        channel,
                        note: key.as_int(),
                        velocity: vel.as_int(),
                    },
                    MidiMessage::NoteOff { key, vel } => MessageKind::NoteOff {
                        channel,
                        note: key.as_int(),
                        velocity: vel.as_int(),
                    },
                    MidiMessage::Controller { controller, value } => MessageKind::ControlChange {
                        channel,
                        control: controller.as_int(),
                        value: value.as_int(),
                    },
                    MidiMessage::PitchBend { bend } => MessageKind::PitchWheel {
                        channel,
                        value: (bend.0.as_int() as i32 - 0x2000) as i16,
                    },
                    MidiMessage::ChannelAftertouch { vel } => MessageKind::Aftertouch {
                        channel,
                        value: vel.as_int(),
                    },
                    MidiMessage::ProgramChange { program } => MessageKind::ProgramChange {
                        channel,
                        program: program.as_int(),
                    },
                    MidiMessage::Aftertouch { .. } => MessageKind::Other { channel: Some(channel) },
                }
            }
            TrackEventKind::Meta(MetaMessage::Tempo(tempo)) => MessageKind::SetTempo(tempo.as_int()),
            TrackEventKind::Meta(MetaMessage::TrackName(name)) => {
                MessageKind::TrackName(String::from_utf8_lossy(name).into_owned())
            }
            TrackEventKind::Meta(MetaMessage::EndOfTrack) => MessageKind::EndOfTrack,
            TrackEventKind::Meta(_) | TrackEventKind::SysEx(_) | TrackEventKind::Escape(_) => {
                MessageKind::Other { channel: None }
            }
        }
    }
}

/// A message from the merged stream, tagged with the chunk it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Index of the source track chunk
    pub track: usize,
    /// Ticks since the previous message of the merged stream
    pub delta: u32,
    pub kind: MessageKind,
}

/// Merge track chunks into one chronological stream.
///
/// Messages are ordered by absolute tick; ties keep chunk order and then
/// the order within the chunk.
pub fn merge_tracks(tracks: &[Vec<TrackEvent<'_>>]) -> Vec<Message> {
    let mut timed: Vec<(u64, usize, MessageKind)> = Vec::new();

    for (index, track) in tracks.iter().enumerate() {
        let mut tick: u64 = 0;
        for event in track {
            tick += event.delta.as_int() as u64;
            timed.push((tick, index, MessageKind::from(&event.kind)));
        }
    }

    // stable, so in-chunk order survives ties
    timed.sort_by_key(|(tick, index, _)| (*tick, *index));

    let mut last_tick: u64 = 0;
    timed
        .into_iter()
        .map(|(tick, track, kind)| {
            let delta = (tick - last_tick) as u32;
            last_tick = tick;
            Message { track, delta, kind }
        })
        .collect()
}
