// src/midi/test_support.rs

//! In-memory Standard MIDI Files for tests, encoded by `midly`.

use midly::num::{u14, u15, u24, u28, u4, u7};
use midly::{Format, Fps, Header, MetaMessage, MidiMessage, PitchBend, Smf, Timing, Track, TrackEvent, TrackEventKind};

fn channel(channel: u8) -> u4 {
    u4::try_from(channel).unwrap_or_else(|| panic!("channel {} out of range", channel))
}

fn data(value: u8) -> u7 {
    u7::try_from(value).unwrap_or_else(|| panic!("data byte {} out of range", value))
}

/// Events of one track chunk
#[derive(Debug, Clone, Default)]
pub struct TrackBuilder {
    events: Track<'static>,
}

impl TrackBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, delta: u32, kind: TrackEventKind<'static>) -> Self {
        let delta = u28::try_from(delta).unwrap_or_else(|| panic!("delta {} out of range", delta));
        self.events.push(TrackEvent { delta, kind });
        self
    }

    fn midi(self, delta: u32, ch: u8, message: MidiMessage) -> Self {
        self.push(
            delta,
            TrackEventKind::Midi {
                channel: channel(ch),
                message,
            },
        )
    }

    pub fn note_on(self, delta: u32, ch: u8, note: u8, velocity: u8) -> Self {
        self.midi(
            delta,
            ch,
            MidiMessage::NoteOn {
                key: data(note),
                vel: data(velocity),
            },
        )
    }

    pub fn note_off(self, delta: u32, ch: u8, note: u8) -> Self {
        self.midi(
            delta,
            ch,
            MidiMessage::NoteOff {
                key: data(note),
                vel: data(64),
            },
        )
    }

    pub fn control_change(self, delta: u32, ch: u8, control: u8, value: u8) -> Self {
        self.midi(
            delta,
            ch,
            MidiMessage::Controller {
                controller: data(control),
                value: data(value),
            },
        )
    }

    pub fn program_change(self, delta: u32, ch: u8, program: u8) -> Self {
        self.midi(delta, ch, MidiMessage::ProgramChange { program: data(program) })
    }

    pub fn channel_pressure(self, delta: u32, ch: u8, value: u8) -> Self {
        self.midi(delta, ch, MidiMessage::ChannelAftertouch { vel: data(value) })
    }

    /// `raw` is the unsigned 14-bit bend, 0x2000 being centre
    pub fn pitch_wheel(self, delta: u32, ch: u8, raw: u16) -> Self {
        let bend = u14::try_from(raw).unwrap_or_else(|| panic!("pitch bend {} out of range", raw));
        self.midi(delta, ch, MidiMessage::PitchBend { bend: PitchBend(bend) })
    }

    pub fn tempo(self, delta: u32, tempo: u32) -> Self {
        let tempo = u24::try_from(tempo).unwrap_or_else(|| panic!("tempo {} out of range", tempo));
        self.push(delta, TrackEventKind::Meta(MetaMessage::Tempo(tempo)))
    }

    pub fn track_name(self, delta: u32, name: &'static str) -> Self {
        self.push(delta, TrackEventKind::Meta(MetaMessage::TrackName(name.as_bytes())))
    }

    fn finish(self) -> Track<'static> {
        self.push(0, TrackEventKind::Meta(MetaMessage::EndOfTrack)).events
    }
}

/// Header plus track chunks; every track gets an end-of-track event
#[derive(Debug, Clone)]
pub struct SmfBuilder {
    header: Header,
    tracks: Vec<TrackBuilder>,
}

impl SmfBuilder {
    pub fn new(format: Format, ticks_per_beat: u16) -> Self {
        let ticks = u15::try_from(ticks_per_beat)
            .unwrap_or_else(|| panic!("ticks per beat {} out of range", ticks_per_beat));
        Self::with_timing(format, Timing::Metrical(ticks))
    }

    /// SMPTE timing: frames per second and ticks per frame
    pub fn timecode(format: Format, fps: Fps, ticks_per_frame: u8) -> Self {
        Self::with_timing(format, Timing::Timecode(fps, ticks_per_frame))
    }

    fn with_timing(format: Format, timing: Timing) -> Self {
        SmfBuilder {
            header: Header::new(format, timing),
            tracks: Vec::new(),
        }
    }

    pub fn track(mut self, track: TrackBuilder) -> Self {
        self.tracks.push(track);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut smf = Smf::new(self.header);
        smf.tracks = self.tracks.into_iter().map(TrackBuilder::finish).collect();

        let mut bytes = Vec::new();
        smf.write_std(&mut bytes).expect("in-memory SMF write");
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_file_decodes() {
        let bytes = SmfBuilder::new(Format::Parallel, 480)
            .track(TrackBuilder::new().track_name(0, "Lead").note_on(96, 2, 60, 100))
            .build();

        let smf = Smf::parse(&bytes).unwrap();
        assert_eq!(smf.header.format, Format::Parallel);
        assert_eq!(smf.header.timing, Timing::Metrical(u15::new(480)));
        assert_eq!(smf.tracks.len(), 1);
        let track = &smf.tracks[0];
        assert_eq!(track.len(), 3);
        assert_eq!(track[1].delta.as_int(), 96);
        assert_eq!(track[2].kind, TrackEventKind::Meta(MetaMessage::EndOfTrack));
    }

    #[test]
    fn test_long_track_name_survives() {
        let name: &'static str = Box::leak("x".repeat(300).into_boxed_str());
        let bytes = SmfBuilder::new(Format::Parallel, 96)
            .track(TrackBuilder::new().track_name(0, name))
            .build();

        let smf = Smf::parse(&bytes).unwrap();
        assert_eq!(
            smf.tracks[0][0].kind,
            TrackEventKind::Meta(MetaMessage::TrackName(name.as_bytes()))
        );
    }

    #[test]
    #[should_panic(expected = "channel 32 out of range")]
    fn test_out_of_range_channel_panics() {
        let _ = TrackBuilder::new().program_change(0, 32, 0);
    }
}
