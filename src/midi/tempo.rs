// src/midi/tempo.rs

//! Tick to second conversion under a changing tempo.

use super::message::{Message, MessageKind};
use serde::Serialize;

/// Tempo in effect before any tempo meta-message (120 BPM)
pub const DEFAULT_TEMPO: u32 = 500_000;

/// Convert a tick delta to seconds at the given tempo (microseconds per beat)
pub fn ticks_to_seconds(ticks: u32, ticks_per_beat: u16, tempo: u32) -> f64 {
    ticks as f64 * tempo as f64 / (ticks_per_beat as f64 * 1_000_000.0)
}

/// A tempo change at an absolute time
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TempoPoint {
    /// Seconds from the start of the file
    pub time: f64,
    /// Microseconds per beat
    pub tempo: u32,
}

/// Ordered tempo changes of a whole file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TempoMap {
    points: Vec<TempoPoint>,
}

impl TempoMap {
    /// Build from points already in ascending time order
    pub fn from_points(points: Vec<TempoPoint>) -> Self {
        TempoMap { points }
    }

    /// Scan a merged, chronological message stream for tempo changes
    pub fn build(messages: &[Message], ticks_per_beat: u16) -> Self {
        let mut points = Vec::new();
        let mut time = 0.0;
        let mut tempo = DEFAULT_TEMPO;

        for message in messages {
            time += ticks_to_seconds(message.delta, ticks_per_beat, tempo);
            if let MessageKind::SetTempo(new_tempo) = message.kind {
                tempo = new_tempo;
                points.push(TempoPoint { time, tempo });
                log::debug!("Tempo change at {:.4}s: {} us/beat", time, tempo);
            }
        }

        log::debug!("Tempo map built with {} entries", points.len());
        TempoMap { points }
    }

    pub fn points(&self) -> &[TempoPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Tempo in effect at `time`: the latest point at or before it.
    ///
    /// Before the first point the default tempo applies.
    pub fn tempo_at(&self, time: f64) -> u32 {
        let preceding = self.points.partition_point(|point| point.time <= time);
        match preceding {
            0 => DEFAULT_TEMPO,
            n => self.points[n - 1].tempo,
        }
    }
}

/// How the resolver picks up tempo changes
#[derive(Debug, Clone)]
pub enum TempoSource {
    /// Type 0: tempo meta-messages are applied as they are seen
    Running,
    /// Type 1: tempo is looked up from a prebuilt map after each advance
    Map(TempoMap),
}

/// Accumulates tick deltas into absolute seconds
#[derive(Debug, Clone)]
pub struct TimeResolver {
    ticks_per_beat: u16,
    seconds: f64,
    tempo: u32,
    source: TempoSource,
}

impl TimeResolver {
    pub fn new(ticks_per_beat: u16, source: TempoSource) -> Self {
        let tempo = match &source {
            TempoSource::Running => DEFAULT_TEMPO,
            TempoSource::Map(map) => map.tempo_at(0.0),
        };
        TimeResolver {
            ticks_per_beat,
            seconds: 0.0,
            tempo,
            source,
        }
    }

    /// Running-tempo resolver for type 0 files
    pub fn running(ticks_per_beat: u16) -> Self {
        Self::new(ticks_per_beat, TempoSource::Running)
    }

    /// Map-driven resolver for type 1 files
    pub fn with_map(ticks_per_beat: u16, map: TempoMap) -> Self {
        Self::new(ticks_per_beat, TempoSource::Map(map))
    }

    /// Advance by `delta` ticks at the current tempo and return the new absolute time
    pub fn advance(&mut self, delta: u32) -> f64 {
        self.seconds += ticks_to_seconds(delta, self.ticks_per_beat, self.tempo);
        if let TempoSource::Map(map) = &self.source {
            self.tempo = map.tempo_at(self.seconds);
        }
        self.seconds
    }

    /// Handle a tempo meta-message; only a running resolver changes tempo here
    pub fn set_tempo(&mut self, tempo: u32) {
        if let TempoSource::Running = self.source {
            self.tempo = tempo;
        }
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    pub fn tempo(&self) -> u32 {
        self.tempo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_step_map() -> TempoMap {
        TempoMap::from_points(vec![
            TempoPoint { time: 0.0, tempo: 500_000 },
            TempoPoint { time: 2.0, tempo: 250_000 },
        ])
    }

    #[test]
    fn test_ticks_to_seconds() {
        assert_eq!(ticks_to_seconds(480, 480, 500_000), 0.5);
        assert_eq!(ticks_to_seconds(960, 480, 250_000), 0.5);
        assert_eq!(ticks_to_seconds(0, 96, 500_000), 0.0);
    }

    #[test]
    fn test_tempo_before_change_uses_previous_entry() {
        let mut resolver = TimeResolver::with_map(480, two_step_map());
        resolver.advance(1440);
        assert_eq!(resolver.tempo(), 500_000);

        let before = resolver.seconds();
        let after = resolver.advance(480);
        assert!((after - before - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_tempo_after_change_uses_new_entry() {
        let mut resolver = TimeResolver::with_map(480, two_step_map());
        resolver.advance(1920);
        assert!((resolver.seconds() - 2.0).abs() < 1e-12);
        assert_eq!(resolver.tempo(), 250_000);

        resolver.advance(192);
        assert!((resolver.seconds() - 2.1).abs() < 1e-12);

        let before = resolver.seconds();
        let after = resolver.advance(480);
        assert!((after - before - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_lookup_before_first_change_uses_default() {
        let map = TempoMap::from_points(vec![TempoPoint { time: 1.0, tempo: 1_000_000 }]);
        assert_eq!(map.tempo_at(0.0), DEFAULT_TEMPO);
        assert_eq!(map.tempo_at(0.999), DEFAULT_TEMPO);
        assert_eq!(map.tempo_at(1.0), 1_000_000);
        assert_eq!(map.tempo_at(100.0), 1_000_000);
        assert_eq!(TempoMap::default().tempo_at(5.0), DEFAULT_TEMPO);
    }

    #[test]
    fn test_lookup_takes_last_of_simultaneous_changes() {
        let map = TempoMap::from_points(vec![
            TempoPoint { time: 0.0, tempo: 400_000 },
            TempoPoint { time: 0.0, tempo: 600_000 },
        ]);
        assert_eq!(map.tempo_at(0.0), 600_000);
    }

    #[test]
    fn test_running_resolver_applies_tempo_in_place() {
        let mut resolver = TimeResolver::running(96);
        assert_eq!(resolver.advance(96), 0.5);
        resolver.set_tempo(1_000_000);
        assert_eq!(resolver.advance(96), 1.5);
    }

    #[test]
    fn test_map_resolver_ignores_inline_tempo() {
        let mut resolver = TimeResolver::with_map(96, TempoMap::default());
        resolver.set_tempo(1_000_000);
        assert_eq!(resolver.advance(96), 0.5);
    }

    #[test]
    fn test_build_from_merged_stream() {
        let messages = vec![
            Message { track: 0, delta: 0, kind: MessageKind::SetTempo(600_000) },
            Message { track: 1, delta: 480, kind: MessageKind::EndOfTrack },
            Message { track: 0, delta: 480, kind: MessageKind::SetTempo(300_000) },
        ];
        let map = TempoMap::build(&messages, 480);
        assert_eq!(
            map.points(),
            &[
                TempoPoint { time: 0.0, tempo: 600_000 },
                TempoPoint { time: 1.2, tempo: 300_000 },
            ]
        );
    }
}
