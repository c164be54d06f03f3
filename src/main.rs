// src/main.rs

use midi_animator::config::AppConfig;
use midi_animator::midi::{note_to_name, MidiFile, MidiTrack, SmfFormat};
use serde::Serialize;
use std::process::ExitCode;

const CONFIG_FILE: &str = "midi-animator.json";
const PROGRAM_NAME: &str = "midi-animator";

/// Everything printed for one file
#[derive(Debug, Serialize)]
struct FileReport<T> {
    format: SmfFormat,
    ticks_per_beat: u16,
    tracks: Vec<T>,
}

/// Compact per-track view printed in summary mode
#[derive(Debug, Serialize)]
struct TrackSummary<'a> {
    name: &'a str,
    notes: usize,
    used_notes: Vec<String>,
    first_note_on: Option<f64>,
    last_note_off: Option<f64>,
    control_changes: Vec<u8>,
    pitchwheel_events: usize,
    aftertouch_events: usize,
}

impl<'a> TrackSummary<'a> {
    fn new(track: &'a MidiTrack) -> Self {
        TrackSummary {
            name: &track.name,
            notes: track.notes.len(),
            used_notes: track.all_used_notes().into_iter().map(note_to_name).collect(),
            first_note_on: track.notes.first().map(|note| note.time_on),
            last_note_off: track
                .notes
                .iter()
                .filter(|note| note.is_resolved())
                .map(|note| note.time_off)
                .reduce(f64::max),
            control_changes: track.control_change.keys().copied().collect(),
            pitchwheel_events: track.pitchwheel.len(),
            aftertouch_events: track.aftertouch.len(),
        }
    }
}

fn main() -> ExitCode {
    // Load or create config
    let config = AppConfig::load_from_file(CONFIG_FILE).unwrap_or_else(|_| {
        let default = AppConfig::default();
        if let Err(e) = default.save_to_file(CONFIG_FILE) {
            eprintln!("Failed to save default config: {}", e);
        }
        default
    });

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.filter.as_str()))
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let Some(path) = args.get(1) else {
        eprintln!("Usage: {} <file.mid> [track name ...]", program_name(&args));
        return ExitCode::FAILURE;
    };
    let wanted = &args[2..];

    let file = match MidiFile::open(path) {
        Ok(file) => file,
        Err(e) => {
            log::error!("Failed to load MIDI file: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let format = file.format();
    let ticks_per_beat = file.ticks_per_beat();

    let tracks: Vec<MidiTrack> = if wanted.is_empty() {
        file.into_tracks()
    } else {
        wanted
            .iter()
            .filter_map(|name| match file.find_track(name) {
                Ok(track) => Some(track.clone()),
                Err(e) => {
                    log::error!("{}", e);
                    None
                }
            })
            .collect()
    };

    let output = if config.output.summary_only {
        let report = FileReport {
            format,
            ticks_per_beat,
            tracks: tracks.iter().map(TrackSummary::new).collect(),
        };
        render(&report, config.output.pretty)
    } else {
        let report = FileReport {
            format,
            ticks_per_beat,
            tracks,
        };
        render(&report, config.output.pretty)
    };

    match output {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to serialize tracks: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn program_name(args: &[String]) -> &str {
    args.first().map_or(PROGRAM_NAME, String::as_str)
}

fn render<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
