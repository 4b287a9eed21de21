//! Persisted chart entities: notes, timing metadata and the song wrapper.
//!
//! These records never carry gameplay state; see
//! [`ActiveNote`](crate::models::engine::ActiveNote) for that.

use crate::models::engine::constants::{
    DEDUP_TOLERANCE_MS, DEFAULT_BPM, DEFAULT_SCROLL_SPEED, MIN_BPM, MIN_SCROLL_SPEED,
};
use std::path::PathBuf;

/// A single placed note. `duration` makes it a hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub lane: usize,
    pub time: i64,
    pub duration: Option<i64>,
}

impl Note {
    pub fn tap(lane: usize, time: i64) -> Self {
        Self {
            lane,
            time,
            duration: None,
        }
    }

    pub fn hold(lane: usize, time: i64, duration: i64) -> Self {
        Self {
            lane,
            time,
            duration: Some(duration),
        }
    }

    pub fn end_time(&self) -> i64 {
        self.time + self.duration.unwrap_or(0)
    }

    /// Identity used by editor selections.
    pub fn key(&self) -> NoteKey {
        NoteKey {
            lane: self.lane,
            time: self.time,
        }
    }
}

/// Lane and time pair identifying a note inside one chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoteKey {
    pub lane: usize,
    pub time: i64,
}

/// Scalar timing metadata of a chart.
///
/// The setters clamp out-of-range edits so that no zero or negative value
/// can reach the timing divisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartTiming {
    bpm: f64,
    scroll_speed: f64,
    pub use_custom_start: bool,
    start_offset_ms: i64,
}

impl ChartTiming {
    pub fn new(bpm: f64, scroll_speed: f64) -> Self {
        let mut timing = Self::default();
        timing.set_bpm(bpm);
        timing.set_scroll_speed(scroll_speed);
        timing
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn scroll_speed(&self) -> f64 {
        self.scroll_speed
    }

    pub fn start_offset_ms(&self) -> i64 {
        self.start_offset_ms
    }

    pub fn set_bpm(&mut self, bpm: f64) {
        self.bpm = if bpm.is_finite() { bpm.max(MIN_BPM) } else { DEFAULT_BPM };
    }

    pub fn set_scroll_speed(&mut self, speed: f64) {
        self.scroll_speed = if speed.is_finite() {
            speed.max(MIN_SCROLL_SPEED)
        } else {
            DEFAULT_SCROLL_SPEED
        };
    }

    pub fn set_start_offset_ms(&mut self, offset_ms: i64) {
        self.start_offset_ms = offset_ms.max(0);
    }
}

impl Default for ChartTiming {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            scroll_speed: DEFAULT_SCROLL_SPEED,
            use_custom_start: false,
            start_offset_ms: 0,
        }
    }
}

/// Notes sorted ascending by time, plus timing metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chart {
    notes: Vec<Note>,
    pub timing: ChartTiming,
}

impl Chart {
    /// Builds a chart from notes in any order.
    #[cfg(test)]
    pub fn from_notes(notes: Vec<Note>) -> Self {
        Self::with_timing(notes, ChartTiming::default())
    }

    pub fn with_timing(mut notes: Vec<Note>, timing: ChartTiming) -> Self {
        // Stable so equal times keep their file order.
        notes.sort_by_key(|n| n.time);
        Self { notes, timing }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn first_time(&self) -> Option<i64> {
        self.notes.first().map(|n| n.time)
    }

    pub fn last_time(&self) -> Option<i64> {
        self.notes.last().map(|n| n.time)
    }

    /// True when `lane` already holds a note strictly closer than `tolerance_ms`.
    pub fn has_note_near(&self, lane: usize, time: i64, tolerance_ms: i64) -> bool {
        self.notes
            .iter()
            .any(|n| n.lane == lane && (n.time - time).abs() < tolerance_ms)
    }

    /// Inserts `note` unless it collides with an existing one.
    ///
    /// Negative times are clamped to 0. Returns whether the chart changed.
    pub fn insert(&mut self, mut note: Note) -> bool {
        note.time = note.time.max(0);
        if self.has_note_near(note.lane, note.time, DEDUP_TOLERANCE_MS) {
            return false;
        }
        let at = self.notes.partition_point(|n| n.time <= note.time);
        self.notes.insert(at, note);
        true
    }

    /// Removes every note of `lane` strictly within `tolerance_ms` of `time`.
    pub fn remove_near(&mut self, lane: usize, time: i64, tolerance_ms: i64) -> usize {
        let before = self.notes.len();
        self.notes
            .retain(|n| !(n.lane == lane && (n.time - time).abs() < tolerance_ms));
        before - self.notes.len()
    }

    /// Removes the notes whose key matches `pred`. Order is preserved.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&Note) -> bool) -> usize {
        let before = self.notes.len();
        self.notes.retain(|n| !pred(n));
        before - self.notes.len()
    }

    pub fn contains_key(&self, key: NoteKey) -> bool {
        self.notes.iter().any(|n| n.key() == key)
    }

    #[cfg(test)]
    pub fn is_sorted(&self) -> bool {
        self.notes.windows(2).all(|w| w[0].time <= w[1].time)
    }
}

/// A chart together with its descriptive fields and on-disk location.
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub title: String,
    pub artist: String,
    /// Audio filename relative to `folder`.
    pub audio_file: String,
    pub chart: Chart,
    /// Folder holding `chart.json`; `None` for unsaved songs.
    pub folder: Option<PathBuf>,
}

impl Song {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: "Unknown".to_string(),
            audio_file: String::new(),
            chart: Chart::default(),
            folder: None,
        }
    }

    /// Absolute path of the audio track, when one is configured.
    pub fn audio_path(&self) -> Option<PathBuf> {
        if self.audio_file.is_empty() {
            return None;
        }
        Some(match &self.folder {
            Some(folder) => folder.join(&self.audio_file),
            None => PathBuf::from(&self.audio_file),
        })
    }
}
