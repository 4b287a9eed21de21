//! Render snapshots for inter-thread communication.
//!
//! Snapshots are immutable captures of state sent from the logic thread
//! to the window thread. Presentation reads them and never feeds back.

use crate::models::engine::NoteVisual;
use crate::models::stats::{JudgementCounts, SessionResult};
use crate::state::game::{JudgementBanner, SessionPhase};

/// High-level render state representing the current mode.
#[derive(Clone, Debug)]
pub enum RenderState {
    /// Initial empty state.
    Empty,
    /// Active gameplay or its end screen.
    Gameplay(GameplaySnapshot),
    /// Chart editor.
    Editor(EditorSnapshot),
    /// The logic thread has shut down; close the window.
    Exit,
}

impl RenderState {
    /// One-line description, used as the window title.
    pub fn summary(&self) -> String {
        match self {
            RenderState::Empty => "tapline".to_string(),
            RenderState::Gameplay(game) => game.summary(),
            RenderState::Editor(editor) => editor.summary(),
            RenderState::Exit => "tapline - closing".to_string(),
        }
    }
}

/// A note as it should be drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoteSprite {
    pub lane: usize,
    pub time: i64,
    /// Lane centre.
    pub x: f64,
    /// Head centre.
    pub y: f64,
    pub visual: NoteVisual,
    /// Length of the hold tail above the head, 0 for taps.
    pub tail_px: f64,
}

/// Snapshot of gameplay state for rendering.
#[derive(Clone, Debug)]
pub struct GameplaySnapshot {
    pub title: String,
    pub phase: SessionPhase,
    /// Current chart time in milliseconds.
    pub chart_time_ms: f64,
    /// Time left before the song starts; 0 once playing.
    pub countdown_remaining_ms: f64,
    pub hit_line_y: f64,
    pub notes: Vec<NoteSprite>,
    /// Per-lane receptor highlight after a key press.
    pub key_feedback: Vec<bool>,

    pub score: u64,
    pub combo: u32,
    pub max_combo: u32,
    /// Accuracy over the notes judged so far.
    pub accuracy: f64,
    pub counts: JudgementCounts,
    pub judgement: Option<JudgementBanner>,

    pub muted: bool,
    /// Present on the end screen.
    pub result: Option<SessionResult>,
}

impl GameplaySnapshot {
    pub fn summary(&self) -> String {
        match (&self.phase, &self.result) {
            (SessionPhase::EndScreen, Some(result)) => format!(
                "{} - Rank {} | {:.2}% | Score {} | Max Combo {} | Enter to continue",
                result.title, result.rank, result.accuracy, result.score, result.max_combo
            ),
            (SessionPhase::Countdown, _) => format!(
                "{} - Starting in {}",
                self.title,
                (self.countdown_remaining_ms / 1000.0).ceil() as i64
            ),
            _ => {
                let banner = self
                    .judgement
                    .map(|b| format!(" | {}", b.tier))
                    .unwrap_or_default();
                format!(
                    "{} - Score {} | Combo {} | {:.2}%{}",
                    self.title, self.score, self.combo, self.accuracy, banner
                )
            }
        }
    }
}

/// Axis-aligned marquee in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarqueeSnapshot {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One row of the editor debug menu.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuRow {
    pub label: &'static str,
    pub value: String,
    pub selected: bool,
}

/// Snapshot of editor state for rendering.
#[derive(Clone, Debug)]
pub struct EditorSnapshot {
    pub title: String,
    /// Chart time currently at the hit line.
    pub scroll_ms: f64,
    pub hit_line_y: f64,
    pub pixels_per_second: f64,
    pub bpm: f64,
    pub scroll_speed: f64,
    pub snap: u32,
    pub playing: bool,
    /// Reported track position during playback; the view follows the frame clock.
    pub track_ms: Option<f64>,
    pub use_custom_start: bool,
    pub custom_start_ms: i64,

    /// Notes inside the visible time range.
    pub notes: Vec<NoteSprite>,
    pub note_count: usize,
    pub selected_count: usize,
    pub clipboard_count: usize,
    /// Lanes waiting for the second half of a hold gesture, with start time.
    pub pending_holds: Vec<(usize, i64)>,
    pub marquee: Option<MarqueeSnapshot>,
    /// Rows of the debug menu when it is open.
    pub menu: Option<Vec<MenuRow>>,
    pub status: Option<String>,
}

impl EditorSnapshot {
    pub fn summary(&self) -> String {
        let mut text = format!(
            "{} [edit] - {:.0}ms | 1/{} snap | {} notes",
            self.title, self.scroll_ms, self.snap, self.note_count
        );
        if self.selected_count > 0 {
            text.push_str(&format!(" | {} selected", self.selected_count));
        }
        if self.playing {
            text.push_str(" | playing");
            if let Some(track_ms) = self.track_ms {
                text.push_str(&format!(" (track {track_ms:.0}ms)"));
            }
        }
        if let Some(rows) = &self.menu
            && let Some(row) = rows.iter().find(|r| r.selected)
        {
            text.push_str(&format!(" | {}: {}", row.label, row.value));
        }
        if let Some(status) = &self.status {
            text.push_str(&format!(" | {status}"));
        }
        text
    }
}
