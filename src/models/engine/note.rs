//! Gameplay-only runtime state of a spawned note.

use crate::models::chart::Note;

/// Visual sub-state reported to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteVisual {
    Normal,
    Held,
    Selected,
}

/// A chart note brought to life for one play session.
///
/// Lifecycle: spawned (`is_active`, not hit) → hit (tap, deactivated) |
/// holding → completed or released | missed.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveNote {
    pub note: Note,
    pub is_active: bool,
    pub is_hit: bool,
    pub is_holding: bool,
    pub hold_start_time: Option<f64>,
    pub hold_end_time: Option<f64>,
    /// Current vertical position in pixels; grows downwards.
    pub y: f64,
}

impl ActiveNote {
    pub fn spawn(note: Note, y: f64) -> Self {
        Self {
            note,
            is_active: true,
            is_hit: false,
            is_holding: false,
            hold_start_time: None,
            hold_end_time: None,
            y,
        }
    }

    pub fn lane(&self) -> usize {
        self.note.lane
    }

    /// Spawned, unresolved and therefore judgeable.
    pub fn is_pending(&self) -> bool {
        self.is_active && !self.is_hit
    }

    /// Holding notes stay anchored at the hit line.
    pub fn advance(&mut self, px: f64) {
        if !self.is_holding {
            self.y += px;
        }
    }

    pub fn start_hold(&mut self, now: f64, duration_ms: i64) {
        self.is_holding = true;
        self.hold_start_time = Some(now);
        self.hold_end_time = Some(now + duration_ms as f64);
    }

    /// Ends the note's life in the session.
    pub fn resolve(&mut self) {
        self.is_holding = false;
        self.is_active = false;
    }

    /// Milliseconds of hold left at `now`.
    pub fn remaining_hold_ms(&self, now: f64) -> f64 {
        let duration = self.note.duration.unwrap_or(0) as f64;
        match self.hold_start_time {
            Some(start) if self.is_holding => (duration - (now - start)).max(0.0),
            _ => duration,
        }
    }

    pub fn visual(&self) -> NoteVisual {
        if self.is_holding {
            NoteVisual::Held
        } else {
            NoteVisual::Normal
        }
    }
}
