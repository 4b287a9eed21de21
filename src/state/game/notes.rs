//! Note lifecycle inside a session: spawn, advance, prune.

use super::GameSession;
use crate::models::engine::ActiveNote;
use crate::models::engine::timing::{note_y_position, spawn_time};

impl GameSession {
    /// Spawns every chart note whose lead time has been reached.
    ///
    /// The cursor only moves forward, so a note is spawned at most once.
    /// Spawned notes are placed where they were one frame ago so that the
    /// following advance lands them on their exact position.
    pub(crate) fn spawn_due_notes(&mut self, dt_ms: f64) {
        let lead = self.timing.lead_ms();
        let previous_time = self.current_time - dt_ms;

        while let Some(note) = self.chart.notes().get(self.next_index)
            && self.current_time >= spawn_time(note.time, lead)
        {
            let y = note_y_position(
                self.layout.hit_line_y,
                note.time as f64,
                previous_time,
                self.timing.scroll_speed(),
                self.timing.frame_rate_hz(),
            );
            self.notes.push(ActiveNote::spawn(*note, y));
            self.next_index += 1;
        }
    }

    /// Moves unanchored notes by one step worth of scroll.
    pub(crate) fn advance_notes(&mut self, dt_ms: f64) {
        let px = self.timing.advance_px(dt_ms);
        for note in self.notes.iter_mut().filter(|n| n.is_active) {
            note.advance(px);
        }
    }

    pub(crate) fn prune_notes(&mut self) {
        self.notes.retain(|n| n.is_active);
    }
}
