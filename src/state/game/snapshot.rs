//! Snapshot creation for `GameSession`.

use super::GameSession;
use crate::shared::snapshot::{GameplaySnapshot, NoteSprite};
use crate::state::traits::Snapshot;

impl Snapshot for GameSession {
    type Output = GameplaySnapshot;

    fn create_snapshot(&self) -> GameplaySnapshot {
        let start_x = self.layout.gameplay_start_x();
        let notes = self
            .notes
            .iter()
            .filter(|n| n.is_active)
            .map(|n| NoteSprite {
                lane: n.lane(),
                time: n.note.time,
                x: self.layout.lane_center_x(start_x, n.lane()),
                y: n.y,
                visual: n.visual(),
                tail_px: self
                    .timing
                    .tail_length_px(n.remaining_hold_ms(self.current_time)),
            })
            .collect();

        GameplaySnapshot {
            title: self.title.clone(),
            phase: self.phase,
            chart_time_ms: self.current_time,
            countdown_remaining_ms: (self.start_offset - self.current_time).max(0.0),
            hit_line_y: self.layout.hit_line_y,
            notes,
            key_feedback: self.key_feedback.iter().map(|&f| f > 0).collect(),
            score: self.stats.score,
            combo: self.stats.combo,
            max_combo: self.stats.max_combo,
            accuracy: self.stats.counts.running_accuracy(),
            counts: self.stats.counts,
            judgement: self.banner,
            muted: !self.audio_loaded,
            result: self.result.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::events::GameAction;
    use crate::logic::audio::MutedAudio;
    use crate::models::chart::{Chart, Note, Song};
    use crate::models::engine::NoteVisual;
    use crate::models::settings::Settings;
    use crate::state::game::SessionPhase;
    use crate::state::traits::{HandleAction, Update};

    #[test]
    fn held_note_reports_a_shrinking_tail() {
        let settings = Settings {
            fps: 50,
            ..Settings::default()
        };
        let mut song = Song::new("snap");
        song.chart = Chart::from_notes(vec![Note::hold(0, 0, 1000)]);
        let mut session = GameSession::new(&song, &settings, Box::new(MutedAudio));

        let snapshot = session.create_snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Countdown);
        assert_eq!(snapshot.countdown_remaining_ms, 3000.0);
        assert!(snapshot.summary().contains("Starting in 3"));

        while session.current_time < -20.0 {
            session.update(20.0);
        }
        session.handle_action(&GameAction::Hit { lane: 0 });
        session.update(20.0);
        for _ in 0..25 {
            session.update(20.0);
        }

        let snapshot = session.create_snapshot();
        let note = snapshot.notes[0];
        assert_eq!(note.visual, NoteVisual::Held);
        // 500 ms left at 7 px per 20 ms frame.
        assert!((note.tail_px - 175.0).abs() < 1e-9, "tail was {}", note.tail_px);
        assert_eq!(note.x, 120.0);
        assert_eq!(snapshot.accuracy, 100.0);
    }
}
