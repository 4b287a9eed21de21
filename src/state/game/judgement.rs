//! Key-down, key-up and per-frame judgement of active notes.
//!
//! Presses are judged on timing, `|now - note.time|` in ms against the hit
//! window radii, so the result does not depend on scroll speed. The miss
//! sweep works in screen space and misses notes whose position passed
//! `hit_line_y + good`. The engine owns no notes; it mutates the session's
//! active list and stats in place.

use crate::models::engine::constants::HOLD_SCORE_PER_MS;
use crate::models::engine::{ActiveNote, HitWindows};
use crate::models::stats::{JudgementTier, SessionStats};

/// Outcome of releasing a key over a held note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldRelease {
    pub held_ms: f64,
    pub points: u64,
    pub completed: bool,
}

/// What the per-frame sweep resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub misses: u32,
    pub completed_holds: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JudgementEngine {
    windows: HitWindows,
    hit_line_y: f64,
}

impl JudgementEngine {
    pub fn new(windows: HitWindows, hit_line_y: f64) -> Self {
        Self {
            windows,
            hit_line_y,
        }
    }

    /// Judges a key press in `lane` at chart time `now`.
    ///
    /// The pending note closest in time wins; on an exact tie the earlier
    /// spawned (earlier chart time) note is kept. Presses with no candidate
    /// inside the Good window are ignored.
    pub fn on_key_down(
        &self,
        lane: usize,
        now: f64,
        notes: &mut [ActiveNote],
        stats: &mut SessionStats,
    ) -> Option<JudgementTier> {
        let mut best: Option<(usize, f64)> = None;
        for (i, note) in notes.iter().enumerate() {
            if note.lane() != lane || !note.is_pending() {
                continue;
            }
            let distance = (now - note.note.time as f64).abs();
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((i, distance));
            }
        }

        let (index, distance) = best?;
        let tier = self.windows.judge(distance)?;

        stats.record_hit(tier);
        let note = &mut notes[index];
        note.is_hit = true;
        match note.note.duration {
            Some(duration) => note.start_hold(now, duration),
            None => note.resolve(),
        }

        log::debug!(
            "SESSION: {} in lane {} ({:.1}ms off)",
            tier,
            lane,
            distance
        );
        Some(tier)
    }

    /// Resolves the note held in `lane`, if any.
    ///
    /// Score is proportional to the time actually held, capped at the note
    /// duration. Combo only grows when the hold reached its end.
    pub fn on_key_up(
        &self,
        lane: usize,
        now: f64,
        notes: &mut [ActiveNote],
        stats: &mut SessionStats,
    ) -> Option<HoldRelease> {
        let note = notes
            .iter_mut()
            .find(|n| n.lane() == lane && n.is_holding)?;
        let release = Self::finish_hold(note, now, stats);
        log::debug!(
            "SESSION: Hold released in lane {} after {:.0}ms (+{})",
            lane,
            release.held_ms,
            release.points
        );
        Some(release)
    }

    /// Misses notes that scrolled past the Good window and completes holds
    /// whose end time has been reached.
    pub fn on_frame_tick(
        &self,
        now: f64,
        notes: &mut [ActiveNote],
        stats: &mut SessionStats,
    ) -> SweepReport {
        let miss_line = self.hit_line_y + self.windows.widest();
        let mut report = SweepReport::default();

        for note in notes.iter_mut() {
            if note.is_pending() && note.y > miss_line {
                note.resolve();
                stats.record_miss();
                report.misses += 1;
            }
            if note.is_holding
                && let Some(end) = note.hold_end_time
                && now >= end
            {
                Self::finish_hold(note, now, stats);
                report.completed_holds += 1;
            }
        }

        report
    }

    fn finish_hold(note: &mut ActiveNote, now: f64, stats: &mut SessionStats) -> HoldRelease {
        let duration = note.note.duration.unwrap_or(0) as f64;
        let start = note.hold_start_time.unwrap_or(now);
        let held_ms = (now - start).clamp(0.0, duration);
        let completed = note.hold_end_time.is_some_and(|end| now >= end);
        let points = (held_ms * HOLD_SCORE_PER_MS).round() as u64;

        note.resolve();
        stats.add_score(points);
        if completed {
            stats.bump_combo();
        }

        HoldRelease {
            held_ms,
            points,
            completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chart::Note;

    const HIT_LINE: f64 = 500.0;

    fn engine() -> JudgementEngine {
        JudgementEngine::new(HitWindows::new(), HIT_LINE)
    }

    fn at(note: Note, y: f64) -> ActiveNote {
        ActiveNote::spawn(note, y)
    }

    #[test]
    fn exact_hit_is_perfect() {
        let mut notes = vec![at(Note::tap(0, 1000), HIT_LINE)];
        let mut stats = SessionStats::new();
        let tier = engine().on_key_down(0, 1000.0, &mut notes, &mut stats);
        assert_eq!(tier, Some(JudgementTier::Perfect));
        assert_eq!(stats.score, 100);
        assert_eq!(stats.combo, 1);
        assert!(!notes[0].is_active);
    }

    #[test]
    fn press_outside_window_is_ignored() {
        let mut notes = vec![at(Note::tap(0, 1000), HIT_LINE - 90.0)];
        let mut stats = SessionStats::new();
        assert_eq!(engine().on_key_down(0, 0.0, &mut notes, &mut stats), None);
        assert_eq!(stats, SessionStats::new());
        assert!(notes[0].is_pending());
    }

    #[test]
    fn stale_screen_position_does_not_change_the_tier() {
        // At high scroll speeds the last drawn position lags a frame behind.
        let mut notes = vec![at(Note::tap(0, 1000), HIT_LINE - 25.0)];
        let mut stats = SessionStats::new();
        let tier = engine().on_key_down(0, 1000.0, &mut notes, &mut stats);
        assert_eq!(tier, Some(JudgementTier::Perfect));
    }

    #[test]
    fn other_lanes_are_not_candidates() {
        let mut notes = vec![at(Note::tap(1, 1000), HIT_LINE)];
        let mut stats = SessionStats::new();
        assert_eq!(engine().on_key_down(0, 1000.0, &mut notes, &mut stats), None);
    }

    #[test]
    fn nearest_note_wins() {
        // The older note is still inside the Good window but farther away.
        let mut notes = vec![
            at(Note::tap(0, 940), HIT_LINE + 60.0),
            at(Note::tap(0, 1005), HIT_LINE - 5.0),
        ];
        let mut stats = SessionStats::new();
        let tier = engine().on_key_down(0, 1000.0, &mut notes, &mut stats);
        assert_eq!(tier, Some(JudgementTier::Perfect));
        assert!(notes[0].is_pending());
        assert!(!notes[1].is_active);
    }

    #[test]
    fn equidistant_tie_goes_to_earlier_note() {
        let mut notes = vec![
            at(Note::tap(0, 990), HIT_LINE + 10.0),
            at(Note::tap(0, 1010), HIT_LINE - 10.0),
        ];
        let mut stats = SessionStats::new();
        engine().on_key_down(0, 1000.0, &mut notes, &mut stats);
        assert!(!notes[0].is_active);
        assert!(notes[1].is_pending());
    }

    #[test]
    fn tiers_loosen_with_timing_error() {
        let cases = [
            (0.0, Some(JudgementTier::Perfect)),
            (21.0, Some(JudgementTier::Perfect)),
            (30.0, Some(JudgementTier::Great)),
            (60.0, Some(JudgementTier::Good)),
            (89.0, Some(JudgementTier::Good)),
            (95.0, None),
        ];
        for (offset, expected) in cases {
            let mut notes = vec![at(Note::tap(2, 1000), HIT_LINE)];
            let mut stats = SessionStats::new();
            assert_eq!(
                engine().on_key_down(2, 1000.0 + offset, &mut notes, &mut stats),
                expected,
                "offset {offset}"
            );
        }
    }

    #[test]
    fn full_hold_release() {
        let mut notes = vec![at(Note::hold(1, 0, 500), HIT_LINE)];
        let mut stats = SessionStats::new();
        let judge = engine();

        assert_eq!(
            judge.on_key_down(1, 0.0, &mut notes, &mut stats),
            Some(JudgementTier::Perfect)
        );
        assert!(notes[0].is_holding);
        assert_eq!(stats.combo, 1);

        let release = judge.on_key_up(1, 500.0, &mut notes, &mut stats).unwrap();
        assert_eq!(release.held_ms, 500.0);
        assert!(release.completed);
        assert_eq!(release.points, 100);
        assert_eq!(stats.combo, 2);
        assert_eq!(stats.score, 200);
        assert!(!notes[0].is_active);
    }

    #[test]
    fn early_release_earns_partial_credit_without_combo() {
        let mut notes = vec![at(Note::hold(1, 0, 500), HIT_LINE)];
        let mut stats = SessionStats::new();
        let judge = engine();
        judge.on_key_down(1, 0.0, &mut notes, &mut stats);

        let release = judge.on_key_up(1, 200.0, &mut notes, &mut stats).unwrap();
        assert!(!release.completed);
        assert_eq!(release.points, 40);
        assert_eq!(stats.combo, 1);
        assert_eq!(stats.score, 140);
    }

    #[test]
    fn key_up_without_hold_is_a_no_op() {
        let mut notes = vec![at(Note::tap(0, 0), HIT_LINE)];
        let mut stats = SessionStats::new();
        assert_eq!(engine().on_key_up(0, 0.0, &mut notes, &mut stats), None);
        assert!(notes[0].is_pending());
    }

    #[test]
    fn passed_note_is_missed_and_resets_combo() {
        let mut stats = SessionStats::new();
        stats.combo = 12;
        stats.max_combo = 12;
        let mut notes = vec![
            at(Note::tap(0, 0), HIT_LINE + 90.0),
            at(Note::tap(1, 0), HIT_LINE + 90.5),
        ];
        let report = engine().on_frame_tick(0.0, &mut notes, &mut stats);
        assert_eq!(report.misses, 1);
        assert!(notes[0].is_pending());
        assert!(!notes[1].is_active);
        assert_eq!(stats.combo, 0);
        assert_eq!(stats.max_combo, 12);
        assert_eq!(stats.counts.miss, 1);
    }

    #[test]
    fn sweep_completes_unreleased_holds() {
        let mut notes = vec![at(Note::hold(3, 0, 500), HIT_LINE)];
        let mut stats = SessionStats::new();
        let judge = engine();
        judge.on_key_down(3, 0.0, &mut notes, &mut stats);

        assert_eq!(judge.on_frame_tick(499.0, &mut notes, &mut stats).completed_holds, 0);
        let report = judge.on_frame_tick(500.0, &mut notes, &mut stats);
        assert_eq!(report.completed_holds, 1);
        assert_eq!(stats.score, 200);
        assert_eq!(stats.combo, 2);
        assert!(!notes[0].is_active);
        assert_eq!(judge.on_key_up(3, 510.0, &mut notes, &mut stats), None);
    }
}
