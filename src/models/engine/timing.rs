//! Conversions between chart time (ms) and scroll position (px).
//!
//! Charts are authored in absolute song milliseconds while gameplay moves
//! notes by a fixed number of pixels per frame. The lead time links the two:
//! a note must spawn `scroll_lead_ms` before its chart time to reach the hit
//! line exactly on time.

use crate::models::chart::Chart;

/// Duration of one frame in milliseconds.
#[inline]
pub fn frame_ms(frame_rate_hz: f64) -> f64 {
    1000.0 / frame_rate_hz
}

/// Scroll distance covered in one second.
#[inline]
pub fn pixels_per_second(scroll_speed: f64, frame_rate_hz: f64) -> f64 {
    scroll_speed * frame_rate_hz
}

/// Time a note needs to travel `travel_distance_px` at `scroll_speed` px/frame.
pub fn scroll_lead_ms(scroll_speed: f64, travel_distance_px: f64, frame_rate_hz: f64) -> f64 {
    (travel_distance_px / scroll_speed) * frame_ms(frame_rate_hz)
}

/// Chart time at which gameplay begins.
///
/// With a custom start the offset is returned untouched. Otherwise the
/// session starts early enough for the first note to spawn at the top of the
/// screen, but never before 0.
pub fn chart_start_offset(
    chart: &Chart,
    scroll_lead_ms: f64,
    use_custom_start: bool,
    custom_offset_ms: i64,
) -> f64 {
    if use_custom_start {
        return custom_offset_ms as f64;
    }
    let first_note_time = chart.first_time().unwrap_or(0) as f64;
    (first_note_time - scroll_lead_ms).max(0.0)
}

/// Chart time at which a note has to be spawned.
#[inline]
pub fn spawn_time(note_time: i64, scroll_lead_ms: f64) -> f64 {
    note_time as f64 - scroll_lead_ms
}

/// Closed-form vertical position of a note at `current_chart_time`.
pub fn note_y_position(
    hit_line_y: f64,
    note_time: f64,
    current_chart_time: f64,
    scroll_speed: f64,
    frame_rate_hz: f64,
) -> f64 {
    hit_line_y - ((note_time - current_chart_time) / 1000.0 * scroll_speed * frame_rate_hz)
}

/// Scroll parameters of one session. Built once per speed, so the lead
/// time always matches the current scroll speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingModel {
    scroll_speed: f64,
    frame_rate_hz: f64,
    lead_ms: f64,
}

impl TimingModel {
    pub fn new(scroll_speed: f64, travel_distance_px: f64, frame_rate_hz: f64) -> Self {
        Self {
            scroll_speed,
            frame_rate_hz,
            lead_ms: scroll_lead_ms(scroll_speed, travel_distance_px, frame_rate_hz),
        }
    }

    pub fn scroll_speed(&self) -> f64 {
        self.scroll_speed
    }

    pub fn frame_rate_hz(&self) -> f64 {
        self.frame_rate_hz
    }

    pub fn lead_ms(&self) -> f64 {
        self.lead_ms
    }

    pub fn frame_ms(&self) -> f64 {
        frame_ms(self.frame_rate_hz)
    }

    /// Pixels travelled in `dt_ms`; exactly `scroll_speed` for one frame.
    pub fn advance_px(&self, dt_ms: f64) -> f64 {
        self.scroll_speed * (dt_ms / self.frame_ms())
    }

    /// Remaining hold tail length in pixels for `remaining_ms` of hold.
    pub fn tail_length_px(&self, remaining_ms: f64) -> f64 {
        (remaining_ms.max(0.0) / self.frame_ms()) * self.scroll_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chart::Note;

    #[test]
    fn lead_time_scenario() {
        let lead = scroll_lead_ms(7.0, 500.0, 60.0);
        assert!((lead - 1190.476).abs() < 0.01, "lead was {lead}");

        let chart = Chart::from_notes(vec![Note::tap(0, 1000)]);
        assert_eq!(chart_start_offset(&chart, lead, false, 0), 0.0);
    }

    #[test]
    fn lead_time_is_monotonic() {
        let mut previous = f64::INFINITY;
        for step in 1..50 {
            let speed = step as f64 * 0.5;
            let lead = scroll_lead_ms(speed, 500.0, 60.0);
            assert!(lead < previous);
            previous = lead;
        }

        let mut previous = 0.0;
        for distance in (100..1000).step_by(50) {
            let lead = scroll_lead_ms(7.0, distance as f64, 60.0);
            assert!(lead > previous);
            previous = lead;
        }
    }

    #[test]
    fn start_offset_never_spawns_late() {
        let lead = scroll_lead_ms(7.0, 500.0, 60.0);
        for first in [0, 500, 1190, 1191, 5000, 12_345] {
            let chart = Chart::from_notes(vec![Note::tap(2, first + 700), Note::tap(1, first)]);
            let offset = chart_start_offset(&chart, lead, false, 0);
            assert!(offset >= 0.0);
            assert!(spawn_time(first, lead).max(offset) <= first as f64);
        }
    }

    #[test]
    fn empty_chart_starts_at_zero() {
        let chart = Chart::default();
        assert_eq!(chart_start_offset(&chart, 1190.0, false, 0), 0.0);
    }

    #[test]
    fn custom_start_is_verbatim() {
        let chart = Chart::from_notes(vec![Note::tap(0, 9000)]);
        assert_eq!(chart_start_offset(&chart, 1190.0, true, 2500), 2500.0);
    }

    #[test]
    fn incremental_scroll_matches_closed_form() {
        let model = TimingModel::new(7.0, 500.0, 60.0);
        let note_time = 4000.0;
        let mut now = spawn_time(4000, model.lead_ms());
        let mut y = note_y_position(500.0, note_time, now, 7.0, 60.0);
        assert!(y.abs() < 1e-6);

        // Ten seconds of frames.
        for _ in 0..600 {
            now += model.frame_ms();
            y += model.advance_px(model.frame_ms());
        }
        let expected = note_y_position(500.0, note_time, now, 7.0, 60.0);
        assert!((y - expected).abs() <= 10.0);
    }

    #[test]
    fn doubling_speed_halves_the_lead() {
        let slow = TimingModel::new(7.0, 500.0, 60.0);
        let fast = TimingModel::new(14.0, 500.0, 60.0);
        assert!((fast.lead_ms() - slow.lead_ms() / 2.0).abs() < 1e-9);
    }
}
