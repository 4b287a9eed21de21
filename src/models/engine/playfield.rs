//! Playfield geometry shared by gameplay and the editor.

use crate::models::settings::Settings;

/// Screen layout of the lanes and the hit line, in logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayfieldLayout {
    pub screen_width: f64,
    pub screen_height: f64,
    pub hit_line_y: f64,
    pub lane_count: usize,
    pub lane_width: f64,
    pub note_width: f64,
    pub note_height: f64,
    pub frame_rate_hz: f64,
}

impl PlayfieldLayout {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            screen_width: settings.screen_width as f64,
            screen_height: settings.screen_height as f64,
            hit_line_y: (settings.screen_height as f64 - settings.hit_line_offset as f64).max(1.0),
            lane_count: settings.lane_count.max(1),
            lane_width: settings.lane_width as f64,
            note_width: settings.lane_width as f64,
            note_height: settings.note_height as f64,
            frame_rate_hz: settings.fps.max(1) as f64,
        }
    }

    /// Distance a note covers from the top of the screen to the hit line.
    pub fn travel_distance(&self) -> f64 {
        self.hit_line_y
    }

    fn track_width(&self) -> f64 {
        self.lane_width * self.lane_count as f64
    }

    /// Left edge of the gameplay lanes, centred in the left half of the screen.
    pub fn gameplay_start_x(&self) -> f64 {
        (self.screen_width / 2.0 - self.track_width()) / 2.0
    }

    /// Left edge of the editor track, centred on the screen.
    pub fn editor_start_x(&self) -> f64 {
        (self.screen_width - self.track_width()) / 2.0
    }

    pub fn lane_center_x(&self, start_x: f64, lane: usize) -> f64 {
        start_x + (lane as f64 + 0.5) * self.lane_width
    }

    /// Lane under the horizontal coordinate `x`, if any.
    pub fn lane_at(&self, start_x: f64, x: f64) -> Option<usize> {
        if x < start_x || x >= start_x + self.track_width() {
            return None;
        }
        let lane = ((x - start_x) / self.lane_width) as usize;
        (lane < self.lane_count).then_some(lane)
    }
}

impl Default for PlayfieldLayout {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_geometry() {
        let layout = PlayfieldLayout::default();
        assert_eq!(layout.hit_line_y, 500.0);
        assert_eq!(layout.editor_start_x(), 360.0);
        assert_eq!(layout.gameplay_start_x(), 60.0);
    }

    #[test]
    fn lane_hit_testing() {
        let layout = PlayfieldLayout::default();
        let start = layout.editor_start_x();
        assert_eq!(layout.lane_at(start, 359.0), None);
        assert_eq!(layout.lane_at(start, 360.0), Some(0));
        assert_eq!(layout.lane_at(start, 599.0), Some(1));
        assert_eq!(layout.lane_at(start, 839.9), Some(3));
        assert_eq!(layout.lane_at(start, 840.0), None);
        assert_eq!(layout.lane_center_x(start, 2), 660.0);
    }
}
