//! Mapping between screen Y and chart time inside the editor.
//!
//! The chart time at the hit line is `scroll_ms`; positions below the hit
//! line are later in the song.

/// Milliseconds between two snap lines.
pub fn ms_per_snap(bpm: f64, snap_divisor: u32) -> f64 {
    (60_000.0 / bpm) / snap_divisor.max(1) as f64
}

/// Rounds `time_ms` to the nearest snap line.
pub fn quantize(time_ms: f64, bpm: f64, snap_divisor: u32) -> f64 {
    let step = ms_per_snap(bpm, snap_divisor);
    (time_ms / step).round() * step
}

/// Chart time under `mouse_y`, snapped to the grid.
pub fn mouse_y_to_chart_time(
    mouse_y: f64,
    scroll_ms: f64,
    pixels_per_second: f64,
    hit_line_y: f64,
    bpm: f64,
    snap_divisor: u32,
) -> f64 {
    let raw = scroll_ms + ((mouse_y - hit_line_y) / pixels_per_second) * 1000.0;
    quantize(raw, bpm, snap_divisor)
}

/// Inverse of [`mouse_y_to_chart_time`] without the snapping.
pub fn chart_time_to_y(
    time_ms: f64,
    scroll_ms: f64,
    pixels_per_second: f64,
    hit_line_y: f64,
) -> f64 {
    hit_line_y + ((time_ms - scroll_ms) / 1000.0) * pixels_per_second
}

/// The editor's current view of the timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timeline {
    pub scroll_ms: f64,
    pub pixels_per_second: f64,
    pub hit_line_y: f64,
    pub bpm: f64,
    pub snap: u32,
}

impl Timeline {
    /// Snapped chart time under `y`, in whole milliseconds.
    pub fn time_at(&self, y: f64) -> i64 {
        mouse_y_to_chart_time(
            y,
            self.scroll_ms,
            self.pixels_per_second,
            self.hit_line_y,
            self.bpm,
            self.snap,
        )
        .round() as i64
    }

    pub fn y_of(&self, time_ms: f64) -> f64 {
        chart_time_to_y(time_ms, self.scroll_ms, self.pixels_per_second, self.hit_line_y)
    }

    /// Chart time range visible between the top and `screen_height`.
    pub fn visible_range(&self, screen_height: f64) -> (f64, f64) {
        let start = self.scroll_ms - (self.hit_line_y / self.pixels_per_second) * 1000.0;
        let end =
            self.scroll_ms + ((screen_height - self.hit_line_y) / self.pixels_per_second) * 1000.0;
        (start, end)
    }
}
