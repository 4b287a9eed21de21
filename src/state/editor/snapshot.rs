//! Snapshot creation for `EditorState`.

use super::EditorState;
use super::selection::Rect;
use crate::models::engine::NoteVisual;
use crate::shared::snapshot::{EditorSnapshot, MarqueeSnapshot, NoteSprite};
use crate::state::traits::Snapshot;

impl Snapshot for EditorState {
    type Output = EditorSnapshot;

    fn create_snapshot(&self) -> EditorSnapshot {
        let timeline = self.timeline();
        let (from, to) = timeline.visible_range(self.layout.screen_height);
        let start_x = self.layout.editor_start_x();
        let ms_per_px = 1000.0 / self.pixels_per_second;

        let notes = self
            .song
            .chart
            .notes()
            .iter()
            .filter(|n| n.end_time() as f64 >= from && n.time as f64 <= to)
            .map(|n| NoteSprite {
                lane: n.lane,
                time: n.time,
                x: self.layout.lane_center_x(start_x, n.lane),
                y: timeline.y_of(n.time as f64),
                visual: if self.selection.contains(n.key()) {
                    NoteVisual::Selected
                } else {
                    NoteVisual::Normal
                },
                tail_px: n.duration.unwrap_or(0) as f64 / ms_per_px,
            })
            .collect();

        let marquee = self.drag_start.map(|start| {
            let rect = Rect::from_corners(start, self.pointer);
            MarqueeSnapshot {
                x: rect.left,
                y: rect.top,
                width: rect.width(),
                height: rect.height(),
            }
        });

        let timing = &self.song.chart.timing;
        EditorSnapshot {
            title: self.song.title.clone(),
            scroll_ms: self.scroll_ms,
            hit_line_y: self.layout.hit_line_y,
            pixels_per_second: self.pixels_per_second,
            bpm: timing.bpm(),
            scroll_speed: timing.scroll_speed(),
            snap: self.snap,
            playing: self.playback.playing,
            track_ms: self
                .playback
                .playing
                .then(|| self.audio.position_secs())
                .flatten()
                .map(|secs| secs * 1000.0),
            use_custom_start: timing.use_custom_start,
            custom_start_ms: timing.start_offset_ms(),
            notes,
            note_count: self.song.chart.len(),
            selected_count: self.selection.len(),
            clipboard_count: self.clipboard.len(),
            pending_holds: self.pending_holds.iter().collect(),
            marquee,
            menu: self.menu.is_visible().then(|| self.menu.rows(timing)),
            status: self.status.clone(),
        }
    }
}
