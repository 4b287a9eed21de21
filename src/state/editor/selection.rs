//! Marquee selection, clipboard and multi-delete.

use crate::models::chart::{Chart, Note, NoteKey};
use crate::models::engine::PlayfieldLayout;
use crate::state::editor::timeline::Timeline;
use std::collections::BTreeSet;

/// Axis-aligned rectangle in screen pixels, always normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    /// Builds the rectangle spanned by two corners in any order.
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            left: a.0.min(b.0),
            top: a.1.min(b.1),
            right: a.0.max(b.0),
            bottom: a.1.max(b.1),
        }
    }

    pub fn centered(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            left: x - width / 2.0,
            top: y - height / 2.0,
            right: x + width / 2.0,
            bottom: y + height / 2.0,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Overlap test; touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }
}

/// Screen box of a note head in the editor.
pub fn note_rect(note: &Note, layout: &PlayfieldLayout, timeline: &Timeline) -> Rect {
    Rect::centered(
        layout.lane_center_x(layout.editor_start_x(), note.lane),
        timeline.y_of(note.time as f64),
        layout.note_width,
        layout.note_height,
    )
}

/// A copied note relative to the earliest copied one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipboardNote {
    pub lane: usize,
    pub relative_time: i64,
    pub duration: Option<i64>,
}

/// Selected notes, keyed by lane and time.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    keys: BTreeSet<NoteKey>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: NoteKey) -> bool {
        self.keys.contains(&key)
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Applies a marquee. `toggle` flips membership of the hit notes,
    /// otherwise they are added.
    pub fn apply_marquee(
        &mut self,
        chart: &Chart,
        marquee: Rect,
        layout: &PlayfieldLayout,
        timeline: &Timeline,
        toggle: bool,
    ) -> usize {
        let hits: BTreeSet<NoteKey> = chart
            .notes()
            .iter()
            .filter(|n| marquee.intersects(&note_rect(n, layout, timeline)))
            .map(Note::key)
            .collect();

        if toggle {
            self.keys = self.keys.symmetric_difference(&hits).copied().collect();
        } else {
            self.keys.extend(hits.iter().copied());
        }
        hits.len()
    }

    /// Drops keys whose note no longer exists.
    pub fn retain_existing(&mut self, chart: &Chart) {
        self.keys.retain(|key| chart.contains_key(*key));
    }

    /// Copies the selected notes, relative to the earliest one.
    pub fn copy(&self, chart: &Chart) -> Vec<ClipboardNote> {
        let picked: Vec<&Note> = chart
            .notes()
            .iter()
            .filter(|n| self.keys.contains(&n.key()))
            .collect();
        let Some(anchor) = picked.iter().map(|n| n.time).min() else {
            return Vec::new();
        };
        picked
            .into_iter()
            .map(|n| ClipboardNote {
                lane: n.lane,
                relative_time: n.time - anchor,
                duration: n.duration,
            })
            .collect()
    }

    /// Deletes every selected note and empties the selection.
    pub fn delete_selected(&mut self, chart: &mut Chart) -> usize {
        let keys = std::mem::take(&mut self.keys);
        chart.remove_where(|n| keys.contains(&n.key()))
    }
}

/// Inserts the clipboard anchored at `at_ms`. Collisions are skipped.
pub fn paste(chart: &mut Chart, clipboard: &[ClipboardNote], at_ms: i64, lane_count: usize) -> usize {
    clipboard
        .iter()
        .filter(|c| c.lane < lane_count)
        .filter(|c| {
            chart.insert(Note {
                lane: c.lane,
                time: at_ms + c.relative_time,
                duration: c.duration,
            })
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn view() -> (PlayfieldLayout, Timeline) {
        let layout = PlayfieldLayout::default();
        let timeline = Timeline {
            scroll_ms: 0.0,
            pixels_per_second: 420.0,
            hit_line_y: layout.hit_line_y,
            bpm: 120.0,
            snap: 4,
        };
        (layout, timeline)
    }

    #[test]
    fn rect_intersection_is_strict() {
        let a = Rect::from_corners((10.0, 10.0), (0.0, 0.0));
        assert_eq!(a, Rect { left: 0.0, top: 0.0, right: 10.0, bottom: 10.0 });
        assert!(a.intersects(&Rect::centered(10.0, 5.0, 4.0, 4.0)));
        assert!(!a.intersects(&Rect::from_corners((10.0, 0.0), (20.0, 10.0))));
    }

    #[test]
    fn marquee_selects_union_or_toggles() {
        let (layout, timeline) = view();
        let chart = Chart::from_notes(vec![Note::tap(0, 0), Note::tap(1, 0), Note::tap(3, 0)]);
        let hit = layout.hit_line_y;
        // Lanes 0 and 1 of the editor track start at x = 360.
        let left = Rect::from_corners((350.0, hit - 20.0), (500.0, hit + 20.0));
        let mut selection = Selection::new();

        assert_eq!(selection.apply_marquee(&chart, left, &layout, &timeline, false), 2);
        assert_eq!(selection.len(), 2);

        let right = Rect::from_corners((500.0, hit - 20.0), (900.0, hit + 20.0));
        selection.apply_marquee(&chart, right, &layout, &timeline, true);
        assert!(selection.contains(NoteKey { lane: 0, time: 0 }));
        assert!(!selection.contains(NoteKey { lane: 1, time: 0 }));
        assert!(selection.contains(NoteKey { lane: 3, time: 0 }));
    }

    #[test]
    fn copy_paste_preserves_offsets() {
        let mut chart = Chart::from_notes(vec![
            Note::tap(0, 1000),
            Note::hold(2, 1250, 400),
            Note::tap(3, 5000),
        ]);
        let mut selection = Selection::new();
        selection.keys.insert(NoteKey { lane: 0, time: 1000 });
        selection.keys.insert(NoteKey { lane: 2, time: 1250 });

        let clipboard = selection.copy(&chart);
        assert_eq!(
            clipboard,
            vec![
                ClipboardNote { lane: 0, relative_time: 0, duration: None },
                ClipboardNote { lane: 2, relative_time: 250, duration: Some(400) },
            ]
        );

        assert_eq!(paste(&mut chart, &clipboard, 3000, 4), 2);
        assert!(chart.is_sorted());
        assert!(chart.notes().contains(&Note::hold(2, 3250, 400)));
        // Pasting on top of itself is a no-op.
        assert_eq!(paste(&mut chart, &clipboard, 3000, 4), 0);
        assert_eq!(chart.len(), 5);
    }

    #[test]
    fn delete_selected_clears_selection() {
        let mut chart = Chart::from_notes(vec![Note::tap(0, 0), Note::tap(1, 500)]);
        let mut selection = Selection::new();
        selection.keys.insert(NoteKey { lane: 1, time: 500 });
        assert_eq!(selection.delete_selected(&mut chart), 1);
        assert!(selection.is_empty());
        assert_eq!(chart.notes(), &[Note::tap(0, 0)]);
    }

    #[test]
    fn empty_selection_copies_nothing() {
        let chart = Chart::from_notes(vec![Note::tap(0, 0)]);
        assert!(Selection::new().copy(&chart).is_empty());
    }
}
