//! Note placement and removal on the editor timeline.
//!
//! Rejected placements are ordinary editing no-ops and report `false`.

use crate::models::chart::{Chart, Note};
use crate::models::engine::constants::{MIN_HOLD_DURATION_MS, REMOVE_TOLERANCE_MS};
use std::collections::BTreeMap;

/// Inserts a tap unless the lane already has a note within the dedup radius.
pub fn place_tap(chart: &mut Chart, lane: usize, time: i64) -> bool {
    chart.insert(Note::tap(lane, time))
}

/// Removes every note of `lane` near `time`. Returns how many went.
pub fn remove_note(chart: &mut Chart, lane: usize, time: i64) -> usize {
    chart.remove_near(lane, time, REMOVE_TOLERANCE_MS)
}

/// What a hold gesture click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldGesture {
    /// First endpoint recorded.
    Started,
    /// Hold inserted at the earlier endpoint.
    Placed,
    /// Second endpoint given but the hold was too short or collided.
    Discarded,
}

/// Hold starts waiting for their second endpoint, one per lane.
#[derive(Debug, Clone, Default)]
pub struct PendingHolds {
    starts: BTreeMap<usize, i64>,
}

impl PendingHolds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one endpoint of a hold gesture in `lane`.
    pub fn click(&mut self, chart: &mut Chart, lane: usize, time: i64) -> HoldGesture {
        let Some(start) = self.starts.remove(&lane) else {
            self.starts.insert(lane, time);
            return HoldGesture::Started;
        };

        let (from, to) = if start <= time { (start, time) } else { (time, start) };
        let duration = to - from;
        if duration > MIN_HOLD_DURATION_MS && chart.insert(Note::hold(lane, from, duration)) {
            HoldGesture::Placed
        } else {
            HoldGesture::Discarded
        }
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, i64)> + '_ {
        self.starts.iter().map(|(&lane, &time)| (lane, time))
    }

    pub fn cancel_all(&mut self) {
        self.starts.clear();
    }
}
