//! Judgement window radii and tier classification.

use crate::models::stats::JudgementTier;

/// Radii of the three hit windows, measured from the hit line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitWindows {
    pub perfect: f64,
    pub great: f64,
    pub good: f64,
}

impl HitWindows {
    pub fn new() -> Self {
        Self {
            perfect: 22.0,
            great: 45.0,
            good: 90.0,
        }
    }

    /// Outermost radius; anything farther is not a hit candidate.
    pub fn widest(&self) -> f64 {
        self.good
    }

    /// Classifies a distance from the hit line, tightest window first.
    ///
    /// Returns `None` outside the Good window: the press is ignored rather
    /// than counted as a miss.
    pub fn judge(&self, distance: f64) -> Option<JudgementTier> {
        let distance = distance.abs();
        if distance < self.perfect {
            Some(JudgementTier::Perfect)
        } else if distance < self.great {
            Some(JudgementTier::Great)
        } else if distance < self.good {
            Some(JudgementTier::Good)
        } else {
            None
        }
    }
}

impl Default for HitWindows {
    fn default() -> Self {
        Self::new()
    }
}
