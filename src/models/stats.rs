//! Judgement tiers, score bookkeeping and end-of-session ranking.

use std::fmt;

/// Judgement tiers from strictest to loosest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JudgementTier {
    Perfect,
    Great,
    Good,
    Miss,
}

impl JudgementTier {
    pub const ALL: [JudgementTier; 4] = [
        JudgementTier::Perfect,
        JudgementTier::Great,
        JudgementTier::Good,
        JudgementTier::Miss,
    ];

    pub fn score_value(self) -> u64 {
        match self {
            JudgementTier::Perfect => 100,
            JudgementTier::Great => 70,
            JudgementTier::Good => 40,
            JudgementTier::Miss => 0,
        }
    }

    /// Weight used for accuracy reporting only.
    pub fn accuracy_weight(self) -> f64 {
        match self {
            JudgementTier::Perfect => 1.0,
            JudgementTier::Great => 0.7,
            JudgementTier::Good => 0.4,
            JudgementTier::Miss => 0.0,
        }
    }
}

impl fmt::Display for JudgementTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            JudgementTier::Perfect => "PERFECT",
            JudgementTier::Great => "GREAT",
            JudgementTier::Good => "GOOD",
            JudgementTier::Miss => "MISS",
        };
        f.write_str(label)
    }
}

/// Per-tier judgement counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JudgementCounts {
    pub perfect: u32,
    pub great: u32,
    pub good: u32,
    pub miss: u32,
}

impl JudgementCounts {
    pub fn get(&self, tier: JudgementTier) -> u32 {
        match tier {
            JudgementTier::Perfect => self.perfect,
            JudgementTier::Great => self.great,
            JudgementTier::Good => self.good,
            JudgementTier::Miss => self.miss,
        }
    }

    pub fn increment(&mut self, tier: JudgementTier) {
        match tier {
            JudgementTier::Perfect => self.perfect += 1,
            JudgementTier::Great => self.great += 1,
            JudgementTier::Good => self.good += 1,
            JudgementTier::Miss => self.miss += 1,
        }
    }

    pub fn judged(&self) -> u32 {
        self.perfect + self.great + self.good + self.miss
    }

    fn weighted_sum(&self) -> f64 {
        JudgementTier::ALL
            .iter()
            .map(|&tier| self.get(tier) as f64 * tier.accuracy_weight())
            .sum()
    }

    /// Accuracy percentage against `total_notes`; 100 for an empty chart.
    pub fn accuracy(&self, total_notes: usize) -> f64 {
        if total_notes == 0 {
            return 100.0;
        }
        self.weighted_sum() / total_notes as f64 * 100.0
    }

    /// Accuracy over the notes judged so far.
    pub fn running_accuracy(&self) -> f64 {
        self.accuracy(self.judged() as usize)
    }
}

/// Mutable score state of one play session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionStats {
    pub score: u64,
    pub combo: u32,
    pub max_combo: u32,
    pub counts: JudgementCounts,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a head judgement: count, score and combo.
    pub fn record_hit(&mut self, tier: JudgementTier) {
        self.counts.increment(tier);
        self.score += tier.score_value();
        self.bump_combo();
    }

    pub fn record_miss(&mut self) {
        self.counts.increment(JudgementTier::Miss);
        self.combo = 0;
    }

    pub fn add_score(&mut self, points: u64) {
        self.score += points;
    }

    pub fn bump_combo(&mut self) {
        self.combo += 1;
        self.sync_max_combo();
    }

    pub fn sync_max_combo(&mut self) {
        self.max_combo = self.max_combo.max(self.combo);
    }
}

/// Letter rank derived from final accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    S,
    A,
    B,
    C,
    D,
    F,
}

impl Rank {
    /// Inclusive thresholds, highest first.
    const THRESHOLDS: [(Rank, f64); 5] = [
        (Rank::S, 95.0),
        (Rank::A, 90.0),
        (Rank::B, 85.0),
        (Rank::C, 75.0),
        (Rank::D, 50.0),
    ];

    pub fn from_accuracy(accuracy: f64) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(_, threshold)| accuracy >= *threshold)
            .map(|(rank, _)| *rank)
            .unwrap_or(Rank::F)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Summary shown on the end screen.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResult {
    pub title: String,
    pub score: u64,
    pub max_combo: u32,
    pub counts: JudgementCounts,
    pub total_notes: usize,
    pub accuracy: f64,
    pub rank: Rank,
}

impl SessionResult {
    pub fn from_stats(title: impl Into<String>, stats: &SessionStats, total_notes: usize) -> Self {
        let accuracy = stats.counts.accuracy(total_notes);
        Self {
            title: title.into(),
            score: stats.score,
            max_combo: stats.max_combo,
            counts: stats.counts,
            total_notes,
            accuracy,
            rank: Rank::from_accuracy(accuracy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_accuracy_example() {
        let counts = JudgementCounts {
            perfect: 8,
            great: 1,
            good: 1,
            miss: 0,
        };
        let accuracy = counts.accuracy(10);
        assert!((accuracy - 91.0).abs() < 1e-9);
        assert_eq!(Rank::from_accuracy(accuracy), Rank::A);
    }

    #[test]
    fn empty_chart_is_full_accuracy() {
        assert_eq!(JudgementCounts::default().accuracy(0), 100.0);
        assert_eq!(Rank::from_accuracy(100.0), Rank::S);
    }

    #[test]
    fn rank_thresholds_are_inclusive() {
        assert_eq!(Rank::from_accuracy(95.0), Rank::S);
        assert_eq!(Rank::from_accuracy(94.99), Rank::A);
        assert_eq!(Rank::from_accuracy(85.0), Rank::B);
        assert_eq!(Rank::from_accuracy(75.0), Rank::C);
        assert_eq!(Rank::from_accuracy(50.0), Rank::D);
        assert_eq!(Rank::from_accuracy(49.9), Rank::F);
    }

    #[test]
    fn miss_resets_combo_but_keeps_max() {
        let mut stats = SessionStats::new();
        for _ in 0..5 {
            stats.record_hit(JudgementTier::Great);
        }
        stats.record_miss();
        assert_eq!(stats.combo, 0);
        assert_eq!(stats.max_combo, 5);
        assert_eq!(stats.score, 350);
        assert_eq!(stats.counts.judged(), 6);
    }
}
