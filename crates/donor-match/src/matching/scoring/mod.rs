mod priority;
pub(crate) mod rules;

pub use priority::PriorityLevel;

use serde::{Deserialize, Serialize};

use super::domain::Donor;

/// Signals contributing to a donor's priority score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSignal {
    Locality,
    Compatibility,
    CooldownCleared,
    Rating,
    Experience,
    Responsiveness,
    RecentActivity,
    Proximity,
}

/// Discrete contribution to a score, kept so dispatchers can explain a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub signal: ScoreSignal,
    pub points: u32,
    pub notes: String,
}

/// Full scoring trail for one donor against one request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub components: Vec<ScoreComponent>,
    /// Sum of component points before the urgency multiplier.
    pub raw_total: u32,
    pub urgency_applied: bool,
    pub total: u32,
}

impl ScoreBreakdown {
    pub(crate) fn empty() -> Self {
        Self::default()
    }

    pub fn points_for(&self, signal: ScoreSignal) -> u32 {
        self.components
            .iter()
            .filter(|component| component.signal == signal)
            .map(|component| component.points)
            .sum()
    }
}

/// Donor augmented with the score it earned for a particular request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDonor {
    #[serde(flatten)]
    pub donor: Donor,
    pub score: u32,
    pub priority: PriorityLevel,
}

impl ScoredDonor {
    pub(crate) fn new(donor: Donor, score: u32) -> Self {
        Self {
            donor,
            score,
            priority: PriorityLevel::from_score(score),
        }
    }
}
