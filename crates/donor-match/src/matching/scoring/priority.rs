use serde::{Deserialize, Serialize};

/// Display bucket derived from a priority score. Not consulted by the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLevel {
    VeryLow,
    Low,
    Medium,
    High,
    Highest,
}

impl PriorityLevel {
    pub const fn from_score(score: u32) -> Self {
        match score {
            80.. => PriorityLevel::Highest,
            60..=79 => PriorityLevel::High,
            40..=59 => PriorityLevel::Medium,
            20..=39 => PriorityLevel::Low,
            _ => PriorityLevel::VeryLow,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PriorityLevel::Highest => "Highest",
            PriorityLevel::High => "High",
            PriorityLevel::Medium => "Medium",
            PriorityLevel::Low => "Low",
            PriorityLevel::VeryLow => "Very Low",
        }
    }
}
