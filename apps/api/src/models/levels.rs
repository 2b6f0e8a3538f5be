//! Closed ordinal vocabularies shared by every schema.

use serde::{Deserialize, Serialize};

/// Three-value ordinal used for importance, severity, effort and reward.
/// Variant order gives `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    pub const VOCABULARY: [&'static str; 3] = ["Low", "Medium", "High"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "Low",
            Level::Medium => "Medium",
            Level::High => "High",
        }
    }
}

/// Five-point proficiency scale for skill gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Proficiency {
    None,
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Proficiency {
    pub const VOCABULARY: [&'static str; 5] =
        ["None", "Beginner", "Intermediate", "Advanced", "Expert"];
}
