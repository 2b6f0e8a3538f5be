pub mod career_path;
pub mod levels;
pub mod profile;
pub mod roadmap;
pub mod skill_gap;

/// Size caps enforced by `Validate` and applied by the output normalizers.
pub mod limits {
    pub const ID_CHARS: usize = 120;
    pub const NAME_CHARS: usize = 200;
    pub const DESCRIPTION_CHARS: usize = 1200;
    pub const LONG_TEXT_CHARS: usize = 3000;
    pub const DURATION_CHARS: usize = 100;
    pub const DIRECTION_CHARS: usize = 2000;
    pub const INDUSTRY_CHARS: usize = 300;

    pub const TECH_STACK: usize = 60;
    pub const STRENGTH_AREAS: usize = 30;
    pub const CERTIFICATIONS: usize = 30;
    pub const EDUCATION: usize = 20;
    pub const REQUIRED_SKILLS: usize = 40;
    pub const LEARNING_RESOURCES: usize = 20;
    pub const PHASE_ITEMS: usize = 20;
    pub const ACTION_ITEMS: usize = 30;
    pub const ROADMAP_NOTES: usize = 20;
}

pub use career_path::{CareerPath, CareerPathDetails, CareerPathMinimal};
pub use levels::{Level, Proficiency};
pub use profile::ResumeProfile;
pub use roadmap::{CareerRoadmap, RoadmapPhase};
pub use skill_gap::{SkillGap, SkillGapAnalysis};

/// Strict schema check run on request bodies and on recovered model output.
pub trait Validate {
    /// Returns the first violated constraint. Messages start with the field name.
    fn validate(&self) -> Result<(), String>;
}

/// Prefixes a nested validation message with its parent field.
pub fn within(parent: &str, result: Result<(), String>) -> Result<(), String> {
    result.map_err(|e| format!("{parent}.{e}"))
}

pub(crate) fn require_text(field: &str, value: &str, max_chars: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    if value.chars().count() > max_chars {
        return Err(format!("{field} must be at most {max_chars} characters"));
    }
    Ok(())
}

pub(crate) fn require_items(field: &str, items: &[String], max_items: usize) -> Result<(), String> {
    if items.len() > max_items {
        return Err(format!("{field} must have at most {max_items} entries"));
    }
    if let Some(idx) = items.iter().position(|s| s.trim().is_empty()) {
        return Err(format!("{field}[{idx}] must not be empty"));
    }
    Ok(())
}

pub(crate) fn require_score(field: &str, value: u8) -> Result<(), String> {
    if value > 100 {
        return Err(format!("{field} must be between 0 and 100"));
    }
    Ok(())
}
