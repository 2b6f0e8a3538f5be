use serde::{Deserialize, Serialize};

use super::limits::*;
use super::{require_items, require_text, Level, Proficiency, Validate};

/// One row per required skill of the target path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGap {
    pub skill_name: String,
    pub current_level: Proficiency,
    pub required_level: Proficiency,
    pub importance: Level,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_resources: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGapAnalysis {
    pub career_path_id: String,
    pub target_role: String,
    pub skill_gaps: Vec<SkillGap>,
    pub overall_gap_severity: Level,
    pub estimated_time_to_close: String,
    pub summary: String,
}

impl Validate for SkillGap {
    fn validate(&self) -> Result<(), String> {
        require_text("skillName", &self.skill_name, NAME_CHARS)?;
        if let Some(resources) = &self.learning_resources {
            require_items("learningResources", resources, LEARNING_RESOURCES)?;
        }
        Ok(())
    }
}

impl Validate for SkillGapAnalysis {
    fn validate(&self) -> Result<(), String> {
        require_text("careerPathId", &self.career_path_id, ID_CHARS)?;
        require_text("targetRole", &self.target_role, NAME_CHARS)?;
        if self.skill_gaps.is_empty() {
            return Err("skillGaps must contain at least one entry".to_string());
        }
        for (idx, gap) in self.skill_gaps.iter().enumerate() {
            gap.validate().map_err(|e| format!("skillGaps[{idx}].{e}"))?;
        }
        if self
            .skill_gaps
            .windows(2)
            .any(|pair| pair[0].importance < pair[1].importance)
        {
            return Err("skillGaps must be ordered by descending importance".to_string());
        }
        require_text("estimatedTimeToClose", &self.estimated_time_to_close, NAME_CHARS)?;
        require_text("summary", &self.summary, LONG_TEXT_CHARS)
    }
}
