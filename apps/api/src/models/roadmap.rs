use serde::{Deserialize, Serialize};

use super::limits::*;
use super::{require_items, require_text, Validate};

pub const MIN_TIMELINE_MONTHS: u32 = 1;
pub const MAX_TIMELINE_MONTHS: u32 = 24;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapPhase {
    pub phase_number: u32,
    pub duration: String,
    #[serde(default)]
    pub skills_focus: Vec<String>,
    pub learning_direction: String,
    #[serde(default)]
    pub project_ideas: Vec<String>,
    #[serde(default)]
    pub milestones: Vec<String>,
    #[serde(default)]
    pub action_items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerRoadmap {
    pub career_path_id: String,
    pub target_role: String,
    pub timeline_months: u32,
    pub phases: Vec<RoadmapPhase>,
    #[serde(default)]
    pub success_metrics: Vec<String>,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    #[serde(default)]
    pub support_resources: Vec<String>,
}

impl Validate for RoadmapPhase {
    fn validate(&self) -> Result<(), String> {
        if self.phase_number == 0 {
            return Err("phaseNumber must be >= 1".to_string());
        }
        require_text("duration", &self.duration, DURATION_CHARS)?;
        require_items("skillsFocus", &self.skills_focus, PHASE_ITEMS)?;
        require_text("learningDirection", &self.learning_direction, DIRECTION_CHARS)?;
        require_items("projectIdeas", &self.project_ideas, PHASE_ITEMS)?;
        require_items("milestones", &self.milestones, PHASE_ITEMS)?;
        require_items("actionItems", &self.action_items, ACTION_ITEMS)
    }
}

impl Validate for CareerRoadmap {
    fn validate(&self) -> Result<(), String> {
        require_text("careerPathId", &self.career_path_id, ID_CHARS)?;
        require_text("targetRole", &self.target_role, NAME_CHARS)?;
        if !(MIN_TIMELINE_MONTHS..=MAX_TIMELINE_MONTHS).contains(&self.timeline_months) {
            return Err(format!(
                "timelineMonths must be between {MIN_TIMELINE_MONTHS} and {MAX_TIMELINE_MONTHS}"
            ));
        }
        if self.phases.is_empty() {
            return Err("phases must contain at least one entry".to_string());
        }
        for (idx, phase) in self.phases.iter().enumerate() {
            phase.validate().map_err(|e| format!("phases[{idx}].{e}"))?;
            if phase.phase_number as usize != idx + 1 {
                return Err(format!(
                    "phases[{idx}].phaseNumber must be {} (phases are numbered from 1)",
                    idx + 1
                ));
            }
        }
        require_items("successMetrics", &self.success_metrics, ROADMAP_NOTES)?;
        require_items("riskFactors", &self.risk_factors, ROADMAP_NOTES)?;
        require_items("supportResources", &self.support_resources, ROADMAP_NOTES)
    }
}
