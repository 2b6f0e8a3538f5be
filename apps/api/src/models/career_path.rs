use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::limits::*;
use super::{require_items, require_score, require_text, Level, Validate};

/// Reduced projection shown in the selection list. Cheap to generate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerPathMinimal {
    pub role_id: String,
    pub role_name: String,
    pub description: String,
    pub market_demand_score: u8,
    pub industry_alignment_score: u8,
    #[serde(default)]
    pub required_skills: Vec<String>,
}

/// Full candidate path, produced by the legacy full variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerPath {
    pub role_id: String,
    pub role_name: String,
    pub description: String,
    pub market_demand_score: u8,
    pub industry_alignment_score: u8,
    #[serde(default)]
    pub required_skills: Vec<String>,
    pub effort_level: Level,
    pub reward_potential: Level,
    pub reasoning: String,
}

/// Detail fields fetched lazily for the one path the user selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerPathDetails {
    pub role_id: String,
    pub role_name: String,
    pub effort_level: Level,
    pub reward_potential: Level,
    pub reasoning: String,
}

impl CareerPath {
    pub fn minimal(&self) -> CareerPathMinimal {
        CareerPathMinimal {
            role_id: self.role_id.clone(),
            role_name: self.role_name.clone(),
            description: self.description.clone(),
            market_demand_score: self.market_demand_score,
            industry_alignment_score: self.industry_alignment_score,
            required_skills: self.required_skills.clone(),
        }
    }
}

fn validate_common(
    role_id: &str,
    role_name: &str,
    description: &str,
    market_demand_score: u8,
    industry_alignment_score: u8,
    required_skills: &[String],
) -> Result<(), String> {
    require_text("roleId", role_id, ID_CHARS)?;
    require_text("roleName", role_name, NAME_CHARS)?;
    require_text("description", description, DESCRIPTION_CHARS)?;
    require_score("marketDemandScore", market_demand_score)?;
    require_score("industryAlignmentScore", industry_alignment_score)?;
    require_items("requiredSkills", required_skills, REQUIRED_SKILLS)
}

impl Validate for CareerPathMinimal {
    fn validate(&self) -> Result<(), String> {
        validate_common(
            &self.role_id,
            &self.role_name,
            &self.description,
            self.market_demand_score,
            self.industry_alignment_score,
            &self.required_skills,
        )
    }
}

impl Validate for CareerPath {
    fn validate(&self) -> Result<(), String> {
        validate_common(
            &self.role_id,
            &self.role_name,
            &self.description,
            self.market_demand_score,
            self.industry_alignment_score,
            &self.required_skills,
        )?;
        require_text("reasoning", &self.reasoning, LONG_TEXT_CHARS)
    }
}

impl Validate for CareerPathDetails {
    fn validate(&self) -> Result<(), String> {
        require_text("roleId", &self.role_id, ID_CHARS)?;
        require_text("roleName", &self.role_name, NAME_CHARS)?;
        require_text("reasoning", &self.reasoning, LONG_TEXT_CHARS)
    }
}

/// Validates every path and checks that `roleId` is unique within the batch.
pub fn validate_batch<'a, T, F>(paths: &'a [T], role_id: F) -> Result<(), String>
where
    T: Validate,
    F: Fn(&'a T) -> &'a str,
{
    if paths.is_empty() {
        return Err("paths must contain at least one entry".to_string());
    }
    let mut seen = HashSet::new();
    for (idx, path) in paths.iter().enumerate() {
        path.validate().map_err(|e| format!("paths[{idx}].{e}"))?;
        if !seen.insert(role_id(path)) {
            return Err(format!("paths[{idx}].roleId '{}' is duplicated", role_id(path)));
        }
    }
    Ok(())
}

impl Validate for Vec<CareerPathMinimal> {
    fn validate(&self) -> Result<(), String> {
        validate_batch(self, |p| p.role_id.as_str())
    }
}

impl Validate for Vec<CareerPath> {
    fn validate(&self) -> Result<(), String> {
        validate_batch(self, |p| p.role_id.as_str())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_path() -> CareerPath {
        CareerPath {
            role_id: "staff-frontend-engineer".to_string(),
            role_name: "Staff Frontend Engineer".to_string(),
            description: "Own frontend architecture across product teams.".to_string(),
            market_demand_score: 82,
            industry_alignment_score: 90,
            required_skills: vec![
                "System design".to_string(),
                "TypeScript".to_string(),
                "Mentoring".to_string(),
            ],
            effort_level: Level::Medium,
            reward_potential: Level::High,
            reasoning: "Builds directly on current React depth.".to_string(),
        }
    }

    #[test]
    fn test_full_path_deserializes_camel_case() {
        let json = r#"{
            "roleId": "ml-engineer",
            "roleName": "ML Engineer",
            "description": "Ship models to production.",
            "marketDemandScore": 88,
            "industryAlignmentScore": 60,
            "requiredSkills": ["Python", "MLOps"],
            "effortLevel": "High",
            "rewardPotential": "High",
            "reasoning": "Strong demand."
        }"#;
        let path: CareerPath = serde_json::from_str(json).unwrap();
        assert_eq!(path.effort_level, Level::High);
        assert_eq!(path.required_skills.len(), 2);
        assert!(path.validate().is_ok());
    }

    #[test]
    fn test_minimal_projection_keeps_shared_fields() {
        let path = sample_path();
        let minimal = path.minimal();
        assert_eq!(minimal.role_id, path.role_id);
        assert_eq!(minimal.market_demand_score, 82);
        assert_eq!(minimal.required_skills, path.required_skills);
    }

    #[test]
    fn test_score_above_100_rejected() {
        let mut path = sample_path().minimal();
        path.market_demand_score = 140;
        assert_eq!(
            path.validate().unwrap_err(),
            "marketDemandScore must be between 0 and 100"
        );
    }

    #[test]
    fn test_batch_rejects_duplicate_role_ids() {
        let paths = vec![sample_path(), sample_path()];
        let err = validate_batch(&paths, |p| p.role_id.as_str()).unwrap_err();
        assert!(err.contains("paths[1].roleId"));
    }

    #[test]
    fn test_batch_rejects_empty() {
        let paths: Vec<CareerPathMinimal> = vec![];
        assert!(validate_batch(&paths, |p| p.role_id.as_str()).is_err());
    }
}
