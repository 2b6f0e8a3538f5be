use serde::{Deserialize, Serialize};

use super::limits::*;
use super::{require_items, require_text, Validate};

pub const MAX_YEARS_OF_EXPERIENCE: f64 = 60.0;

/// Structured profile interpreted from free-text resume content.
/// Produced once per session and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub current_role: String,
    pub years_of_experience: f64,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub strength_areas: Vec<String>,
    #[serde(default)]
    pub industry_background: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<String>>,
}

impl Validate for ResumeProfile {
    fn validate(&self) -> Result<(), String> {
        require_text("currentRole", &self.current_role, NAME_CHARS)?;
        if !self.years_of_experience.is_finite() || self.years_of_experience < 0.0 {
            return Err("yearsOfExperience must be a non-negative number".to_string());
        }
        if self.years_of_experience > MAX_YEARS_OF_EXPERIENCE {
            return Err(format!(
                "yearsOfExperience must be at most {MAX_YEARS_OF_EXPERIENCE}"
            ));
        }
        require_items("techStack", &self.tech_stack, TECH_STACK)?;
        require_items("strengthAreas", &self.strength_areas, STRENGTH_AREAS)?;
        if self.industry_background.chars().count() > INDUSTRY_CHARS {
            return Err(format!(
                "industryBackground must be at most {INDUSTRY_CHARS} characters"
            ));
        }
        if let Some(certs) = &self.certifications {
            require_items("certifications", certs, CERTIFICATIONS)?;
        }
        if let Some(education) = &self.education {
            require_items("education", education, EDUCATION)?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_profile() -> ResumeProfile {
        ResumeProfile {
            name: Some("Alex Doe".to_string()),
            current_role: "Senior Software Engineer".to_string(),
            years_of_experience: 5.0,
            tech_stack: vec![
                "React".to_string(),
                "Node".to_string(),
                "AWS".to_string(),
                "PostgreSQL".to_string(),
            ],
            strength_areas: vec!["Frontend architecture".to_string()],
            industry_background: "Fintech".to_string(),
            certifications: None,
            education: Some(vec!["BSc Computer Science".to_string()]),
        }
    }

    #[test]
    fn test_profile_camel_case_roundtrip() {
        let json = r#"{
            "currentRole": "Data Analyst",
            "yearsOfExperience": 3,
            "techStack": ["SQL", "Python"],
            "strengthAreas": ["Reporting"],
            "industryBackground": "Retail"
        }"#;
        let profile: ResumeProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.current_role, "Data Analyst");
        assert_eq!(profile.years_of_experience, 3.0);
        assert!(profile.name.is_none());

        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["techStack"][1], "Python");
        assert!(value.get("certifications").is_none());
    }

    #[test]
    fn test_valid_profile_passes() {
        assert!(sample_profile().validate().is_ok());
    }

    #[test]
    fn test_negative_years_rejected_with_field_name() {
        let mut profile = sample_profile();
        profile.years_of_experience = -1.0;
        let err = profile.validate().unwrap_err();
        assert!(err.starts_with("yearsOfExperience"));
    }

    #[test]
    fn test_missing_role_rejected() {
        let mut profile = sample_profile();
        profile.current_role = "".to_string();
        assert_eq!(profile.validate().unwrap_err(), "currentRole is required");
    }

    #[test]
    fn test_blank_tech_entry_rejected() {
        let mut profile = sample_profile();
        profile.tech_stack.push("  ".to_string());
        assert_eq!(
            profile.validate().unwrap_err(),
            "techStack[4] must not be empty"
        );
    }
}
