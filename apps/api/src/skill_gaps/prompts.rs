// Prompt constants for skill-gap analysis.

use serde_json::{json, Value};

pub const SKILL_GAP_PROMPT_TEMPLATE: &str = r#"Compare the candidate with the target role and list the skill gaps.

{profile}

TARGET ROLE: {role_name} (id: {role_id})
{description}
Required skills: {required_skills}

Return a JSON object with this EXACT shape:
{
  "careerPathId": "{role_id}",
  "targetRole": "{role_name}",
  "skillGaps": [
    {
      "skillName": "Skill",
      "currentLevel": "Beginner",
      "requiredLevel": "Advanced",
      "importance": "High",
      "learningResources": ["Short resource name"]
    }
  ],
  "overallGapSeverity": "Medium",
  "estimatedTimeToClose": "6-9 months",
  "summary": "Two or three sentences."
}

Rules:
- One entry per required skill, plus at most 3 other critical gaps. At most 10 entries.
- currentLevel and requiredLevel: {proficiency}.
- importance and overallGapSeverity: {levels}.
- Order skillGaps by importance: High first, then Medium, then Low.
- At most 3 learningResources per gap.

{raw_json}"#;

pub fn skill_gap_schema() -> Value {
    let proficiency = json!({
        "type": "string",
        "enum": ["None", "Beginner", "Intermediate", "Advanced", "Expert"]
    });
    let level = json!({"type": "string", "enum": ["Low", "Medium", "High"]});
    json!({
        "type": "object",
        "properties": {
            "careerPathId": {"type": "string"},
            "targetRole": {"type": "string"},
            "skillGaps": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "skillName": {"type": "string"},
                        "currentLevel": proficiency,
                        "requiredLevel": proficiency,
                        "importance": level,
                        "learningResources": {"type": "array", "items": {"type": "string"}}
                    },
                    "required": ["skillName", "currentLevel", "requiredLevel", "importance"]
                }
            },
            "overallGapSeverity": level,
            "estimatedTimeToClose": {"type": "string"},
            "summary": {"type": "string"}
        },
        "required": ["careerPathId", "targetRole", "skillGaps", "overallGapSeverity", "estimatedTimeToClose", "summary"]
    })
}
