// Prompt constants for roadmap generation.

use serde_json::{json, Value};

pub const ROADMAP_PROMPT_TEMPLATE: &str = r#"Create a {timeline}-month transition roadmap for this candidate.

{profile}

TARGET ROLE: {role_name} (id: {role_id})
Overall gap severity: {severity}
Skill gaps, most important first:
{gaps}

Return a JSON object with this EXACT shape:
{
  "careerPathId": "{role_id}",
  "targetRole": "{role_name}",
  "timelineMonths": {timeline},
  "phases": [
    {
      "phaseNumber": 1,
      "duration": "Months 1-2",
      "skillsFocus": ["Skill"],
      "learningDirection": "What to learn and how.",
      "projectIdeas": ["Concrete project"],
      "milestones": ["Verifiable outcome"],
      "actionItems": ["Specific next step"]
    }
  ],
  "successMetrics": ["Measurable signal of progress"],
  "riskFactors": ["Risk"],
  "supportResources": ["Community, mentor or course"]
}

Rules:
- EXACTLY {phase_count} phases, numbered 1 to {phase_count}, whose durations together cover {timeline} months.
- At most 4 entries in every list.
- Address the most important gaps in the earliest phases.

{raw_json}"#;

pub fn roadmap_schema() -> Value {
    let list = json!({"type": "array", "items": {"type": "string"}});
    json!({
        "type": "object",
        "properties": {
            "careerPathId": {"type": "string"},
            "targetRole": {"type": "string"},
            "timelineMonths": {"type": "integer"},
            "phases": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "phaseNumber": {"type": "integer"},
                        "duration": {"type": "string"},
                        "skillsFocus": list,
                        "learningDirection": {"type": "string"},
                        "projectIdeas": list,
                        "milestones": list,
                        "actionItems": list
                    },
                    "required": ["phaseNumber", "duration", "learningDirection"]
                }
            },
            "successMetrics": list,
            "riskFactors": list,
            "supportResources": list
        },
        "required": ["careerPathId", "targetRole", "timelineMonths", "phases"]
    })
}
