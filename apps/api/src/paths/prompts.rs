// Prompt constants for career-path generation.
// Reuses cross-cutting fragments from llm_client::prompts.

use serde_json::{json, Value};

/// Fast variant. Compressed keys keep the output small:
/// id=roleId, n=roleName, d=description, md=marketDemandScore,
/// ia=industryAlignmentScore, s=requiredSkills.
pub const MINIMAL_PROMPT_TEMPLATE: &str = r#"Suggest {count} realistic next career moves for this candidate.

{profile}

Return a JSON object with this EXACT shape and these SHORT keys:
{"p":[{"id":"kebab-case-id","n":"Role name","d":"One or two sentences.","md":85,"ia":70,"s":["Skill","Skill"]}]}

Rules:
- Exactly {count} entries in "p", each with a unique "id".
- "md" (market demand) and "ia" (industry alignment) are integers 0-100.
- "s" lists 3-6 skills the role requires.

{raw_json}"#;

/// Legacy full variant with effort, reward and reasoning per path.
pub const FULL_PROMPT_TEMPLATE: &str = r#"Suggest {count} realistic next career moves for this candidate and explain each.

{profile}

Return a JSON object with this EXACT shape:
{
  "paths": [
    {
      "roleId": "kebab-case-id",
      "roleName": "Role name",
      "description": "One to three sentences.",
      "marketDemandScore": 85,
      "industryAlignmentScore": 70,
      "requiredSkills": ["Skill"],
      "effortLevel": "Medium",
      "rewardPotential": "High",
      "reasoning": "Why this path fits the candidate."
    }
  ]
}

Rules:
- Exactly {count} paths, each with a unique "roleId".
- Scores are integers 0-100.
- effortLevel and rewardPotential: {levels}.

{raw_json}"#;

/// Details for the single path the user selected.
pub const DETAILS_PROMPT_TEMPLATE: &str = r#"The candidate is considering the role "{role_name}" (id: {role_id}).

{profile}

Assess the move and return a JSON object with this EXACT shape:
{
  "roleId": "{role_id}",
  "roleName": "{role_name}",
  "effortLevel": "Medium",
  "rewardPotential": "High",
  "reasoning": "Two to four sentences on fit, effort and payoff."
}

effortLevel and rewardPotential: {levels}.

{raw_json}"#;

fn level_schema() -> Value {
    json!({"type": "string", "enum": ["Low", "Medium", "High"]})
}

pub fn full_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "paths": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "roleId": {"type": "string"},
                        "roleName": {"type": "string"},
                        "description": {"type": "string"},
                        "marketDemandScore": {"type": "integer"},
                        "industryAlignmentScore": {"type": "integer"},
                        "requiredSkills": {"type": "array", "items": {"type": "string"}},
                        "effortLevel": level_schema(),
                        "rewardPotential": level_schema(),
                        "reasoning": {"type": "string"}
                    },
                    "required": ["roleId", "roleName", "description", "effortLevel", "rewardPotential", "reasoning"]
                }
            }
        },
        "required": ["paths"]
    })
}

pub fn details_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "roleId": {"type": "string"},
            "roleName": {"type": "string"},
            "effortLevel": level_schema(),
            "rewardPotential": level_schema(),
            "reasoning": {"type": "string"}
        },
        "required": ["roleId", "roleName", "effortLevel", "rewardPotential", "reasoning"]
    })
}
