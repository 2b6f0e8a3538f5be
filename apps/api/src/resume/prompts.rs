// Prompt constants for resume interpretation.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for resume interpretation.
pub const INTERPRET_SYSTEM: &str = "You are an expert technical recruiter. \
    Read a resume and summarise the candidate as structured data. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Interpretation prompt template. Replace `{resume_text}` and `{raw_json}` before sending.
pub const INTERPRET_PROMPT_TEMPLATE: &str = r#"Interpret the resume below into a candidate profile.

Return a JSON object with this EXACT shape:
{
  "name": "Full name, or null if absent",
  "currentRole": "Most recent job title",
  "yearsOfExperience": 5,
  "techStack": ["Languages, frameworks and platforms in the order they appear"],
  "strengthAreas": ["2-5 short phrases"],
  "industryBackground": "Primary industry or domain",
  "certifications": ["Only if listed, otherwise omit"],
  "education": ["Degree, institution"]
}

Rules:
- yearsOfExperience is a non-negative number of professional years. Estimate from dates if not stated.
- Keep techStack entries as written in the resume (e.g. "React", "Node", "AWS"), at most 20.
- Never invent employers, degrees or certifications.

RESUME:
{resume_text}

{raw_json}"#;
