// Shared prompt constants and prompt-building utilities.
// Each task module that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::models::ResumeProfile;

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured career advisor. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every task prompt, right before the model starts writing.
pub const RAW_JSON_INSTRUCTION: &str = "\
    Return ONLY the raw JSON object. No prose before or after it, no ``` fences. \
    Keep strings short so the whole object fits in the response.";

/// Closed vocabulary for Low/Medium/High ordinals, spelled out for the model.
pub const LEVEL_VOCABULARY: &str = "EXACT: \"Low\" | \"Medium\" | \"High\" (never \"Very High\" or \"Very Low\")";

/// Closed vocabulary for proficiency ordinals.
pub const PROFICIENCY_VOCABULARY: &str =
    "EXACT: \"None\" | \"Beginner\" | \"Intermediate\" | \"Advanced\" | \"Expert\"";

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([a-z_]+)\}").expect("static regex"))
}

/// Fills `{name}` placeholders in a single pass; substituted text is never re-scanned.
/// Placeholders without a value are left as written.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    placeholder_re()
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(name, _)| *name == &caps[1])
                .map_or_else(|| caps[0].to_string(), |(_, value)| value.to_string())
        })
        .into_owned()
}

/// Candidate summary block shared by every task that takes a profile.
pub fn profile_block(profile: &ResumeProfile) -> String {
    let mut block = format!(
        "CANDIDATE PROFILE:\n\
         - Current role: {}\n\
         - Years of experience: {}\n\
         - Tech stack: {}\n\
         - Strength areas: {}\n\
         - Industry: {}",
        profile.current_role,
        profile.years_of_experience,
        join_or_none(&profile.tech_stack),
        join_or_none(&profile.strength_areas),
        if profile.industry_background.trim().is_empty() {
            "not stated"
        } else {
            profile.industry_background.as_str()
        },
    );
    if let Some(certs) = profile.certifications.as_deref().filter(|c| !c.is_empty()) {
        block.push_str(&format!("\n- Certifications: {}", certs.join(", ")));
    }
    block
}

/// Renders a list as a comma-separated line, or a placeholder when empty.
pub fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none listed".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_does_not_expand_inserted_text() {
        let filled = fill_template(
            "Resume: {resume_text}\n{raw_json}",
            &[("resume_text", "I wrote {raw_json} and {levels}"), ("raw_json", "JSON ONLY")],
        );
        assert_eq!(filled, "Resume: I wrote {raw_json} and {levels}\nJSON ONLY");
    }

    #[test]
    fn test_fill_template_keeps_unknown_placeholders_and_json_braces() {
        let filled = fill_template(r#"{"p":[{"id":"x"}]} {count} {other}"#, &[("count", "5")]);
        assert_eq!(filled, r#"{"p":[{"id":"x"}]} 5 {other}"#);
    }

    #[test]
    fn test_join_or_none() {
        assert_eq!(join_or_none(&[]), "none listed");
        assert_eq!(
            join_or_none(&["Rust".to_string(), "Go".to_string()]),
            "Rust, Go"
        );
    }

    #[test]
    fn test_profile_block_lists_stack_in_order() {
        let profile = crate::models::profile::tests::sample_profile();
        let block = profile_block(&profile);
        assert!(block.contains("Current role: Senior Software Engineer"));
        assert!(block.contains("Tech stack: React, Node, AWS, PostgreSQL"));
        assert!(!block.contains("Certifications"));
    }

    #[test]
    fn test_vocabularies_forbid_very_variants() {
        assert!(LEVEL_VOCABULARY.contains("never \"Very High\""));
        assert!(PROFICIENCY_VOCABULARY.contains("\"Expert\""));
    }
}
