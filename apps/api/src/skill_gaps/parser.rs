//! Skill-gap parser. Gaps always come back non-empty and ordered by importance.

use serde_json::{Map, Value};
use tracing::warn;

use crate::models::limits::{ID_CHARS, LEARNING_RESOURCES, LONG_TEXT_CHARS, NAME_CHARS};
use crate::models::{CareerPathMinimal, Level, Proficiency, ResumeProfile, SkillGap, SkillGapAnalysis};
use crate::recovery::normalize::{
    clip, expand_keys, normalize_enum_field, normalize_level, normalize_proficiency, object_items,
    string_list, text,
};
use crate::recovery::{self, FieldSpec, RecoveryError};

pub const TASK: &str = "skill_gaps";

/// Upper bound on derived gaps when the model produced none.
const MAX_DERIVED_GAPS: usize = 8;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("careerPathId"),
    FieldSpec::text("targetRole"),
    FieldSpec::object_list("skillGaps"),
    FieldSpec::text("overallGapSeverity"),
    FieldSpec::text("estimatedTimeToClose"),
    FieldSpec::text("summary"),
];

const GAP_ALIASES: &[(&str, &str)] = &[
    ("skill", "skillName"),
    ("name", "skillName"),
    ("current", "currentLevel"),
    ("required", "requiredLevel"),
    ("resources", "learningResources"),
];

/// Deterministic gaps from the path's required skills, checked against the tech stack.
pub fn derived_gaps(profile: &ResumeProfile, path: &CareerPathMinimal) -> Vec<SkillGap> {
    let skills: Vec<String> = if path.required_skills.is_empty() {
        vec![format!("{} fundamentals", path.role_name)]
    } else {
        path.required_skills
            .iter()
            .take(MAX_DERIVED_GAPS)
            .cloned()
            .collect()
    };

    let mut gaps: Vec<SkillGap> = skills
        .into_iter()
        .map(|skill| {
            let known = profile
                .tech_stack
                .iter()
                .chain(&profile.strength_areas)
                .any(|have| have.eq_ignore_ascii_case(&skill));
            SkillGap {
                skill_name: clip(&skill, NAME_CHARS),
                current_level: if known {
                    Proficiency::Intermediate
                } else {
                    Proficiency::None
                },
                required_level: Proficiency::Advanced,
                importance: if known { Level::Medium } else { Level::High },
                learning_resources: None,
            }
        })
        .collect();
    sort_by_importance(&mut gaps);
    gaps
}

/// Stable: equal-importance gaps keep the model's order.
pub fn sort_by_importance(gaps: &mut [SkillGap]) {
    gaps.sort_by(|a, b| b.importance.cmp(&a.importance));
}

fn normalize_gap(mut obj: Map<String, Value>) -> Option<Value> {
    expand_keys(&mut obj, GAP_ALIASES);
    let skill_name = text(&obj, "skillName", NAME_CHARS)?;

    let mut gap = Map::new();
    gap.insert("skillName".into(), Value::from(skill_name));
    for (key, default) in [("currentLevel", "None"), ("requiredLevel", "Advanced")] {
        if let Some(value) = obj.remove(key) {
            gap.insert(key.into(), value);
        }
        normalize_enum_field(&mut gap, key, normalize_proficiency, default);
    }
    if let Some(value) = obj.remove("importance") {
        gap.insert("importance".into(), value);
    }
    normalize_enum_field(&mut gap, "importance", normalize_level, Level::Medium.as_str());

    let resources = string_list(obj.get("learningResources"), LEARNING_RESOURCES);
    if !resources.is_empty() {
        gap.insert("learningResources".into(), Value::from(resources));
    }
    Some(Value::Object(gap))
}

pub fn parse_analysis(
    raw: &str,
    profile: &ResumeProfile,
    path: &CareerPathMinimal,
) -> Result<SkillGapAnalysis, RecoveryError> {
    let recovered = recovery::recover_json(raw, TASK, FIELDS)?;
    let mut obj = match recovered.value {
        Value::Object(obj) => obj,
        // A bare array is read as the gap list itself.
        Value::Array(items) => {
            let mut obj = Map::new();
            obj.insert("skillGaps".into(), Value::Array(items));
            obj
        }
        _ => Map::new(),
    };

    let gaps: Vec<Value> = object_items(&mut obj, "skillGaps")
        .into_iter()
        .filter_map(normalize_gap)
        .collect();

    let mut analysis = Map::new();
    analysis.insert(
        "careerPathId".into(),
        Value::from(text(&obj, "careerPathId", ID_CHARS).unwrap_or_else(|| path.role_id.clone())),
    );
    analysis.insert(
        "targetRole".into(),
        Value::from(text(&obj, "targetRole", NAME_CHARS).unwrap_or_else(|| path.role_name.clone())),
    );
    analysis.insert("skillGaps".into(), Value::Array(gaps));
    if let Some(severity) = obj.remove("overallGapSeverity") {
        analysis.insert("overallGapSeverity".into(), severity);
    }
    normalize_enum_field(
        &mut analysis,
        "overallGapSeverity",
        normalize_level,
        Level::Medium.as_str(),
    );
    analysis.insert(
        "estimatedTimeToClose".into(),
        Value::from(
            text(&obj, "estimatedTimeToClose", NAME_CHARS).unwrap_or_else(|| "3-6 months".to_string()),
        ),
    );
    analysis.insert(
        "summary".into(),
        Value::from(text(&obj, "summary", LONG_TEXT_CHARS).unwrap_or_else(|| {
            format!(
                "Gap analysis for moving from {} to {}.",
                profile.current_role, path.role_name
            )
        })),
    );

    let mut analysis: SkillGapAnalysis = recovery::decode(Value::Object(analysis), TASK)?;
    if analysis.skill_gaps.is_empty() {
        warn!("{TASK}: no usable gaps in response, deriving from required skills");
        analysis.skill_gaps = derived_gaps(profile, path);
    }
    sort_by_importance(&mut analysis.skill_gaps);
    recovery::check(analysis, TASK)
}
