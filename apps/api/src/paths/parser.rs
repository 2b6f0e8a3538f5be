//! Career-path parsers for the minimal, full and details variants.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::models::limits::{
    DESCRIPTION_CHARS, ID_CHARS, LONG_TEXT_CHARS, NAME_CHARS, REQUIRED_SKILLS,
};
use crate::models::{CareerPath, CareerPathDetails, CareerPathMinimal, Level};
use crate::recovery::normalize::{
    clip, clamp_score, expand_keys, normalize_enum_field, normalize_level, slugify, string_list,
    text,
};
use crate::recovery::{self, FieldSpec, RecoveryError};

pub const TASK_MINIMAL: &str = "paths";
pub const TASK_FULL: &str = "paths_full";
pub const TASK_DETAILS: &str = "path_details";

/// Score used when the model omitted one.
const DEFAULT_SCORE: u8 = 50;

const PATH_ALIASES: &[(&str, &str)] = &[
    ("id", "roleId"),
    ("n", "roleName"),
    ("d", "description"),
    ("md", "marketDemandScore"),
    ("ia", "industryAlignmentScore"),
    ("s", "requiredSkills"),
    ("e", "effortLevel"),
    ("r", "rewardPotential"),
];

const LIST_FIELDS: &[FieldSpec] = &[
    FieldSpec::object_list("p"),
    FieldSpec::object_list("paths"),
    FieldSpec::object_list("careerPaths"),
];

const DETAIL_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("roleId"),
    FieldSpec::text("roleName"),
    FieldSpec::text("effortLevel"),
    FieldSpec::text("rewardPotential"),
    FieldSpec::text("reasoning"),
];

/// Path objects from `{"p": [...]}`, `{"paths": [...]}`, `{"careerPaths": [...]}` or a bare array.
fn path_items(value: Value) -> Vec<Map<String, Value>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => ["p", "paths", "careerPaths"]
            .iter()
            .find_map(|key| match obj.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    };
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(obj) => Some(obj),
            _ => None,
        })
        .collect()
}

/// Appends `-2`, `-3`, ... until `base` is unused.
fn unique_id(base: String, seen: &mut HashSet<String>) -> String {
    let mut candidate = base.clone();
    let mut n = 2;
    while !seen.insert(candidate.clone()) {
        candidate = format!("{base}-{n}");
        n += 1;
    }
    candidate
}

/// Expands keys and fills the fields shared by both path variants.
/// Returns `None` for entries without a role name.
fn normalize_path(
    mut obj: Map<String, Value>,
    seen: &mut HashSet<String>,
) -> Option<Map<String, Value>> {
    expand_keys(&mut obj, PATH_ALIASES);
    let role_name = text(&obj, "roleName", NAME_CHARS)?;

    let slug = text(&obj, "roleId", ID_CHARS)
        .map(|id| slugify(&id))
        .unwrap_or_else(|| slugify(&role_name));
    // Leaves room for a `-N` suffix.
    let base_id = clip(&slug, ID_CHARS - 4).trim_end_matches('-').to_string();
    let role_id = unique_id(base_id, seen);
    let description = text(&obj, "description", DESCRIPTION_CHARS)
        .unwrap_or_else(|| format!("Move into a {role_name} role."));

    let mut path = Map::new();
    path.insert("roleId".into(), Value::from(role_id));
    path.insert("roleName".into(), Value::from(role_name));
    path.insert("description".into(), Value::from(description));
    for key in ["marketDemandScore", "industryAlignmentScore"] {
        let score = clamp_score(obj.get(key)).unwrap_or(DEFAULT_SCORE);
        path.insert(key.into(), Value::from(score));
    }
    path.insert(
        "requiredSkills".into(),
        Value::from(string_list(obj.get("requiredSkills"), REQUIRED_SKILLS)),
    );

    for key in ["effortLevel", "rewardPotential"] {
        if let Some(value) = obj.remove(key) {
            path.insert(key.into(), value);
        }
    }
    if let Some(reasoning) = text(&obj, "reasoning", LONG_TEXT_CHARS) {
        path.insert("reasoning".into(), Value::from(reasoning));
    }
    Some(path)
}

fn normalized_paths(raw: &str, task: &'static str, count: usize) -> Result<Vec<Map<String, Value>>, RecoveryError> {
    let recovered = recovery::recover_json(raw, task, LIST_FIELDS)?;
    let mut seen = HashSet::new();
    Ok(path_items(recovered.value)
        .into_iter()
        .filter_map(|obj| normalize_path(obj, &mut seen))
        .take(count)
        .collect())
}

pub fn parse_minimal(raw: &str, count: usize) -> Result<Vec<CareerPathMinimal>, RecoveryError> {
    let paths = normalized_paths(raw, TASK_MINIMAL, count)?
        .into_iter()
        .map(|mut path| {
            for key in ["effortLevel", "rewardPotential", "reasoning"] {
                path.remove(key);
            }
            Value::Object(path)
        })
        .collect();
    recovery::finish(Value::Array(paths), TASK_MINIMAL)
}

pub fn parse_full(raw: &str, count: usize) -> Result<Vec<CareerPath>, RecoveryError> {
    let paths = normalized_paths(raw, TASK_FULL, count)?
        .into_iter()
        .map(|mut path| {
            let fallback_level = Level::Medium.as_str();
            normalize_enum_field(&mut path, "effortLevel", normalize_level, fallback_level);
            normalize_enum_field(&mut path, "rewardPotential", normalize_level, fallback_level);
            if text(&path, "reasoning", LONG_TEXT_CHARS).is_none() {
                let description = path.get("description").cloned().unwrap_or_default();
                path.insert("reasoning".into(), description);
            }
            Value::Object(path)
        })
        .collect();
    recovery::finish(Value::Array(paths), TASK_FULL)
}

/// The requested id and name always win so the client can match the reply to its selection.
pub fn parse_details(
    raw: &str,
    role_id: &str,
    role_name: &str,
) -> Result<CareerPathDetails, RecoveryError> {
    let recovered = recovery::recover_json(raw, TASK_DETAILS, DETAIL_FIELDS)?;
    let mut obj = match recovered.value {
        Value::Object(obj) => obj,
        Value::Array(items) => items
            .into_iter()
            .find_map(|item| match item {
                Value::Object(obj) => Some(obj),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Map::new(),
    };
    expand_keys(&mut obj, PATH_ALIASES);

    obj.insert("roleId".into(), Value::from(role_id));
    obj.insert("roleName".into(), Value::from(role_name));
    normalize_enum_field(&mut obj, "effortLevel", normalize_level, Level::Medium.as_str());
    normalize_enum_field(&mut obj, "rewardPotential", normalize_level, Level::Medium.as_str());
    if let Some(reasoning) = text(&obj, "reasoning", LONG_TEXT_CHARS) {
        obj.insert("reasoning".into(), Value::from(reasoning));
    }

    recovery::finish(Value::Object(obj), TASK_DETAILS)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{"p":[
        {"id":"staff-engineer","n":"Staff Engineer","d":"Lead technical direction.","md":88,"ia":92,"s":["System design","Mentoring"]},
        {"id":"engineering-manager","n":"Engineering Manager","d":"Lead a team.","md":80,"ia":85,"s":["People management"]}
    ]}"#;

    #[test]
    fn test_minimal_expands_compressed_keys() {
        let paths = parse_minimal(MINIMAL, 5).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].role_id, "staff-engineer");
        assert_eq!(paths[0].role_name, "Staff Engineer");
        assert_eq!(paths[0].market_demand_score, 88);
        assert_eq!(paths[1].required_skills, vec!["People management"]);
    }

    #[test]
    fn test_minimal_truncated_mid_array_keeps_complete_paths() {
        let cut = MINIMAL.find(r#"{"id":"engineering-manager""#).unwrap() + 30;
        let paths = parse_minimal(&MINIMAL[..cut], 5).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].role_id, "staff-engineer");
    }

    #[test]
    fn test_duplicate_and_missing_ids_are_made_unique() {
        let raw = r#"[
            {"roleId": "architect", "roleName": "Solutions Architect", "description": "x"},
            {"roleId": "architect", "roleName": "Cloud Architect", "description": "y"},
            {"roleName": "Platform Lead", "description": "z"}
        ]"#;
        let ids: Vec<_> = parse_minimal(raw, 5)
            .unwrap()
            .into_iter()
            .map(|p| p.role_id)
            .collect();
        assert_eq!(ids, vec!["architect", "architect-2", "platform-lead"]);
    }

    #[test]
    fn test_scores_clamped_and_defaulted() {
        let raw = r#"{"p":[{"n":"Data Engineer","d":"Pipelines.","md":140,"ia":"-3"}]}"#;
        let path = &parse_minimal(raw, 5).unwrap()[0];
        assert_eq!(path.market_demand_score, 100);
        assert_eq!(path.industry_alignment_score, 0);

        let raw = r#"{"p":[{"n":"Data Engineer","d":"Pipelines."}]}"#;
        assert_eq!(parse_minimal(raw, 5).unwrap()[0].market_demand_score, DEFAULT_SCORE);
    }

    #[test]
    fn test_count_caps_output() {
        assert_eq!(parse_minimal(MINIMAL, 1).unwrap().len(), 1);
    }

    #[test]
    fn test_no_usable_paths_is_error() {
        assert!(parse_minimal(r#"{"p": [{"d": "nameless"}]}"#, 5).is_err());
    }

    #[test]
    fn test_full_normalizes_levels_and_fills_reasoning() {
        let raw = r#"{"paths":[{"roleId":"ml-engineer","roleName":"ML Engineer","description":"Ship models.",
            "marketDemandScore":90,"industryAlignmentScore":60,"requiredSkills":["Python"],
            "effortLevel":"Very High","rewardPotential":"high"}]}"#;
        let path = &parse_full(raw, 5).unwrap()[0];
        assert_eq!(path.effort_level, Level::High);
        assert_eq!(path.reward_potential, Level::High);
        assert_eq!(path.reasoning, "Ship models.");
    }

    #[test]
    fn test_details_keep_requested_identity() {
        let raw = r#"```json
{"roleId": "something-else", "roleName": "Other", "effortLevel": "Very Low", "rewardPotential": "Medium", "reasoning": "Good fit."}
```"#;
        let details = parse_details(raw, "staff-engineer", "Staff Engineer").unwrap();
        assert_eq!(details.role_id, "staff-engineer");
        assert_eq!(details.role_name, "Staff Engineer");
        assert_eq!(details.effort_level, Level::Low);
        assert_eq!(details.reasoning, "Good fit.");
    }

    #[test]
    fn test_details_without_reasoning_is_unusable() {
        let raw = r#"{"effortLevel": "High", "rewardPotential": "High"}"#;
        assert!(parse_details(raw, "x", "X").is_err());
    }

    #[test]
    fn test_oversized_fields_are_capped_not_rejected() {
        let skills: Vec<String> = (0..50).map(|i| format!("Skill {i}")).collect();
        let raw = serde_json::json!({"paths": [{
            "roleId": "a".repeat(200),
            "roleName": "Principal Engineer",
            "description": "d".repeat(1500),
            "requiredSkills": skills,
            "effortLevel": "High",
            "rewardPotential": "High",
            "reasoning": "r".repeat(3500)
        }]})
        .to_string();
        let path = &parse_full(&raw, 5).unwrap()[0];
        assert!(path.role_id.chars().count() <= ID_CHARS);
        assert_eq!(path.description.chars().count(), DESCRIPTION_CHARS);
        assert_eq!(path.required_skills.len(), REQUIRED_SKILLS);
        assert_eq!(path.required_skills[0], "Skill 0");
        assert_eq!(path.reasoning.chars().count(), LONG_TEXT_CHARS);
    }
}
