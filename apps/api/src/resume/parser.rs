//! Resume profile parser: recovery, normalization, strict validation.

use serde_json::{Map, Value};

use crate::models::limits::{
    CERTIFICATIONS, EDUCATION, INDUSTRY_CHARS, NAME_CHARS, STRENGTH_AREAS, TECH_STACK,
};
use crate::models::profile::MAX_YEARS_OF_EXPERIENCE;
use crate::models::ResumeProfile;
use crate::recovery::normalize::{string_list, text};
use crate::recovery::{self, FieldSpec, RecoveryError};

pub const TASK: &str = "interpret";

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name"),
    FieldSpec::text("currentRole"),
    FieldSpec::number("yearsOfExperience"),
    FieldSpec::text_list("techStack"),
    FieldSpec::text_list("strengthAreas"),
    FieldSpec::text("industryBackground"),
    FieldSpec::text_list("certifications"),
    FieldSpec::text_list("education"),
];

/// Reads years from a number or from the leading number of a phrase like `"5+ years"`.
fn years(value: Option<&Value>) -> f64 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let digits: String = s
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            digits.parse().ok()
        }
        _ => None,
    };
    n.filter(|n| n.is_finite())
        .map(|n| n.clamp(0.0, MAX_YEARS_OF_EXPERIENCE))
        .unwrap_or(0.0)
}

/// Case-insensitive de-duplication that keeps first-seen order.
pub(crate) fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}

fn optional_list(obj: &Map<String, Value>, key: &str, max_items: usize) -> Value {
    let items = string_list(obj.get(key), max_items);
    if items.is_empty() {
        Value::Null
    } else {
        Value::from(items)
    }
}

pub fn parse_profile(raw: &str) -> Result<ResumeProfile, RecoveryError> {
    let recovered = recovery::recover_json(raw, TASK, FIELDS)?;
    let obj = match recovered.value {
        Value::Object(obj) => obj,
        Value::Array(items) => match items.into_iter().next() {
            Some(Value::Object(obj)) => obj,
            _ => Map::new(),
        },
        _ => Map::new(),
    };

    let mut profile = Map::new();
    profile.insert("name".into(), text(&obj, "name", NAME_CHARS).map_or(Value::Null, Value::from));
    profile.insert(
        "currentRole".into(),
        Value::from(text(&obj, "currentRole", NAME_CHARS).unwrap_or_default()),
    );
    profile.insert(
        "yearsOfExperience".into(),
        Value::from(years(obj.get("yearsOfExperience"))),
    );
    profile.insert(
        "techStack".into(),
        Value::from(
            dedup_preserving_order(string_list(obj.get("techStack"), usize::MAX))
                .into_iter()
                .take(TECH_STACK)
                .collect::<Vec<_>>(),
        ),
    );
    profile.insert(
        "strengthAreas".into(),
        Value::from(string_list(obj.get("strengthAreas"), STRENGTH_AREAS)),
    );
    profile.insert(
        "industryBackground".into(),
        Value::from(text(&obj, "industryBackground", INDUSTRY_CHARS).unwrap_or_default()),
    );
    profile.insert("certifications".into(), optional_list(&obj, "certifications", CERTIFICATIONS));
    profile.insert("education".into(), optional_list(&obj, "education", EDUCATION));

    recovery::finish(Value::Object(profile), TASK)
}
