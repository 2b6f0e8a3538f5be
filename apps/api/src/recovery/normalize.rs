//! Field normalization applied to recovered JSON before strict validation.

use serde_json::{Map, Value};

use crate::models::{Level, Proficiency};

/// Maps near-miss Low/Medium/High values onto the closed vocabulary.
///
/// Idempotent. `"Very High"` → `"High"`, `"Very Low"` → `"Low"`, casing is
/// canonicalised, and anything else passes through unchanged for validation to reject.
pub fn normalize_level(raw: &str) -> String {
    let trimmed = raw.trim();
    let lowered = trimmed.to_ascii_lowercase().replace(['-', '_'], " ");
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");

    let canonical = match collapsed.as_str() {
        "low" | "very low" => Level::Low.as_str(),
        "medium" => Level::Medium.as_str(),
        "high" | "very high" => Level::High.as_str(),
        _ => return raw.to_string(),
    };
    canonical.to_string()
}

/// Maps near-miss proficiency labels onto the five-point scale.
pub fn normalize_proficiency(raw: &str) -> String {
    let lowered = raw.trim().to_ascii_lowercase();
    let canonical = match lowered.as_str() {
        "none" | "no experience" => "None",
        "beginner" | "novice" | "basic" => "Beginner",
        "intermediate" => "Intermediate",
        "advanced" | "proficient" => "Advanced",
        "expert" => "Expert",
        _ => return raw.to_string(),
    };
    debug_assert!(Proficiency::VOCABULARY.contains(&canonical));
    canonical.to_string()
}

/// Normalizes `obj[key]` with `normalize`, or writes `default` when absent or not a string.
pub fn normalize_enum_field(
    obj: &mut Map<String, Value>,
    key: &str,
    normalize: fn(&str) -> String,
    default: &str,
) {
    let normalized = match obj.get(key).and_then(Value::as_str) {
        Some(raw) => normalize(raw),
        None => default.to_string(),
    };
    obj.insert(key.to_string(), Value::String(normalized));
}

/// Reads a 0-100 score from a number or numeric string, rounding and clamping.
pub fn clamp_score(value: Option<&Value>) -> Option<u8> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then(|| n.round().clamp(0.0, 100.0) as u8)
}

/// Reads a non-negative integer from a number or numeric string.
pub fn as_count(value: Option<&Value>) -> Option<u64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (n.is_finite() && n >= 0.0).then(|| n.round() as u64)
}

/// Cuts `value` to at most `max_chars` characters.
pub fn clip(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((end, _)) => value[..end].trim_end().to_string(),
        None => value.to_string(),
    }
}

/// Coerces a value into at most `max_items` non-blank strings.
/// A bare string becomes a one-element list; numbers are stringified.
pub fn string_list(value: Option<&Value>, max_items: usize) -> Vec<String> {
    let to_text = |v: &Value| match v {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    };
    let items: Vec<String> = match value {
        Some(Value::Array(items)) => items.iter().filter_map(to_text).collect(),
        Some(v @ Value::String(_)) => to_text(v).into_iter().collect(),
        _ => Vec::new(),
    };
    items
        .into_iter()
        .filter(|s| !s.is_empty())
        .take(max_items)
        .collect()
}

/// Returns the trimmed string at `key`, clipped to `max_chars`, if present and non-blank.
pub fn text(obj: &Map<String, Value>, key: &str, max_chars: usize) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| clip(s, max_chars))
}

/// Renames compressed keys (`"n"` → `"roleName"`) without overwriting existing full keys.
pub fn expand_keys(obj: &mut Map<String, Value>, aliases: &[(&str, &str)]) {
    for (short, full) in aliases {
        if let Some(value) = obj.remove(*short) {
            obj.entry(full.to_string()).or_insert(value);
        }
    }
}

/// Lowercase, hyphen-separated identifier derived from a display name.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "path".to_string()
    } else {
        slug
    }
}

/// Takes the array at `key`, keeping only object elements.
pub fn object_items(obj: &mut Map<String, Value>, key: &str) -> Vec<Map<String, Value>> {
    match obj.remove(key) {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_very_variants_collapse_to_boundary() {
        assert_eq!(normalize_level("Very High"), "High");
        assert_eq!(normalize_level("Very Low"), "Low");
        assert_eq!(normalize_level("very-high"), "High");
        assert_eq!(normalize_level(" VERY   low "), "Low");
    }

    #[test]
    fn test_normalize_level_is_idempotent() {
        for value in ["Low", "Medium", "High", "Very High", "Critical", "moderate"] {
            let once = normalize_level(value);
            assert_eq!(normalize_level(&once), once);
        }
        for value in Level::VOCABULARY {
            assert_eq!(normalize_level(value), value);
        }
    }

    #[test]
    fn test_unknown_level_passes_through() {
        assert_eq!(normalize_level("Critical"), "Critical");
        assert_eq!(normalize_level("Extreme"), "Extreme");
    }

    #[test]
    fn test_normalize_proficiency() {
        assert_eq!(normalize_proficiency("novice"), "Beginner");
        assert_eq!(normalize_proficiency("EXPERT"), "Expert");
        assert_eq!(normalize_proficiency("Guru"), "Guru");
        for value in Proficiency::VOCABULARY {
            assert_eq!(normalize_proficiency(value), value);
        }
    }

    #[test]
    fn test_normalize_enum_field_defaults_missing() {
        let mut obj = json!({"importance": "very high"}).as_object().unwrap().clone();
        normalize_enum_field(&mut obj, "importance", normalize_level, "Medium");
        normalize_enum_field(&mut obj, "effort", normalize_level, "Medium");
        assert_eq!(obj["importance"], "High");
        assert_eq!(obj["effort"], "Medium");
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(Some(&json!(140))), Some(100));
        assert_eq!(clamp_score(Some(&json!(-5))), Some(0));
        assert_eq!(clamp_score(Some(&json!(72.6))), Some(73));
        assert_eq!(clamp_score(Some(&json!("85%"))), Some(85));
        assert_eq!(clamp_score(Some(&json!("high"))), None);
        assert_eq!(clamp_score(None), None);
    }

    #[test]
    fn test_string_list_coercion() {
        assert_eq!(
            string_list(Some(&json!(["React", " ", 5, null])), 10),
            vec!["React".to_string(), "5".to_string()]
        );
        assert_eq!(string_list(Some(&json!("AWS")), 10), vec!["AWS".to_string()]);
        assert!(string_list(Some(&json!({"a": 1})), 10).is_empty());
    }

    #[test]
    fn test_string_list_caps_items_after_dropping_blanks() {
        let items = string_list(Some(&json!(["", "a", "b", "c"])), 2);
        assert_eq!(items, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_clip_counts_chars_and_trims() {
        assert_eq!(clip("ééé", 2), "éé");
        assert_eq!(clip("abc def", 4), "abc");
        assert_eq!(clip("short", 10), "short");
    }

    #[test]
    fn test_text_is_clipped() {
        let obj = json!({"summary": "  abcdef  ", "blank": " "}).as_object().unwrap().clone();
        assert_eq!(text(&obj, "summary", 3).as_deref(), Some("abc"));
        assert!(text(&obj, "blank", 3).is_none());
        assert!(text(&obj, "missing", 3).is_none());
    }

    #[test]
    fn test_expand_keys_prefers_existing_full_key() {
        let mut obj = json!({"n": "Short", "roleName": "Full", "d": "desc"})
            .as_object()
            .unwrap()
            .clone();
        expand_keys(&mut obj, &[("n", "roleName"), ("d", "description")]);
        assert_eq!(obj["roleName"], "Full");
        assert_eq!(obj["description"], "desc");
        assert!(obj.get("n").is_none());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Staff Frontend Engineer"), "staff-frontend-engineer");
        assert_eq!(slugify("  ML/AI  Lead!! "), "ml-ai-lead");
        assert_eq!(slugify("***"), "path");
    }
}
