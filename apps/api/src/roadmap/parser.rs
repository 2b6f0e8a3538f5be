//! Roadmap parser: phases are truncated to the configured maximum, renumbered
//! from 1, and replaced by the two-phase template when nothing usable came back.

use serde_json::{Map, Value};
use tracing::warn;

use crate::models::limits::{
    ACTION_ITEMS, DIRECTION_CHARS, DURATION_CHARS, ID_CHARS, NAME_CHARS, PHASE_ITEMS, ROADMAP_NOTES,
};
use crate::models::roadmap::{MAX_TIMELINE_MONTHS, MIN_TIMELINE_MONTHS};
use crate::models::{CareerRoadmap, SkillGap};
use crate::recovery::normalize::{as_count, clip, expand_keys, object_items, string_list, text};
use crate::recovery::{self, FieldSpec, RecoveryError};

use super::phases::{duration_labels, fallback_phases};

pub const TASK: &str = "roadmap";

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("careerPathId"),
    FieldSpec::text("targetRole"),
    FieldSpec::number("timelineMonths"),
    FieldSpec::object_list("phases"),
    FieldSpec::text_list("successMetrics"),
    FieldSpec::text_list("riskFactors"),
    FieldSpec::text_list("supportResources"),
];

const PHASE_ALIASES: &[(&str, &str)] = &[
    ("skills", "skillsFocus"),
    ("focus", "skillsFocus"),
    ("direction", "learningDirection"),
    ("projects", "projectIdeas"),
    ("actions", "actionItems"),
];

const PHASE_LISTS: [(&str, usize); 4] = [
    ("skillsFocus", PHASE_ITEMS),
    ("projectIdeas", PHASE_ITEMS),
    ("milestones", PHASE_ITEMS),
    ("actionItems", ACTION_ITEMS),
];

/// What the request pins down regardless of model output.
#[derive(Debug, Clone, Copy)]
pub struct RoadmapContext<'a> {
    pub career_path_id: &'a str,
    pub target_role: &'a str,
    pub timeline_months: u32,
    pub max_phases: usize,
    pub gaps: &'a [SkillGap],
}

/// Returns `None` for a phase with neither a direction nor any focus skills.
fn normalize_phase(mut obj: Map<String, Value>) -> Option<Map<String, Value>> {
    expand_keys(&mut obj, PHASE_ALIASES);

    let mut phase = Map::new();
    for (key, max_items) in PHASE_LISTS {
        phase.insert(key.into(), Value::from(string_list(obj.get(key), max_items)));
    }
    let skills = string_list(obj.get("skillsFocus"), PHASE_ITEMS);
    let direction = match text(&obj, "learningDirection", DIRECTION_CHARS) {
        Some(direction) => direction,
        None if !skills.is_empty() => {
            clip(&format!("Focus on {}.", skills.join(", ")), DIRECTION_CHARS)
        }
        None => return None,
    };
    phase.insert("learningDirection".into(), Value::from(direction));
    if let Some(duration) = text(&obj, "duration", DURATION_CHARS) {
        phase.insert("duration".into(), Value::from(duration));
    }
    Some(phase)
}

pub fn parse_roadmap(raw: &str, ctx: &RoadmapContext<'_>) -> Result<CareerRoadmap, RecoveryError> {
    let recovered = recovery::recover_json(raw, TASK, FIELDS)?;
    let mut obj = match recovered.value {
        Value::Object(obj) => obj,
        Value::Array(items) => {
            let mut obj = Map::new();
            obj.insert("phases".into(), Value::Array(items));
            obj
        }
        _ => Map::new(),
    };

    let timeline = as_count(obj.get("timelineMonths"))
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| (MIN_TIMELINE_MONTHS..=MAX_TIMELINE_MONTHS).contains(n))
        .unwrap_or(ctx.timeline_months);

    let mut phases: Vec<Map<String, Value>> = object_items(&mut obj, "phases")
        .into_iter()
        .filter_map(normalize_phase)
        .collect();
    if phases.len() > ctx.max_phases {
        warn!(
            "{TASK}: dropping {} phases beyond the configured maximum of {}",
            phases.len() - ctx.max_phases,
            ctx.max_phases
        );
        phases.truncate(ctx.max_phases);
    }

    let phases: Vec<Value> = if phases.is_empty() {
        warn!("{TASK}: no usable phases in response, applying two-phase template");
        fallback_phases(timeline, ctx.target_role, ctx.gaps)
            .into_iter()
            .filter_map(|phase| serde_json::to_value(phase).ok())
            .collect()
    } else {
        let labels = duration_labels(timeline, phases.len());
        phases
            .into_iter()
            .zip(labels)
            .enumerate()
            .map(|(idx, (mut phase, label))| {
                phase.insert("phaseNumber".into(), Value::from(idx + 1));
                phase.entry("duration").or_insert(Value::from(label));
                Value::Object(phase)
            })
            .collect()
    };

    let mut roadmap = Map::new();
    roadmap.insert(
        "careerPathId".into(),
        Value::from(text(&obj, "careerPathId", ID_CHARS).unwrap_or_else(|| ctx.career_path_id.to_string())),
    );
    roadmap.insert(
        "targetRole".into(),
        Value::from(text(&obj, "targetRole", NAME_CHARS).unwrap_or_else(|| ctx.target_role.to_string())),
    );
    roadmap.insert("timelineMonths".into(), Value::from(timeline));
    roadmap.insert("phases".into(), Value::Array(phases));
    for key in ["successMetrics", "riskFactors", "supportResources"] {
        roadmap.insert(key.into(), Value::from(string_list(obj.get(key), ROADMAP_NOTES)));
    }

    recovery::finish(Value::Object(roadmap), TASK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::skill_gap::tests::gap;
    use crate::models::Level;

    fn ctx(gaps: &[SkillGap]) -> RoadmapContext<'_> {
        RoadmapContext {
            career_path_id: "staff-engineer",
            target_role: "Staff Engineer",
            timeline_months: 6,
            max_phases: 5,
            gaps,
        }
    }

    fn phase_json(n: u32) -> String {
        format!(
            r#"{{"phaseNumber": {n}, "duration": "Month {n}", "skillsFocus": ["Skill {n}"],
                "learningDirection": "Direction {n}", "projectIdeas": [], "milestones": ["M{n}"],
                "actionItems": ["A{n}"]}}"#
        )
    }

    #[test]
    fn test_clean_roadmap_round_trips() {
        let raw = format!(
            r#"{{"careerPathId": "staff-engineer", "targetRole": "Staff Engineer", "timelineMonths": 6,
                "phases": [{}, {}, {}], "successMetrics": ["Lead a design review"],
                "riskFactors": [], "supportResources": ["Staff Eng book"]}}"#,
            phase_json(1),
            phase_json(2),
            phase_json(3)
        );
        let roadmap = parse_roadmap(&raw, &ctx(&[])).unwrap();
        assert_eq!(roadmap.phases.len(), 3);
        assert_eq!(roadmap.phases[2].learning_direction, "Direction 3");
        assert_eq!(roadmap.phases[1].duration, "Month 2");
        assert_eq!(roadmap.success_metrics, vec!["Lead a design review"]);
    }

    #[test]
    fn test_phases_renumbered_and_truncated() {
        let raw = format!(
            r#"{{"timelineMonths": 12, "phases": [{}, {}, {}, {}, {}, {}]}}"#,
            phase_json(3),
            phase_json(3),
            phase_json(7),
            phase_json(8),
            phase_json(9),
            phase_json(10)
        );
        let roadmap = parse_roadmap(&raw, &ctx(&[])).unwrap();
        let numbers: Vec<u32> = roadmap.phases.iter().map(|p| p.phase_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        assert_eq!(roadmap.timeline_months, 12);
    }

    #[test]
    fn test_out_of_range_timeline_replaced_by_request() {
        let raw = format!(r#"{{"timelineMonths": 36, "phases": [{}]}}"#, phase_json(1));
        assert_eq!(parse_roadmap(&raw, &ctx(&[])).unwrap().timeline_months, 6);
    }

    #[test]
    fn test_degenerate_output_gets_two_phase_fallback() {
        let gaps = vec![gap("System design", Level::High)];
        let raw = r#"{"careerPathId": "staff-engineer", "phases": []}"#;
        let roadmap = parse_roadmap(raw, &ctx(&gaps)).unwrap();
        assert_eq!(roadmap.phases.len(), 2);
        assert_eq!(roadmap.phases[0].skills_focus, vec!["System design"]);
        assert_eq!(roadmap.target_role, "Staff Engineer");
    }

    #[test]
    fn test_truncated_roadmap_keeps_complete_phases() {
        let full = format!(
            r#"{{"careerPathId": "staff-engineer", "timelineMonths": 6, "phases": [{}, {}, {}]}}"#,
            phase_json(1),
            phase_json(2),
            phase_json(3)
        );
        let cut = full.find("Direction 3").unwrap() - 4;
        let roadmap = parse_roadmap(&full[..cut], &ctx(&[])).unwrap();
        assert_eq!(roadmap.phases.len(), 3);
        assert_eq!(roadmap.phases[2].skills_focus, vec!["Skill 3"]);
        assert_eq!(roadmap.phases[2].learning_direction, "Focus on Skill 3.");
        assert_eq!(roadmap.phases[2].duration, "Month 3");
    }

    #[test]
    fn test_missing_durations_filled_from_timeline() {
        let raw = r#"{"phases": [
            {"learningDirection": "Learn A"},
            {"skillsFocus": ["B"]},
            {"milestones": ["orphan"]}
        ]}"#;
        let roadmap = parse_roadmap(raw, &ctx(&[])).unwrap();
        assert_eq!(roadmap.phases.len(), 2);
        assert_eq!(roadmap.phases[0].duration, "Months 1-3");
        assert_eq!(roadmap.phases[1].duration, "Months 4-6");
        assert_eq!(roadmap.phases[1].learning_direction, "Focus on B.");
    }

    #[test]
    fn test_nothing_recoverable_is_error() {
        assert!(parse_roadmap("Sorry, I cannot help.", &ctx(&[])).is_err());
    }

    #[test]
    fn test_oversized_lists_and_text_are_capped_not_rejected() {
        let metrics: Vec<String> = (0..21).map(|i| format!("Metric {i}")).collect();
        let actions: Vec<String> = (0..35).map(|i| format!("Action {i}")).collect();
        let raw = serde_json::json!({
            "timelineMonths": 6,
            "phases": [{
                "duration": "d".repeat(150),
                "skillsFocus": ["Rust"],
                "learningDirection": "l".repeat(2100),
                "actionItems": actions
            }],
            "successMetrics": metrics
        })
        .to_string();
        let roadmap = parse_roadmap(&raw, &ctx(&[])).unwrap();
        assert_eq!(roadmap.success_metrics.len(), ROADMAP_NOTES);
        assert_eq!(roadmap.success_metrics[0], "Metric 0");
        let phase = &roadmap.phases[0];
        assert_eq!(phase.action_items.len(), ACTION_ITEMS);
        assert_eq!(phase.duration.chars().count(), DURATION_CHARS);
        assert_eq!(phase.learning_direction.chars().count(), DIRECTION_CHARS);
    }
}
