//! Phase-count policy and the deterministic fallback template.

use crate::config::Config;
use crate::models::{Level, RoadmapPhase, SkillGap};

/// Configured bounds on the number of roadmap phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseRange {
    pub min: usize,
    pub max: usize,
}

impl PhaseRange {
    pub fn from_config(config: &Config) -> Self {
        Self {
            min: config.roadmap_min_phases,
            max: config.roadmap_max_phases,
        }
    }

    pub fn recommended(&self, timeline_months: u32, severity: Level) -> usize {
        recommended_phase_count(timeline_months, severity, self.min, self.max)
    }
}

/// Recommended phase count for a timeline and gap severity, clamped to `[min, max]`.
///
/// | months | Low | Medium | High |
/// |--------|-----|--------|------|
/// | 1-6    | 2   | 2      | 3    |
/// | 7-12   | 2   | 3      | 4    |
/// | 13-24  | 3   | 4      | 5    |
pub fn recommended_phase_count(
    timeline_months: u32,
    severity: Level,
    min: usize,
    max: usize,
) -> usize {
    let count = match (timeline_months, severity) {
        (0..=6, Level::Low | Level::Medium) => 2,
        (0..=6, Level::High) => 3,
        (7..=12, Level::Low) => 2,
        (7..=12, Level::Medium) => 3,
        (7..=12, Level::High) => 4,
        (_, Level::Low) => 3,
        (_, Level::Medium) => 4,
        (_, Level::High) => 5,
    };
    count.clamp(min, max.max(min))
}

/// Splits `timeline_months` into `count` contiguous labels such as `"Months 1-3"`.
/// Earlier phases absorb the remainder.
pub fn duration_labels(timeline_months: u32, count: usize) -> Vec<String> {
    let count = count.max(1) as u32;
    let months = timeline_months.max(1);
    let base = months / count;
    let extra = months % count;

    let mut start = 1;
    (0..count)
        .map(|i| {
            let len = (base + u32::from(i < extra)).max(1);
            let first = start.min(months);
            let last = (start + len - 1).min(months);
            start += len;
            if first >= last {
                format!("Month {first}")
            } else {
                format!("Months {first}-{last}")
            }
        })
        .collect()
}

fn top_skills(gaps: &[SkillGap], take: usize) -> Vec<String> {
    gaps.iter().take(take).map(|g| g.skill_name.clone()).collect()
}

/// Two generic phases used when the model produced no usable phases.
pub fn fallback_phases(timeline_months: u32, target_role: &str, gaps: &[SkillGap]) -> Vec<RoadmapPhase> {
    let labels = duration_labels(timeline_months, 2);
    let mut focus = top_skills(gaps, 3);
    if focus.is_empty() {
        focus.push(format!("{target_role} core skills"));
    }
    let later: Vec<String> = gaps.iter().skip(3).take(3).map(|g| g.skill_name.clone()).collect();
    let later = if later.is_empty() { focus.clone() } else { later };

    vec![
        RoadmapPhase {
            phase_number: 1,
            duration: labels[0].clone(),
            skills_focus: focus.clone(),
            learning_direction: format!(
                "Build foundations in {} through structured courses and daily practice.",
                focus.join(", ")
            ),
            project_ideas: vec![format!("Small project applying {}", focus[0])],
            milestones: vec!["Complete one structured course".to_string()],
            action_items: vec![
                "Block regular weekly study time".to_string(),
                "Pick one course per focus skill".to_string(),
            ],
        },
        RoadmapPhase {
            phase_number: 2,
            duration: labels[1].clone(),
            skills_focus: later.clone(),
            learning_direction: format!(
                "Apply {} in realistic work and gather evidence for a {target_role} move.",
                later.join(", ")
            ),
            project_ideas: vec![format!("Portfolio project aimed at a {target_role} role")],
            milestones: vec!["Ship one portfolio project".to_string()],
            action_items: vec![
                "Ask for stretch work at your current job".to_string(),
                "Update your resume with new outcomes".to_string(),
            ],
        },
    ]
}
