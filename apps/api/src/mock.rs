//! Deterministic synthetic data for `?mock=true`. Never touches a provider or the cache.

use crate::models::{
    CareerPath, CareerPathDetails, CareerPathMinimal, CareerRoadmap, Level, ResumeProfile,
    RoadmapPhase, SkillGapAnalysis,
};
use crate::recovery::normalize::slugify;
use crate::roadmap::phases::duration_labels;
use crate::roadmap::{PhaseRange, RoadmapInput};
use crate::skill_gaps::parser::derived_gaps;

const KNOWN_TECH: &[&str] = &[
    "React", "Node", "Node.js", "AWS", "GCP", "Azure", "TypeScript", "JavaScript", "Python",
    "Java", "Go", "Rust", "C++", "C#", "Kotlin", "Swift", "Ruby", "Rails", "Django", "Spring",
    "SQL", "PostgreSQL", "MySQL", "MongoDB", "Redis", "Kafka", "Spark", "Docker", "Kubernetes",
    "Terraform", "GraphQL", "Vue", "Angular", "Linux",
];

struct PathTemplate {
    name: &'static str,
    description: &'static str,
    skills: &'static [&'static str],
    effort: Level,
    reward: Level,
}

const PATH_TEMPLATES: &[PathTemplate] = &[
    PathTemplate {
        name: "Staff Engineer",
        description: "Set technical direction across several teams.",
        skills: &["System design", "Technical strategy", "Mentoring"],
        effort: Level::Medium,
        reward: Level::High,
    },
    PathTemplate {
        name: "Engineering Manager",
        description: "Lead a team and grow the people in it.",
        skills: &["People management", "Hiring", "Delivery planning"],
        effort: Level::High,
        reward: Level::High,
    },
    PathTemplate {
        name: "Solutions Architect",
        description: "Design systems with customers and guide their adoption.",
        skills: &["Cloud architecture", "Stakeholder communication", "Cost modelling"],
        effort: Level::Medium,
        reward: Level::High,
    },
    PathTemplate {
        name: "Platform Engineer",
        description: "Build the internal platform other engineers ship on.",
        skills: &["Kubernetes", "Terraform", "Observability"],
        effort: Level::Medium,
        reward: Level::Medium,
    },
    PathTemplate {
        name: "Technical Product Manager",
        description: "Own the roadmap for a technical product.",
        skills: &["Product discovery", "Prioritisation", "Analytics"],
        effort: Level::High,
        reward: Level::Medium,
    },
    PathTemplate {
        name: "Data Engineer",
        description: "Build reliable pipelines and data models.",
        skills: &["SQL", "Spark", "Data modelling"],
        effort: Level::Medium,
        reward: Level::Medium,
    },
    PathTemplate {
        name: "Developer Advocate",
        description: "Teach developers and feed their needs back to the product.",
        skills: &["Public speaking", "Technical writing", "Community building"],
        effort: Level::Low,
        reward: Level::Medium,
    },
    PathTemplate {
        name: "Security Engineer",
        description: "Find and fix weaknesses before attackers do.",
        skills: &["Threat modelling", "Application security", "Incident response"],
        effort: Level::High,
        reward: Level::High,
    },
];

fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.')))
        .map(|t| t.trim_end_matches('.'))
        .filter(|t| !t.is_empty())
}

fn years_in(text: &str) -> f64 {
    let words: Vec<&str> = tokens(text).collect();
    words
        .windows(2)
        .find_map(|pair| {
            let unit = pair[1].to_ascii_lowercase();
            if unit.starts_with("year") || unit.starts_with("yr") {
                pair[0].trim_end_matches('+').parse::<f64>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0.0)
}

/// Heuristic profile: role from the first clause, years from "N years",
/// tech stack from known names in the order they appear.
pub fn profile_from_text(resume_text: &str) -> ResumeProfile {
    let current_role = resume_text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .and_then(|line| line.split(',').next())
        .map(|role| role.trim().chars().take(200).collect::<String>())
        .filter(|role| !role.is_empty())
        .unwrap_or_else(|| "Professional".to_string());

    let mut tech_stack: Vec<String> = Vec::new();
    for token in tokens(resume_text) {
        if let Some(known) = KNOWN_TECH.iter().find(|k| k.eq_ignore_ascii_case(token)) {
            if !tech_stack.iter().any(|t| t == known) {
                tech_stack.push(known.to_string());
            }
        }
    }

    let strength_areas = match tech_stack.first() {
        Some(first) => vec![format!("{first} development")],
        None => vec!["Problem solving".to_string()],
    };

    ResumeProfile {
        name: None,
        current_role,
        years_of_experience: years_in(resume_text),
        tech_stack,
        strength_areas,
        industry_background: "Technology".to_string(),
        certifications: None,
        education: None,
    }
}

pub fn career_paths(profile: &ResumeProfile, count: usize) -> Vec<CareerPath> {
    PATH_TEMPLATES
        .iter()
        .take(count)
        .enumerate()
        .map(|(idx, template)| {
            let step = u8::try_from(idx * 4).unwrap_or(u8::MAX);
            CareerPath {
                role_id: slugify(template.name),
                role_name: template.name.to_string(),
                description: template.description.to_string(),
                market_demand_score: 90u8.saturating_sub(step),
                industry_alignment_score: 85u8.saturating_sub(step),
                required_skills: template.skills.iter().map(|s| s.to_string()).collect(),
                effort_level: template.effort,
                reward_potential: template.reward,
                reasoning: format!(
                    "With {} years as {}, {} is a reachable next step.",
                    profile.years_of_experience, profile.current_role, template.name
                ),
            }
        })
        .collect()
}

pub fn path_details(role_id: &str, role_name: &str) -> CareerPathDetails {
    CareerPathDetails {
        role_id: role_id.to_string(),
        role_name: role_name.to_string(),
        effort_level: Level::Medium,
        reward_potential: Level::High,
        reasoning: format!("{role_name} builds on your current experience with a moderate learning curve."),
    }
}

pub fn skill_gap_analysis(profile: &ResumeProfile, path: &CareerPathMinimal) -> SkillGapAnalysis {
    let skill_gaps = derived_gaps(profile, path);
    let overall_gap_severity = skill_gaps
        .iter()
        .map(|g| g.importance)
        .max()
        .unwrap_or(Level::Medium);
    let estimated_time_to_close = match overall_gap_severity {
        Level::Low => "1-3 months",
        Level::Medium => "3-6 months",
        Level::High => "6-12 months",
    };
    SkillGapAnalysis {
        career_path_id: path.role_id.clone(),
        target_role: path.role_name.clone(),
        skill_gaps,
        overall_gap_severity,
        estimated_time_to_close: estimated_time_to_close.to_string(),
        summary: format!(
            "Moving from {} to {} mainly requires the skills listed above.",
            profile.current_role, path.role_name
        ),
    }
}

/// Uses the policy phase count for the requested timeline and severity.
pub fn roadmap(range: PhaseRange, input: &RoadmapInput<'_>) -> CareerRoadmap {
    let count = range.recommended(input.timeline_months, input.analysis.overall_gap_severity);
    let labels = duration_labels(input.timeline_months, count);
    let skills: Vec<String> = input
        .analysis
        .skill_gaps
        .iter()
        .map(|g| g.skill_name.clone())
        .collect();

    let phases = labels
        .into_iter()
        .enumerate()
        .map(|(idx, duration)| {
            let focus = match skills.get(idx) {
                Some(skill) => skill.clone(),
                None => format!("{} practice", input.path.role_name),
            };
            RoadmapPhase {
                phase_number: idx as u32 + 1,
                duration,
                skills_focus: vec![focus.clone()],
                learning_direction: format!("Study and apply {focus}."),
                project_ideas: vec![format!("Build a small project using {focus}")],
                milestones: vec![format!("Demonstrate {focus} at work")],
                action_items: vec![format!("Schedule weekly time for {focus}")],
            }
        })
        .collect();

    CareerRoadmap {
        career_path_id: input.path.role_id.clone(),
        target_role: input.path.role_name.clone(),
        timeline_months: input.timeline_months,
        phases,
        success_metrics: vec![format!("Interviewing for {} roles", input.path.role_name)],
        risk_factors: vec!["Limited time alongside a full-time job".to_string()],
        support_resources: vec!["A mentor already in the target role".to_string()],
    }
}
