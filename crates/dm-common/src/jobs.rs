use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::MatchError;
use crate::extraction::{skills_from_text, DEFAULT_JOB_IMPORTANCE};
use crate::skill_normalizer::fuzzy_canonical;
use crate::sources::JobSource;
use crate::{Job, Skill};

/// Seniority bucket inferred from a job title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobLevel {
    Entry,
    Mid,
    Senior,
}

const SENIOR_MARKERS: &[&str] = &[
    "senior", "sr", "lead", "principal", "staff", "architect", "manager", "head", "chief", "cto",
    "vp",
];

const ENTRY_MARKERS: &[&str] = &[
    "junior", "jr", "entry", "intern", "trainee", "graduate", "associate",
];

/// Infer the level bucket from a title. Senior markers are checked first,
/// unmarked titles default to mid.
pub fn job_level(title: &str) -> JobLevel {
    let title = title.to_lowercase();

    if SENIOR_MARKERS.iter().any(|marker| title.contains(marker)) {
        return JobLevel::Senior;
    }
    if ENTRY_MARKERS.iter().any(|marker| title.contains(marker)) {
        return JobLevel::Entry;
    }
    JobLevel::Mid
}

/// Importance of a skill from its position in the requirement list: skills
/// listed earlier matter more. Linear from 1.0 down to 0.1, rounded to one
/// decimal; a single skill is 1.0 and out-of-range input gets the default
/// mid importance.
pub fn skill_importance(position: usize, total: usize) -> f64 {
    if total == 0 || position >= total {
        return DEFAULT_JOB_IMPORTANCE;
    }
    if total == 1 {
        return 1.0;
    }

    let min_importance = 0.1;
    let importance = 1.0 - (1.0 - min_importance) * position as f64 / (total as f64 - 1.0);
    (importance * 10.0).round() / 10.0
}

/// Generate a standardized description from the job's level, top skills and
/// location. The sentences are fixed templates.
pub fn generate_description(title: &str, company: &str, skills: &[String], location: &str) -> String {
    let (intro, experience) = match job_level(title) {
        JobLevel::Entry => (
            format!("{company} is looking for an entry-level {title} to join our team."),
            "This is an excellent opportunity for recent graduates or developers early in their career path.",
        ),
        JobLevel::Senior => (
            format!("{company} is seeking an experienced {title} to lead our technical initiatives."),
            "The ideal candidate will have extensive experience and can mentor junior team members.",
        ),
        JobLevel::Mid => (
            format!("{company} is hiring a {title} to strengthen our development team."),
            "We're looking for someone with proven experience who can hit the ground running.",
        ),
    };

    let skills_section = if skills.is_empty() {
        "Experience with relevant technologies is required.".to_string()
    } else {
        let top: Vec<&str> = skills.iter().take(5).map(|s| s.as_str()).collect();
        format!("Key technologies include {}, among others.", top.join(", "))
    };

    format!("{intro} {experience} {skills_section} This position is located in {location}.")
}

/// Input for building a job record without a live job source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobSpec {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub skills: Vec<String>,
    /// Raw skills-section text, mined when `skills` is empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl JobSpec {
    fn skill_names(&self) -> Vec<String> {
        if !self.skills.is_empty() {
            return self.skills.clone();
        }
        self.skills_text
            .as_deref()
            .map(skills_from_text)
            .unwrap_or_default()
    }
}

/// Build a Job from a spec: positional importances for the listed skills
/// (near-miss spellings canonicalized) and a generated description when the
/// spec does not carry one.
pub fn build_job(spec: &JobSpec) -> Job {
    let skills = spec.skill_names();
    let total = skills.len();
    let requirements: Vec<Skill> = skills
        .iter()
        .enumerate()
        .map(|(position, raw)| {
            let name = fuzzy_canonical(raw).unwrap_or_else(|| raw.clone());
            Skill::new(name, skill_importance(position, total))
        })
        .collect();

    let location = spec.location.clone().unwrap_or_else(|| "Remote".to_string());
    let description = spec.description.clone().unwrap_or_else(|| {
        generate_description(&spec.title, &spec.company, &skills, &location)
    });

    Job {
        title: spec.title.clone(),
        company: spec.company.clone(),
        location: Some(location),
        description: Some(description),
        requirements,
    }
}

/// The "build" half of the Job Source contract: assembles jobs from specs
/// instead of fetching them from a board.
#[derive(Debug, Default)]
pub struct SpecJobSource;

#[async_trait]
impl JobSource for SpecJobSource {
    async fn fetch_or_build_job(&self, spec: &Value) -> Result<Value, MatchError> {
        let spec: JobSpec = serde_json::from_value(spec.clone())
            .map_err(|err| MatchError::MalformedRecord(format!("job spec: {err}")))?;
        let job = build_job(&spec);
        serde_json::to_value(&job)
            .map_err(|err| MatchError::MalformedRecord(format!("job spec: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_bucket_into_levels() {
        assert_eq!(job_level("Senior Backend Engineer"), JobLevel::Senior);
        assert_eq!(job_level("Staff Engineer"), JobLevel::Senior);
        assert_eq!(job_level("Junior Developer"), JobLevel::Entry);
        assert_eq!(job_level("Graduate Analyst"), JobLevel::Entry);
        assert_eq!(job_level("Backend Engineer"), JobLevel::Mid);
    }

    #[test]
    fn positional_importance_decays_linearly() {
        assert_eq!(skill_importance(0, 1), 1.0);
        assert_eq!(skill_importance(0, 4), 1.0);
        assert_eq!(skill_importance(1, 4), 0.7);
        assert_eq!(skill_importance(2, 4), 0.4);
        assert_eq!(skill_importance(3, 4), 0.1);
        // out of range falls back to the default mid importance
        assert_eq!(skill_importance(5, 4), DEFAULT_JOB_IMPORTANCE);
        assert_eq!(skill_importance(0, 0), DEFAULT_JOB_IMPORTANCE);
    }

    #[test]
    fn description_mentions_top_five_skills_only() {
        let skills: Vec<String> = ["A", "B", "C", "D", "E", "F"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let description = generate_description("Backend Engineer", "Acme", &skills, "Berlin");

        assert!(description.starts_with("Acme is hiring a Backend Engineer"));
        assert!(description.contains("Key technologies include A, B, C, D, E, among others."));
        assert!(!description.contains(", F,"));
        assert!(description.ends_with("This position is located in Berlin."));
    }

    #[test]
    fn build_job_assigns_positional_importances() {
        let job = build_job(&JobSpec {
            title: "Data Engineer".into(),
            company: "Acme".into(),
            skills: vec![
                "Python".into(),
                "SQL".into(),
                "Airflow".into(),
                "Docker".into(),
            ],
            ..Default::default()
        });

        assert_eq!(job.requirements.len(), 4);
        assert_eq!(job.requirements[0].weight, 1.0);
        assert_eq!(job.requirements[1].weight, 0.7);
        assert_eq!(job.requirements[2].weight, 0.4);
        assert_eq!(job.requirements[3].weight, 0.1);
        assert!(job.description.unwrap().contains("Key technologies include"));
        assert_eq!(job.location.as_deref(), Some("Remote"));
    }

    #[test]
    fn build_job_canonicalizes_typo_skills() {
        let job = build_job(&JobSpec {
            title: "Frontend Engineer".into(),
            company: "Acme".into(),
            skills: vec!["javascirpt".into()],
            ..Default::default()
        });

        assert_eq!(job.requirements[0].name, "javascript");
    }

    #[test]
    fn build_job_mines_skills_from_text_when_none_listed() {
        let job = build_job(&JobSpec {
            title: "Data Engineer".into(),
            company: "Acme".into(),
            skills_text: Some("Python, SQL; Airflow".into()),
            ..Default::default()
        });

        let names: Vec<&str> = job.requirements.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["python", "sql", "Airflow"]);
        assert_eq!(job.requirements[0].weight, 1.0);
    }

    #[tokio::test]
    async fn spec_job_source_builds_from_a_value_spec() {
        use crate::sources::JobSource;
        use serde_json::json;

        let source = SpecJobSource;
        let job = source
            .fetch_or_build_job(&json!({
                "title": "Senior Backend Engineer",
                "company": "Acme",
                "skills": ["Rust", "PostgreSQL"],
            }))
            .await
            .unwrap();

        assert_eq!(job["title"], "Senior Backend Engineer");
        assert_eq!(job["requirements"][0]["weight"], 1.0);
        assert!(job["description"]
            .as_str()
            .unwrap()
            .contains("seeking an experienced"));

        let malformed = source.fetch_or_build_job(&json!(["not", "a", "spec"])).await;
        assert!(matches!(malformed, Err(MatchError::MalformedRecord(_))));
    }
}
