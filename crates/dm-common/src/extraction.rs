use std::collections::HashSet;

use serde_json::Value;

use crate::skill_normalizer::dedup_key;
use crate::{Project, Skill};

/// Default importance for a job requirement that does not declare one.
pub const DEFAULT_JOB_IMPORTANCE: f64 = 0.5;

/// Weight for a candidate skill level. Presence without a level counts as a
/// full match.
pub fn level_weight(level: Option<&str>) -> f64 {
    match level.map(|l| l.trim().to_lowercase()).as_deref() {
        Some("expert") | Some("advanced") => 1.0,
        Some("intermediate") => 0.7,
        Some("beginner") | Some("basic") => 0.4,
        _ => 1.0,
    }
}

/// Look up `key` on the record itself or nested under `data`. Raw platform
/// payloads arrive in both shapes.
fn field<'a>(record: &'a Value, key: &str) -> Option<&'a Value> {
    record
        .get(key)
        .or_else(|| record.get("data").and_then(|data| data.get(key)))
}

fn skill_name(entry: &Value) -> Option<&str> {
    match entry {
        Value::String(name) => Some(name.as_str()),
        // Requirements spell the key "skill"; profile records use "name".
        Value::Object(map) => map
            .get("name")
            .or_else(|| map.get("skill"))
            .and_then(|v| v.as_str()),
        _ => None,
    }
}

fn push_unique(skills: &mut Vec<Skill>, seen: &mut HashSet<String>, skill: Skill) {
    let key = dedup_key(&skill.name);
    if key.is_empty() || !seen.insert(key) {
        return;
    }
    skills.push(skill);
}

/// Extract candidate skills from a raw profile record.
///
/// Tolerated shapes: a list of name strings, a list of `{name}` or
/// `{name, level}` objects, or either of those nested under `data`.
/// Technologies listed on `projects[].technologies` are appended when their
/// normalized name is not already present. Output has no two entries with
/// equal normalized names; first occurrence wins. Malformed entries are
/// skipped, never an error.
pub fn extract_profile_skills(record: &Value) -> Vec<Skill> {
    let mut skills = Vec::new();
    let mut seen = HashSet::new();

    if let Some(entries) = field(record, "skills").and_then(|v| v.as_array()) {
        for entry in entries {
            let Some(name) = skill_name(entry) else {
                continue;
            };
            if name.trim().is_empty() {
                continue;
            }
            let level = entry.get("level").and_then(|v| v.as_str());
            push_unique(&mut skills, &mut seen, Skill::new(name, level_weight(level)));
        }
    }

    if let Some(projects) = field(record, "projects").and_then(|v| v.as_array()) {
        for project in projects {
            let Some(technologies) = project.get("technologies").and_then(|v| v.as_array()) else {
                continue;
            };
            for tech in technologies {
                let Some(name) = tech.as_str() else { continue };
                if name.trim().is_empty() {
                    continue;
                }
                push_unique(&mut skills, &mut seen, Skill::presence(name));
            }
        }
    }

    skills
}

/// Extract weighted requirements from a raw job record.
///
/// Tolerated shapes: `skills` or `requirements` as a list of name strings
/// (default importance 0.5) or `{name|skill, importance}` objects, possibly
/// nested under `data`. Missing importance defaults, out-of-range importance
/// clamps. Output deduplicated by normalized name, first occurrence wins.
pub fn extract_job_skills(record: &Value) -> Vec<Skill> {
    let mut skills = Vec::new();
    let mut seen = HashSet::new();

    let entries = field(record, "skills")
        .or_else(|| field(record, "requirements"))
        .and_then(|v| v.as_array());

    if let Some(entries) = entries {
        for entry in entries {
            let Some(name) = skill_name(entry) else {
                continue;
            };
            if name.trim().is_empty() {
                continue;
            }
            let importance = entry
                .get("importance")
                .and_then(|v| v.as_f64())
                .unwrap_or(DEFAULT_JOB_IMPORTANCE);
            push_unique(&mut skills, &mut seen, Skill::new(name, importance));
        }
    }

    skills
}

/// Typed projects from a raw profile record; entries that do not parse are
/// dropped rather than failing the profile.
pub fn extract_projects(record: &Value) -> Vec<Project> {
    field(record, "projects")
        .and_then(|v| v.as_array())
        .map(|projects| {
            projects
                .iter()
                .filter_map(|p| serde_json::from_value(p.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Split a skills section of free text ("Python, SQL; Docker") into raw
/// skill names. Splits on commas, semicolons, newlines and bullet points;
/// fragments shorter than two characters are dropped.
pub fn skills_from_text(text: &str) -> Vec<String> {
    text.split(|c| matches!(c, ',' | ';' | '\n' | '•'))
        .map(|fragment| fragment.trim().trim_matches('.').trim())
        .filter(|fragment| fragment.len() > 1)
        .map(|fragment| fragment.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_string_skills_get_full_weight() {
        let record = json!({ "skills": ["Python", "SQL"] });
        let skills = extract_profile_skills(&record);

        assert_eq!(skills.len(), 2);
        assert!(skills.iter().all(|s| s.weight == 1.0));
    }

    #[test]
    fn level_objects_map_to_weights() {
        let record = json!({
            "skills": [
                { "name": "Python", "level": "expert" },
                { "name": "React", "level": "intermediate" },
                { "name": "Go", "level": "beginner" },
                { "name": "SQL" },
            ]
        });

        let skills = extract_profile_skills(&record);
        let weights: Vec<f64> = skills.iter().map(|s| s.weight).collect();
        assert_eq!(weights, vec![1.0, 0.7, 0.4, 1.0]);
    }

    #[test]
    fn skills_nested_under_data_are_found() {
        let record = json!({ "data": { "skills": ["Rust"] } });
        let skills = extract_profile_skills(&record);
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].name, "Rust");
    }

    #[test]
    fn project_technologies_append_without_duplicating() {
        let record = json!({
            "skills": ["Python"],
            "projects": [
                { "name": "etl", "technologies": ["python", "Airflow"] },
                { "name": "web", "technologies": ["JS"] },
            ]
        });

        let skills = extract_profile_skills(&record);
        let names: Vec<&str> = skills.iter().map(|s| s.name.as_str()).collect();
        // "python" collapses onto the existing "Python"; first literal wins.
        assert_eq!(names, vec!["Python", "Airflow", "JS"]);
    }

    #[test]
    fn job_skills_default_importance() {
        let record = json!({ "skills": ["React", { "name": "SQL", "importance": 0.9 }] });
        let skills = extract_job_skills(&record);

        assert_eq!(skills[0].weight, DEFAULT_JOB_IMPORTANCE);
        assert_eq!(skills[1].weight, 0.9);
    }

    #[test]
    fn job_requirements_key_and_skill_field_are_accepted() {
        let record = json!({
            "requirements": [ { "skill": "Python", "importance": 1.0 } ]
        });

        let skills = extract_job_skills(&record);
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].name, "Python");
        assert_eq!(skills[0].weight, 1.0);
    }

    #[test]
    fn malformed_entries_default_rather_than_error() {
        let record = json!({
            "skills": [42, { "label": "nope" }, "", "Rust"],
        });

        let skills = extract_profile_skills(&record);
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].name, "Rust");

        let missing = json!({ "title": "no skills here" });
        assert!(extract_job_skills(&missing).is_empty());
    }

    #[test]
    fn dedup_is_by_normalized_name_first_wins() {
        let record = json!({ "skills": ["JS", "javascript", "ECMAScript"] });
        let skills = extract_profile_skills(&record);

        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].name, "JS");
    }

    #[test]
    fn importance_is_clamped_into_unit_range() {
        let record = json!({ "skills": [{ "name": "Rust", "importance": 3.0 }] });
        let skills = extract_job_skills(&record);
        assert_eq!(skills[0].weight, 1.0);
    }

    #[test]
    fn splits_free_text_skill_sections() {
        let text = "Python, SQL; Docker\n• Kubernetes, x";
        assert_eq!(
            skills_from_text(text),
            vec!["Python", "SQL", "Docker", "Kubernetes"]
        );
    }
}
