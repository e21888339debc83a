use std::collections::BTreeMap;

use serde_json::Value;

use crate::sources::Platform;

/// Cap on Codeforces submissions included in the text; beyond this the
/// text stops adding signal and only inflates embedding calls.
const MAX_SUBMISSIONS: usize = 20;

fn str_at<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

/// Per-section text for a platform profile, plus a `combined` section
/// joining them. The combined text is what gets embedded.
pub fn profile_sections(record: &Value, platform: Platform) -> BTreeMap<String, String> {
    let mut sections = BTreeMap::new();

    match platform {
        Platform::Github => {
            sections.insert("bio".to_string(), str_at(record, "bio").to_string());
            sections.insert("name".to_string(), str_at(record, "name").to_string());

            let repos: Vec<String> = record
                .get("repositories")
                .and_then(|v| v.as_array())
                .map(|repos| {
                    repos
                        .iter()
                        .map(|repo| {
                            format!(
                                "{} - {} ({})",
                                str_at(repo, "name"),
                                str_at(repo, "description"),
                                str_at(repo, "language")
                            )
                        })
                        .collect()
                })
                .unwrap_or_default();
            sections.insert("repositories".to_string(), repos.join("\n"));

            let projects: Vec<String> = record
                .get("projects")
                .and_then(|v| v.as_array())
                .map(|projects| {
                    projects
                        .iter()
                        .map(|project| {
                            format!(
                                "{} - {} ({})",
                                str_at(project, "name"),
                                str_at(project, "description"),
                                str_at(project, "language")
                            )
                        })
                        .collect()
                })
                .unwrap_or_default();
            sections.insert("projects".to_string(), projects.join("\n"));
        }
        Platform::Leetcode => {
            let info = record.get("profile").cloned().unwrap_or(Value::Null);
            sections.insert("bio".to_string(), str_at(&info, "aboutMe").to_string());

            let tags: Vec<String> = info
                .get("skillTags")
                .and_then(|v| v.as_array())
                .map(|tags| {
                    tags.iter()
                        .filter_map(|t| t.as_str().map(|s| s.to_string()))
                        .collect()
                })
                .unwrap_or_default();
            sections.insert("skills".to_string(), tags.join(", "));

            let submissions: Vec<String> = record
                .get("recent_submissions")
                .and_then(|v| v.as_array())
                .map(|subs| {
                    subs.iter()
                        .map(|sub| format!("{} ({})", str_at(sub, "title"), str_at(sub, "lang")))
                        .collect()
                })
                .unwrap_or_default();
            sections.insert("submissions".to_string(), submissions.join("\n"));
        }
        Platform::Codeforces => {
            let submissions: Vec<String> = record
                .get("submissions")
                .and_then(|v| v.as_array())
                .map(|subs| {
                    subs.iter()
                        .take(MAX_SUBMISSIONS)
                        .map(|sub| {
                            let problem = sub.get("problem").cloned().unwrap_or(Value::Null);
                            let tags: Vec<&str> = problem
                                .get("tags")
                                .and_then(|v| v.as_array())
                                .map(|tags| tags.iter().filter_map(|t| t.as_str()).collect())
                                .unwrap_or_default();
                            format!(
                                "{} ({}) - Tags: {}",
                                str_at(&problem, "name"),
                                str_at(sub, "programmingLanguage"),
                                tags.join(", ")
                            )
                        })
                        .collect()
                })
                .unwrap_or_default();
            sections.insert("submissions".to_string(), submissions.join("\n"));
        }
        Platform::Linkedin | Platform::Generic => {
            sections.insert("bio".to_string(), str_at(record, "bio").to_string());
        }
    }

    let combined = sections
        .values()
        .filter(|text| !text.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("\n\n");
    sections.insert("combined".to_string(), combined);

    sections
}

/// Flat matching text for a profile: bio + description + repository
/// descriptions/languages, honoring payloads nested under `data`.
pub fn profile_matching_text(record: &Value) -> String {
    let data = record.get("data").filter(|d| d.is_object()).unwrap_or(record);

    let mut parts: Vec<String> = vec![
        str_at(data, "bio").to_string(),
        str_at(data, "description").to_string(),
    ];

    if let Some(repos) = data.get("repositories").and_then(|v| v.as_array()) {
        for repo in repos {
            parts.push(str_at(repo, "description").to_string());
            parts.push(str_at(repo, "language").to_string());
        }
    }

    parts.retain(|p| !p.is_empty());
    parts.join(" ")
}

/// Flat matching text for a job: title + description + joined skills.
pub fn job_matching_text(record: &Value) -> String {
    let mut parts: Vec<String> = vec![
        str_at(record, "title").to_string(),
        str_at(record, "description").to_string(),
    ];

    match record.get("skills") {
        Some(Value::Array(skills)) => {
            let joined = skills
                .iter()
                .filter_map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            parts.push(joined);
        }
        Some(Value::String(skills)) => parts.push(skills.clone()),
        _ => {}
    }

    parts.retain(|p| !p.is_empty());
    parts.join(" ")
}
