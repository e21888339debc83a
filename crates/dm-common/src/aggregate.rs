use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extraction::extract_profile_skills;
use crate::skill_normalizer::dedup_key;
use crate::sources::Platform;
use crate::{PlatformProfile, Profile, ProfileIdentity, Skill};

/// One candidate assembled from several per-platform profiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombinedProfile {
    pub id: String,
    pub name: String,
    /// Union of skills across platforms; literal spelling of the first
    /// occurrence is kept, deduplicated by normalized name.
    pub skills: Vec<String>,
    pub repositories: Vec<Value>,
    pub projects: Vec<Value>,
    pub experience: Vec<Value>,
    pub education: Vec<Value>,
    pub certifications: Vec<Value>,
    /// One tag per input profile, in input order, duplicates allowed.
    pub platforms: Vec<Platform>,
    /// LeetCode solved-problem counts; last writer wins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_solving: Option<Value>,
    /// LeetCode recent submissions; last writer wins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submissions: Option<Value>,
}

impl CombinedProfile {
    /// View as a plain profile for the detailed matcher (skills become
    /// presence-weighted).
    pub fn to_profile(&self) -> Profile {
        Profile {
            identity: ProfileIdentity {
                name: self.name.clone(),
                ..Default::default()
            },
            skills: self.skills.iter().map(Skill::presence).collect(),
            ..Default::default()
        }
    }
}

fn extend_from(target: &mut Vec<Value>, record: &Value, key: &str) {
    let list = record
        .get(key)
        .or_else(|| record.get("data").and_then(|d| d.get(key)))
        .and_then(|v| v.as_array());
    if let Some(list) = list {
        target.extend(list.iter().cloned());
    }
}

fn data_field<'a>(record: &'a Value, key: &str) -> Option<&'a Value> {
    record
        .get("data")
        .and_then(|d| d.get(key))
        .or_else(|| record.get(key))
}

/// Merge per-platform profiles into one combined profile.
///
/// The first profile in the list is the authoritative one: its id and name
/// become the combined identity, so callers order inputs primary-first.
/// Returns an empty profile for an empty input list.
pub fn combine(profiles: &[PlatformProfile]) -> CombinedProfile {
    let Some(first) = profiles.first() else {
        return CombinedProfile::default();
    };

    let base_id = match first.record.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => String::new(),
    };

    let mut combined = CombinedProfile {
        id: format!("combined_{base_id}"),
        name: first.name().unwrap_or_default().to_string(),
        ..Default::default()
    };

    let mut seen_skills = HashSet::new();

    for profile in profiles {
        combined.platforms.push(profile.platform);

        for skill in extract_profile_skills(&profile.record) {
            let key = dedup_key(&skill.name);
            if key.is_empty() || !seen_skills.insert(key) {
                continue;
            }
            combined.skills.push(skill.name);
        }

        match profile.platform {
            Platform::Github => {
                extend_from(&mut combined.repositories, &profile.record, "repositories");
            }
            Platform::Linkedin => {
                extend_from(&mut combined.experience, &profile.record, "experience");
                extend_from(&mut combined.education, &profile.record, "education");
                extend_from(
                    &mut combined.certifications,
                    &profile.record,
                    "certifications",
                );
            }
            Platform::Leetcode => {
                if let Some(solved) = data_field(&profile.record, "solved_problems") {
                    combined.problem_solving = Some(solved.clone());
                }
                if let Some(submissions) = data_field(&profile.record, "recent_submissions") {
                    combined.submissions = Some(submissions.clone());
                }
            }
            Platform::Codeforces | Platform::Generic => {}
        }

        // Projects merge from every platform, not just the typed ones.
        extend_from(&mut combined.projects, &profile.record, "projects");
    }

    combined
}
