pub mod aggregate;
pub mod config;
pub mod embed;
pub mod error;
pub mod extraction;
pub mod jobs;
pub mod logging;
pub mod matching;
pub mod service;
pub mod skill_normalizer;
pub mod sources;
pub mod store;
pub mod text;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use config::EngineConfig;
pub use error::MatchError;
pub use sources::Platform;

// Commonly used data models for matching functions. All of these are value
// types: created, transformed, and discarded within a single match
// computation (persistence hands ownership to the store, which assigns ids).

/// A skill with a [0,1] weight. For a job requirement the weight is its
/// importance; for a candidate skill it is the proficiency-derived level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub weight: f64,
}

impl Skill {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight: weight.clamp(0.0, 1.0),
        }
    }

    /// Presence-only skill: full weight.
    pub fn presence(name: impl Into<String>) -> Self {
        Self::new(name, 1.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileIdentity {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// A project attached to a candidate profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A candidate profile, possibly merged from several platforms.
/// The skills list holds unique normalized names (dedup on extraction/merge).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub identity: ProfileIdentity,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub platform_sections: BTreeMap<String, serde_json::Value>,
}

impl Profile {
    /// Build a typed profile from a raw platform record (any of the shapes
    /// the extractor tolerates).
    pub fn from_record(record: &serde_json::Value) -> Self {
        let str_field = |key: &str| {
            record
                .get(key)
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        };

        Self {
            identity: ProfileIdentity {
                name: str_field("name").unwrap_or_default(),
                bio: str_field("bio"),
                location: str_field("location"),
            },
            skills: extraction::extract_profile_skills(record),
            projects: extraction::extract_projects(record),
            platform_sections: BTreeMap::new(),
        }
    }
}

/// A job posting with weighted requirements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub title: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Vec<Skill>,
}

/// One row per job requirement in a match computation. Never mutated after
/// creation; `match_score = job_importance * candidate_level`, 0 if missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatchRecord {
    pub skill_name: String,
    pub job_importance: f64,
    pub candidate_level: f64,
    pub match_score: f64,
}

/// Terminal artifact of one profile × job comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub profile_name: String,
    pub job_title: String,
    pub company: String,
    /// Aggregate score on a 0-100 scale, rounded to the nearest integer.
    pub overall_match: f64,
    pub skill_matches: Vec<SkillMatchRecord>,
    pub missing_skills: Vec<String>,
    pub strengths: Vec<String>,
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A raw per-platform profile record, as handed over by a Profile Source.
/// The payload stays untyped until it crosses the extractor boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformProfile {
    pub platform: Platform,
    pub record: serde_json::Value,
}

impl PlatformProfile {
    pub fn new(platform: Platform, record: serde_json::Value) -> Self {
        Self { platform, record }
    }

    pub fn name(&self) -> Option<&str> {
        self.record.get("name").and_then(|v| v.as_str())
    }
}
