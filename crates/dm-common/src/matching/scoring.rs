use serde::{Deserialize, Serialize};

use crate::embed::cosine_similarity;
use crate::matching::skills::{match_skills, MatchParams};
use crate::matching::weights::ScoreWeights;
use crate::skill_normalizer::normalize_skill_set;
use crate::{Job, MatchResult, Profile, Skill};

/// Recommendation tier messages, one fixed string per tier.
pub const RECOMMEND_EXCELLENT: &str = "Excellent match - Highly recommended for this position";
pub const RECOMMEND_GOOD: &str = "Good match - Strong candidate for this position";
pub const RECOMMEND_MODERATE: &str = "Moderate match - Consider with additional training";
pub const RECOMMEND_WEAK: &str = "Weak match - Significant skill gaps for this position";
pub const RECOMMEND_POOR: &str = "Poor match - Not recommended for this position";

/// Map a 0-100 match percentage onto a recommendation tier. Boundaries are
/// inclusive on the lower threshold of each tier.
pub fn recommendation_for(overall_match: f64) -> &'static str {
    if overall_match >= 85.0 {
        RECOMMEND_EXCELLENT
    } else if overall_match >= 70.0 {
        RECOMMEND_GOOD
    } else if overall_match >= 50.0 {
        RECOMMEND_MODERATE
    } else if overall_match >= 30.0 {
        RECOMMEND_WEAK
    } else {
        RECOMMEND_POOR
    }
}

/// Plain set intersection of normalized skill names (the coarse path).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillOverlap {
    /// `|candidate ∩ job| / |job|`, 0 when the job lists no skills.
    pub percentage: f64,
    /// Normalized names present on both sides, sorted.
    pub matched: Vec<String>,
    /// Normalized job names the candidate lacks, sorted.
    pub missing: Vec<String>,
}

pub fn skill_overlap(candidate: &[Skill], job: &[Skill]) -> SkillOverlap {
    let names = |skills: &[Skill]| -> Vec<String> {
        skills.iter().map(|s| s.name.clone()).collect()
    };
    let candidate_set = normalize_skill_set(&names(candidate));
    let job_set = normalize_skill_set(&names(job));

    if job_set.is_empty() {
        return SkillOverlap {
            percentage: 0.0,
            matched: Vec::new(),
            missing: Vec::new(),
        };
    }

    let mut matched: Vec<String> = job_set.intersection(&candidate_set).cloned().collect();
    let mut missing: Vec<String> = job_set.difference(&candidate_set).cloned().collect();
    matched.sort();
    missing.sort();

    SkillOverlap {
        percentage: matched.len() as f64 / job_set.len() as f64,
        matched,
        missing,
    }
}

/// Counters attached to a coarse score for explainability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchDetailCounts {
    pub profile_skills_count: usize,
    pub job_skills_count: usize,
    pub matching_skills_count: usize,
}

/// The fast combined score: skill-set overlap blended with semantic vector
/// similarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Blended score on a [0,1] scale.
    pub overall_score: f64,
    pub skill_match: f64,
    pub vector_similarity: f64,
    pub skills_matched: Vec<String>,
    pub skills_missing: Vec<String>,
    pub match_details: MatchDetailCounts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScoreReport {
    /// Neutral fallback when scoring fails internally: the caller always
    /// gets a result object, never an error.
    pub fn neutral(error: impl Into<String>) -> Self {
        Self {
            overall_score: 0.5,
            skill_match: 0.5,
            vector_similarity: 0.5,
            skills_matched: Vec::new(),
            skills_missing: Vec::new(),
            match_details: MatchDetailCounts::default(),
            error: Some(error.into()),
        }
    }

    pub fn recommendation(&self) -> &'static str {
        recommendation_for(self.overall_score * 100.0)
    }
}

/// Coarse combined score from extracted skills and optional embeddings.
/// Absent or zero-norm vectors contribute zero similarity.
pub fn score_report(
    candidate: &[Skill],
    job: &[Skill],
    profile_vector: Option<&[f32]>,
    job_vector: Option<&[f32]>,
    weights: &ScoreWeights,
) -> ScoreReport {
    let overlap = skill_overlap(candidate, job);

    let vector_similarity = match (profile_vector, job_vector) {
        (Some(a), Some(b)) => cosine_similarity(a, b),
        _ => 0.0,
    };

    ScoreReport {
        overall_score: weights.blend(overlap.percentage, vector_similarity),
        skill_match: overlap.percentage,
        vector_similarity,
        match_details: MatchDetailCounts {
            profile_skills_count: candidate.len(),
            job_skills_count: job.len(),
            matching_skills_count: overlap.matched.len(),
        },
        skills_matched: overlap.matched,
        skills_missing: overlap.missing,
        error: None,
    }
}

/// Detailed profile × job comparison (the weighted path): per-requirement
/// records, missing skills, strengths and a recommendation tier.
pub fn compute_match(profile: &Profile, job: &Job, params: &MatchParams) -> MatchResult {
    let outcome = match_skills(&profile.skills, &job.requirements, params);

    MatchResult {
        profile_name: profile.identity.name.clone(),
        job_title: job.title.clone(),
        company: job.company.clone(),
        recommendation: recommendation_for(outcome.overall_match).to_string(),
        overall_match: outcome.overall_match,
        skill_matches: outcome.skill_matches,
        missing_skills: outcome.missing_skills,
        strengths: outcome.strengths,
        error: None,
    }
}
