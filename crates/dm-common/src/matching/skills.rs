use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::matching::strategy::StrengthPolicy;
use crate::skill_normalizer::normalize_skill;
use crate::{Skill, SkillMatchRecord};

/// Knobs for the weighted matcher.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchParams {
    /// Minimum token-overlap similarity for a partial match.
    pub threshold: f64,
    pub strength_policy: StrengthPolicy,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            strength_policy: StrengthPolicy::default(),
        }
    }
}

/// Outcome of matching one candidate skill set against one job's
/// requirements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub skill_matches: Vec<SkillMatchRecord>,
    pub missing_skills: Vec<String>,
    /// 0-100, rounded to the nearest integer.
    pub overall_match: f64,
    pub strengths: Vec<String>,
}

impl MatchOutcome {
    fn empty_with_missing(job_skills: &[Skill]) -> Self {
        Self {
            skill_matches: Vec::new(),
            missing_skills: job_skills.iter().map(|s| s.name.clone()).collect(),
            overall_match: 0.0,
            strengths: Vec::new(),
        }
    }
}

/// How a requirement was satisfied, if at all.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Satisfaction {
    /// Normalized names equal; achieved level = candidate weight.
    Exact(f64),
    /// One normalized name contains the other; counts as a full match even
    /// below the numeric threshold (legacy short-circuit, kept on purpose).
    Containment,
    /// Best token-overlap similarity cleared the threshold.
    Partial(f64),
    Missing,
}

impl Satisfaction {
    fn achieved_level(&self) -> f64 {
        match self {
            Satisfaction::Exact(level) => *level,
            Satisfaction::Containment => 1.0,
            Satisfaction::Partial(similarity) => *similarity,
            Satisfaction::Missing => 0.0,
        }
    }
}

fn token_similarity(a: &str, b: &str) -> f64 {
    let a_tokens: HashSet<&str> = a.split_whitespace().collect();
    let b_tokens: HashSet<&str> = b.split_whitespace().collect();
    let max_len = a_tokens.len().max(b_tokens.len());
    if max_len == 0 {
        return 0.0;
    }
    let shared = a_tokens.intersection(&b_tokens).count();
    shared as f64 / max_len as f64
}

fn satisfy(
    normalized_job: &str,
    candidates: &[(String, f64)],
    threshold: f64,
) -> Satisfaction {
    if normalized_job.is_empty() {
        return Satisfaction::Missing;
    }

    // Exact match first: candidate weight is the achieved level.
    for (normalized_cand, weight) in candidates {
        if normalized_cand == normalized_job {
            return Satisfaction::Exact(*weight);
        }
    }

    // Substring containment short-circuits before token similarity; the
    // first candidate in input order wins.
    for (normalized_cand, _) in candidates {
        if normalized_cand.is_empty() {
            continue;
        }
        if normalized_job.contains(normalized_cand.as_str())
            || normalized_cand.contains(normalized_job)
        {
            return Satisfaction::Containment;
        }
    }

    // Token-overlap fallback; strictly-greater comparison keeps the first
    // encountered candidate on ties (determinism requirement).
    let mut best = 0.0_f64;
    for (normalized_cand, _) in candidates {
        if normalized_cand.is_empty() {
            continue;
        }
        let similarity = token_similarity(normalized_job, normalized_cand);
        if similarity > best {
            best = similarity;
        }
    }

    if best >= threshold {
        Satisfaction::Partial(best)
    } else {
        Satisfaction::Missing
    }
}

/// Match candidate skills against weighted job requirements.
///
/// One `SkillMatchRecord` per requirement, in requirement order; duplicate
/// requirements are scored independently and one candidate skill may satisfy
/// several requirements. Pure function of its inputs.
pub fn match_skills(candidate: &[Skill], job: &[Skill], params: &MatchParams) -> MatchOutcome {
    if candidate.is_empty() || job.is_empty() {
        return MatchOutcome::empty_with_missing(job);
    }

    let normalized_candidates: Vec<(String, f64)> = candidate
        .iter()
        .map(|s| (normalize_skill(&s.name), s.weight))
        .collect();

    let total_importance: f64 = job.iter().map(|s| s.weight).sum();

    let mut skill_matches = Vec::with_capacity(job.len());
    let mut missing_skills = Vec::new();
    let mut strengths = Vec::new();
    let mut current_score = 0.0;

    for job_skill in job {
        let normalized_job = normalize_skill(&job_skill.name);
        let satisfaction = satisfy(&normalized_job, &normalized_candidates, params.threshold);

        let achieved = satisfaction.achieved_level();
        let match_score = job_skill.weight * achieved;
        current_score += match_score;

        if satisfaction == Satisfaction::Missing {
            missing_skills.push(job_skill.name.clone());
        } else if params.strength_policy.is_strength(job_skill.weight, match_score) {
            strengths.push(job_skill.name.clone());
        }

        skill_matches.push(SkillMatchRecord {
            skill_name: job_skill.name.clone(),
            job_importance: job_skill.weight,
            candidate_level: achieved,
            match_score,
        });
    }

    let overall_match = if total_importance > 0.0 {
        (current_score / total_importance * 100.0).round()
    } else {
        0.0
    };

    MatchOutcome {
        skill_matches,
        missing_skills,
        overall_match,
        strengths,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(name: &str, weight: f64) -> Skill {
        Skill::new(name, weight)
    }

    #[test]
    fn exact_match_gets_full_credit() {
        let outcome = match_skills(
            &[skill("Python", 1.0)],
            &[skill("Python", 0.9)],
            &MatchParams::default(),
        );

        assert_eq!(outcome.overall_match, 100.0);
        assert_eq!(outcome.skill_matches.len(), 1);
        assert_eq!(outcome.skill_matches[0].match_score, 0.9);
        assert_eq!(outcome.skill_matches[0].candidate_level, 1.0);
        assert!(outcome.missing_skills.is_empty());
        assert_eq!(outcome.strengths, vec!["Python".to_string()]);
    }

    #[test]
    fn empty_candidate_reports_all_requirements_missing() {
        let outcome = match_skills(&[], &[skill("React", 0.8)], &MatchParams::default());

        assert_eq!(outcome.overall_match, 0.0);
        assert_eq!(outcome.missing_skills, vec!["React".to_string()]);
        assert!(outcome.skill_matches.is_empty());
        assert!(outcome.strengths.is_empty());
    }

    #[test]
    fn intermediate_level_earns_partial_credit() {
        let outcome = match_skills(
            &[skill("react", 0.7)],
            &[skill("React", 1.0)],
            &MatchParams::default(),
        );

        assert_eq!(outcome.skill_matches[0].match_score, 0.7);
        assert_eq!(outcome.overall_match, 70.0);
    }

    #[test]
    fn aliases_count_as_exact_matches() {
        let outcome = match_skills(
            &[skill("JS", 1.0), skill("PostgreSQL", 1.0)],
            &[skill("JavaScript", 1.0)],
            &MatchParams::default(),
        );

        assert_eq!(outcome.overall_match, 100.0);
    }

    #[test]
    fn containment_is_a_full_match_below_threshold() {
        // "machine learning engineering" vs "machine learning": token overlap
        // is 2/3 < 0.7, but containment holds.
        let outcome = match_skills(
            &[skill("machine learning engineering", 1.0)],
            &[skill("machine learning", 1.0)],
            &MatchParams::default(),
        );

        assert_eq!(outcome.overall_match, 100.0);
        assert_eq!(outcome.skill_matches[0].candidate_level, 1.0);
    }

    #[test]
    fn token_overlap_needs_the_threshold() {
        // "data platform engineering" vs "data engineering": shared 2 of
        // max 3 tokens = 0.667, below the 0.7 default, no containment.
        let below = match_skills(
            &[skill("data platform engineering", 1.0)],
            &[skill("data engineering", 1.0)],
            &MatchParams::default(),
        );
        assert_eq!(below.overall_match, 0.0);
        assert_eq!(below.missing_skills.len(), 1);

        let relaxed = match_skills(
            &[skill("data platform engineering", 1.0)],
            &[skill("data engineering", 1.0)],
            &MatchParams {
                threshold: 0.6,
                ..MatchParams::default()
            },
        );
        assert_eq!(relaxed.overall_match, 67.0);
        assert!((relaxed.skill_matches[0].candidate_level - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn zero_total_importance_scores_zero() {
        let outcome = match_skills(
            &[skill("python", 1.0)],
            &[skill("python", 0.0)],
            &MatchParams::default(),
        );

        assert_eq!(outcome.overall_match, 0.0);
    }

    #[test]
    fn duplicate_requirements_each_scored() {
        let outcome = match_skills(
            &[skill("python", 1.0)],
            &[skill("Python", 1.0), skill("python", 0.5)],
            &MatchParams::default(),
        );

        assert_eq!(outcome.skill_matches.len(), 2);
        assert_eq!(outcome.overall_match, 100.0);
    }

    #[test]
    fn one_candidate_skill_may_satisfy_many_requirements() {
        let outcome = match_skills(
            &[skill("sql", 1.0)],
            &[skill("SQL", 1.0), skill("sql database", 0.5)],
            &MatchParams::default(),
        );

        // "sql database" normalizes to "sql" via the alias table.
        assert_eq!(outcome.overall_match, 100.0);
        assert!(outcome.missing_skills.is_empty());
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let candidate = [
            skill("python", 1.0),
            skill("machine learning", 0.7),
            skill("sql", 0.4),
        ];
        let job = [
            skill("Python", 1.0),
            skill("ML", 0.8),
            skill("data engineering", 0.6),
        ];

        let first = match_skills(&candidate, &job, &MatchParams::default());
        let second = match_skills(&candidate, &job, &MatchParams::default());

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn strength_policies_are_configurable() {
        let candidate = [skill("python", 1.0), skill("sql", 1.0)];
        let job = [skill("Python", 0.9), skill("SQL", 0.5)];

        let default_policy = match_skills(&candidate, &job, &MatchParams::default());
        assert_eq!(
            default_policy.strengths,
            vec!["Python".to_string(), "SQL".to_string()]
        );

        let strict = match_skills(
            &candidate,
            &job,
            &MatchParams {
                strength_policy: StrengthPolicy::HighImportanceHighScore,
                ..MatchParams::default()
            },
        );
        assert_eq!(strict.strengths, vec!["Python".to_string()]);
    }
}
