use serde::{Deserialize, Serialize};

use crate::matching::skills::{match_skills, MatchParams};
use crate::matching::scoring::skill_overlap;
use crate::Skill;

/// Which skill-scoring algorithm feeds a [0,1] score.
///
/// Both exist in the legacy system: the weighted path backs the detailed
/// per-requirement report, the plain set intersection backs the fast
/// combined score. Callers pick per call path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringStrategy {
    /// Importance-weighted per-requirement matching with partial credit.
    #[default]
    Weighted,
    /// Plain intersection of normalized skill sets over the job set size.
    SetOverlap,
}

impl ScoringStrategy {
    /// Score candidate skills against job skills on a [0,1] scale.
    pub fn skill_score(&self, candidate: &[Skill], job: &[Skill], params: &MatchParams) -> f64 {
        match self {
            ScoringStrategy::Weighted => match_skills(candidate, job, params).overall_match / 100.0,
            ScoringStrategy::SetOverlap => skill_overlap(candidate, job).percentage,
        }
    }
}

/// When does a matched requirement count as a strength?
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthPolicy {
    /// `match_score >= 0.7 * importance` and a non-zero score.
    #[default]
    ImportanceWeighted,
    /// `importance >= 0.7` and `match_score >= 0.8`.
    HighImportanceHighScore,
}

impl StrengthPolicy {
    pub fn is_strength(&self, importance: f64, match_score: f64) -> bool {
        match self {
            StrengthPolicy::ImportanceWeighted => {
                match_score >= 0.7 * importance && match_score > 0.0
            }
            StrengthPolicy::HighImportanceHighScore => importance >= 0.7 && match_score >= 0.8,
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "importance_weighted" => Some(Self::ImportanceWeighted),
            "high_importance_high_score" => Some(Self::HighImportanceHighScore),
            _ => None,
        }
    }
}
