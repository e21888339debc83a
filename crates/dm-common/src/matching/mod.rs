pub mod pipeline;
pub mod scoring;
pub mod skills;
pub mod strategy;
pub mod weights;

pub use pipeline::{batch_match, rank_jobs, ProfileMatches};
pub use scoring::{
    compute_match, recommendation_for, score_report, skill_overlap, MatchDetailCounts,
    ScoreReport, SkillOverlap,
};
pub use skills::{match_skills, MatchOutcome, MatchParams};
pub use strategy::{ScoringStrategy, StrengthPolicy};
pub use weights::{ScoreWeights, DEFAULT_SCORE_WEIGHTS};
