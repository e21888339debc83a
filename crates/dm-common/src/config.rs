use std::path::PathBuf;

use crate::matching::skills::MatchParams;
use crate::matching::strategy::StrengthPolicy;
use crate::matching::weights::{ScoreWeights, DEFAULT_SCORE_WEIGHTS};
use crate::store::StoreBackend;

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Engine configuration. All knobs have env overrides so deployments can be
/// tuned without a rebuild.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Minimum token-overlap similarity for a partial skill match.
    pub skill_match_threshold: f64,
    /// Blend weights for the combined (overlap + semantic) score.
    pub score_weights: ScoreWeights,
    pub strength_policy: StrengthPolicy,
    pub embed_dimension: usize,
    pub store_backend: StoreBackend,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            skill_match_threshold: 0.7,
            score_weights: DEFAULT_SCORE_WEIGHTS,
            strength_policy: StrengthPolicy::default(),
            embed_dimension: 256,
            store_backend: StoreBackend::Memory,
        }
    }
}

impl EngineConfig {
    /// Read configuration from `DM_*` environment variables, falling back
    /// to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let store_backend = match std::env::var("DM_STORE_BACKEND").ok().as_deref() {
            Some("json") => {
                let path = std::env::var("DM_STORE_PATH")
                    .unwrap_or_else(|_| "devmatch_store.json".into());
                StoreBackend::JsonFile(PathBuf::from(path))
            }
            Some("memory") | None => StoreBackend::Memory,
            Some(other) => {
                tracing::warn!(backend = other, "unknown store backend; using memory");
                StoreBackend::Memory
            }
        };

        let strength_policy = std::env::var("DM_STRENGTH_POLICY")
            .ok()
            .and_then(|s| StrengthPolicy::parse(&s))
            .unwrap_or(defaults.strength_policy);

        Self {
            skill_match_threshold: env_parse(
                "DM_SKILL_MATCH_THRESHOLD",
                defaults.skill_match_threshold,
            ),
            score_weights: ScoreWeights {
                skill_overlap: env_parse(
                    "DM_SKILL_OVERLAP_WEIGHT",
                    defaults.score_weights.skill_overlap,
                ),
                vector_similarity: env_parse(
                    "DM_VECTOR_SIMILARITY_WEIGHT",
                    defaults.score_weights.vector_similarity,
                ),
            },
            strength_policy,
            embed_dimension: env_parse("DM_EMBED_DIMENSION", defaults.embed_dimension),
            store_backend,
        }
    }

    pub fn match_params(&self) -> MatchParams {
        MatchParams {
            threshold: self.skill_match_threshold,
            strength_policy: self.strength_policy,
        }
    }
}
