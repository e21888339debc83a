use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::aggregate::{combine, CombinedProfile};
use crate::config::EngineConfig;
use crate::embed::{create_embedder, TextEmbedder};
use crate::error::MatchError;
use crate::extraction::{extract_job_skills, extract_profile_skills};
use crate::matching::pipeline::{batch_match, ProfileMatches};
use crate::matching::scoring::{compute_match, score_report, ScoreReport};
use crate::skill_normalizer::normalize_skills_vec;
use crate::sources::{Platform, SourceRegistry};
use crate::store::{
    create_store, JobInsert, MatchInsert, MemoryStore, PersistenceStore, ProfileInsert, RankedJob,
};
use crate::text::{job_matching_text, profile_matching_text, profile_sections};
use crate::{Job, MatchResult, PlatformProfile, Profile, Skill};

/// A profile after extraction and embedding, ready for matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedProfile {
    pub username: String,
    pub platform: Platform,
    pub skills: Vec<Skill>,
    pub embedding: Option<Vec<f32>>,
    pub record: Value,
}

/// A job after extraction and embedding. `id` is set when persistence
/// succeeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedJob {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub skills: Vec<Skill>,
    pub embedding: Option<Vec<f32>>,
}

/// Combined-profile score with per-platform attribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedMatchReport {
    #[serde(flatten)]
    pub report: ScoreReport,
    pub profile_name: String,
    pub platforms: Vec<Platform>,
    pub platform_contributions: BTreeMap<String, f64>,
}

/// The matching engine with its collaborators injected at construction:
/// a text embedder and a persistence store. No global state; every scoring
/// call is a pure function of its inputs plus opportunistic persistence.
pub struct MatchService {
    config: EngineConfig,
    embedder: Arc<dyn TextEmbedder>,
    store: Arc<dyn PersistenceStore>,
}

impl MatchService {
    pub fn new(
        config: EngineConfig,
        embedder: Arc<dyn TextEmbedder>,
        store: Arc<dyn PersistenceStore>,
    ) -> Self {
        Self {
            config,
            embedder,
            store,
        }
    }

    /// Build from configuration: hash embedder plus the configured store
    /// backend. A store that fails to open degrades to the in-memory store
    /// rather than failing construction.
    pub async fn from_config(config: EngineConfig) -> Self {
        let embedder = create_embedder("hash", config.embed_dimension);
        let store: Arc<dyn PersistenceStore> = match create_store(&config.store_backend).await {
            Ok(store) => store,
            Err(err) => {
                warn!(error = %err, "store unavailable; falling back to in-memory");
                Arc::new(MemoryStore::new())
            }
        };
        Self::new(config, embedder, store)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Extract, embed and persist a raw profile record. Storage failures
    /// are logged and do not fail the call.
    pub async fn process_profile(
        &self,
        platform: Platform,
        username: &str,
        record: &Value,
    ) -> ProcessedProfile {
        let skills = extract_profile_skills(record);
        let sections = profile_sections(record, platform);
        let combined_text = sections.get("combined").map(String::as_str).unwrap_or("");
        let embedding = self.embedder.embed(combined_text).await;

        let skill_names: Vec<String> = skills.iter().map(|s| s.name.clone()).collect();
        let insert = ProfileInsert {
            username: username.to_string(),
            platform: Some(platform),
            record: record.clone(),
            skills: normalize_skills_vec(&skill_names),
            embedding: embedding.clone(),
        };
        if let Err(err) = self.store.store_profile(insert).await {
            warn!(username, platform = %platform, error = %err, "profile store failed; continuing");
        }

        ProcessedProfile {
            username: username.to_string(),
            platform,
            skills,
            embedding,
            record: record.clone(),
        }
    }

    /// Extract, embed and persist a raw job record.
    pub async fn process_job(&self, record: &Value) -> ProcessedJob {
        let skills = extract_job_skills(record);
        let embedding = self.embedder.embed(&job_matching_text(record)).await;

        let title = record
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let company = record
            .get("company")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let description = record
            .get("description")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let skill_names: Vec<String> = skills.iter().map(|s| s.name.clone()).collect();
        let insert = JobInsert {
            title: title.clone(),
            company: company.clone(),
            description: description.clone(),
            skills: normalize_skills_vec(&skill_names),
            embedding: embedding.clone(),
        };
        let id = match self.store.store_job(insert).await {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(title = %title, error = %err, "job store failed; continuing");
                None
            }
        };

        ProcessedJob {
            id,
            title,
            company,
            description,
            skills,
            embedding,
        }
    }

    /// Coarse combined score for a raw profile × job pair. Never errors:
    /// internal failures produce the neutral 0.5 result with an error
    /// indicator attached.
    pub async fn score(&self, profile_record: &Value, job_record: &Value) -> ScoreReport {
        match self.try_score(profile_record, job_record).await {
            Ok(report) => report,
            Err(err) => {
                warn!(error = %err, "scoring failed; returning neutral result");
                ScoreReport::neutral(err.to_string())
            }
        }
    }

    async fn try_score(
        &self,
        profile_record: &Value,
        job_record: &Value,
    ) -> Result<ScoreReport, MatchError> {
        if !profile_record.is_object() {
            return Err(MatchError::MissingInput("profile record"));
        }
        if !job_record.is_object() {
            return Err(MatchError::MissingInput("job record"));
        }

        let candidate = extract_profile_skills(profile_record);
        let job = extract_job_skills(job_record);

        // Absent embeddings degrade to zero similarity, never an error.
        let profile_vector = self.embedder.embed(&profile_matching_text(profile_record)).await;
        let job_vector = self.embedder.embed(&job_matching_text(job_record)).await;

        Ok(score_report(
            &candidate,
            &job,
            profile_vector.as_deref(),
            job_vector.as_deref(),
            &self.config.score_weights,
        ))
    }

    /// Detailed per-requirement comparison of typed records (the weighted
    /// path). Always returns a well-formed result.
    pub fn score_detailed(&self, profile: &Profile, job: &Job) -> MatchResult {
        compute_match(profile, job, &self.config.match_params())
    }

    /// Batch surface: every profile × every job, ranked per profile.
    pub fn batch(&self, profiles: &[Profile], jobs: &[Job]) -> Vec<ProfileMatches> {
        batch_match(profiles, jobs, &self.config.match_params())
    }

    /// Merge per-platform profiles and score the combination against a job,
    /// with a rough per-platform attribution of the total.
    pub async fn combined_score(
        &self,
        profiles: &[PlatformProfile],
        job_record: &Value,
    ) -> CombinedMatchReport {
        let combined = combine(profiles);
        let report = match serde_json::to_value(&combined) {
            Ok(combined_record) => self.score(&combined_record, job_record).await,
            Err(err) => {
                warn!(error = %err, "combined profile serialization failed");
                ScoreReport::neutral(err.to_string())
            }
        };

        let contributions = platform_contributions(&combined, report.overall_score);
        let profile_name = if combined.name.is_empty() {
            "Combined Profile".to_string()
        } else {
            combined.name.clone()
        };

        CombinedMatchReport {
            report,
            profile_name,
            platforms: combined.platforms,
            platform_contributions: contributions,
        }
    }

    /// Detailed (per-requirement) comparison of a merged multi-platform
    /// profile against a typed job.
    pub fn combined_score_detailed(&self, profiles: &[PlatformProfile], job: &Job) -> MatchResult {
        let combined = combine(profiles);
        self.score_detailed(&combined.to_profile(), job)
    }

    /// Fetch profiles from the registered sources and merge them. Platforms
    /// that are unsupported or failing are skipped by the registry.
    pub async fn fetch_and_combine(
        &self,
        registry: &SourceRegistry,
        requests: &[(String, String)],
    ) -> CombinedProfile {
        combine(&registry.fetch_profiles(requests).await)
    }

    /// Match a stored profile against stored jobs (all of them, or a given
    /// id subset), best first. Matches are persisted opportunistically;
    /// store failures degrade to the unpersisted ranking.
    pub async fn match_profile_to_jobs(
        &self,
        platform: Platform,
        username: &str,
        job_ids: Option<&[i64]>,
        limit: usize,
    ) -> Vec<RankedJob> {
        let profile = match self.store.get_profile(username, platform).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                warn!(username, platform = %platform, "profile not found");
                return Vec::new();
            }
            Err(err) => {
                warn!(username, platform = %platform, error = %err, "profile lookup failed");
                return Vec::new();
            }
        };

        let ranked = match job_ids {
            Some(ids) => {
                let mut jobs = Vec::with_capacity(ids.len());
                for id in ids {
                    match self.store.get_job(*id).await {
                        Ok(Some(job)) => jobs.push(job),
                        Ok(None) => warn!(job_id = *id, "job not found; skipping"),
                        Err(err) => warn!(job_id = *id, error = %err, "job lookup failed; skipping"),
                    }
                }
                crate::store::rank_stored_jobs(
                    &jobs,
                    profile.embedding.as_deref(),
                    &profile.skills,
                    limit,
                    &self.config.score_weights,
                )
            }
            None => match self
                .store
                .find_matching_jobs(profile.embedding.as_deref(), &profile.skills, limit)
                .await
            {
                Ok(ranked) => ranked,
                Err(err) => {
                    warn!(error = %err, "job search failed");
                    return Vec::new();
                }
            },
        };

        for matched in &ranked {
            let insert = MatchInsert {
                profile_id: profile.id,
                job_id: matched.job.id,
                score: matched.combined_score,
                matching_skills: matched.skill_overlap.clone(),
                skill_overlap_pct: matched.skill_overlap_pct,
            };
            if let Err(err) = self.store.store_match(insert).await {
                warn!(job_id = matched.job.id, error = %err, "match store failed; continuing");
            }
        }

        ranked
    }
}

/// Rough estimate of how much each platform contributed to a combined
/// score; coefficients follow the share of matching signal each platform
/// typically carries (code, experience, problem solving).
fn platform_contributions(combined: &CombinedProfile, total: f64) -> BTreeMap<String, f64> {
    let mut contributions = BTreeMap::new();
    for platform in &combined.platforms {
        let contribution = match platform {
            Platform::Github => (total * 0.5).min(0.6),
            Platform::Linkedin => (total * 0.3).min(0.4),
            Platform::Leetcode => (total * 0.2).min(0.3),
            _ => 0.0,
        };
        contributions.insert(platform.to_string(), contribution);
    }
    contributions
}
