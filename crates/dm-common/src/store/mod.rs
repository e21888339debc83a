pub mod json_file;
pub mod memory;

use std::cmp::Ordering;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::embed::cosine_similarity;
use crate::matching::weights::ScoreWeights;
use crate::skill_normalizer::normalize_skill_set;
use crate::sources::Platform;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("not found: {0}")]
    NotFound(String),
}

/// Which persistence backend to use. The duality is intentional: a durable
/// JSON file and a process-local memory store behind the same trait,
/// selected by configuration, never branched on inside core logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    JsonFile(PathBuf),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredProfile {
    pub id: i64,
    pub username: String,
    pub platform: Platform,
    pub record: Value,
    /// Normalized skill names, for overlap queries.
    pub skills: Vec<String>,
    pub embedding: Option<Vec<f32>>,
    pub stored_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredJob {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub description: Option<String>,
    /// Normalized skill names, for overlap queries.
    pub skills: Vec<String>,
    pub embedding: Option<Vec<f32>>,
    pub stored_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMatch {
    pub id: i64,
    pub profile_id: i64,
    pub job_id: i64,
    pub score: f64,
    pub matching_skills: Vec<String>,
    pub skill_overlap_pct: f64,
    pub stored_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileInsert {
    pub username: String,
    pub platform: Option<Platform>,
    pub record: Value,
    pub skills: Vec<String>,
    pub embedding: Option<Vec<f32>>,
}

#[derive(Debug, Clone, Default)]
pub struct JobInsert {
    pub title: String,
    pub company: String,
    pub description: Option<String>,
    pub skills: Vec<String>,
    pub embedding: Option<Vec<f32>>,
}

#[derive(Debug, Clone, Default)]
pub struct MatchInsert {
    pub profile_id: i64,
    pub job_id: i64,
    pub score: f64,
    pub matching_skills: Vec<String>,
    pub skill_overlap_pct: f64,
}

/// A stored job ranked against a profile's skills and embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedJob {
    pub job: StoredJob,
    pub skill_overlap: Vec<String>,
    pub skill_overlap_pct: f64,
    pub vector_similarity: f64,
    pub combined_score: f64,
}

/// Durable record of profiles, jobs and matches. Store calls are
/// opportunistic: a failure degrades to a logged no-op at the call site and
/// never fails the match computation.
#[async_trait]
pub trait PersistenceStore: Send + Sync {
    async fn store_profile(&self, insert: ProfileInsert) -> Result<i64, StorageError>;
    async fn store_job(&self, insert: JobInsert) -> Result<i64, StorageError>;
    async fn store_match(&self, insert: MatchInsert) -> Result<i64, StorageError>;

    async fn get_profile(
        &self,
        username: &str,
        platform: Platform,
    ) -> Result<Option<StoredProfile>, StorageError>;
    async fn get_job(&self, id: i64) -> Result<Option<StoredJob>, StorageError>;
    async fn all_jobs(&self) -> Result<Vec<StoredJob>, StorageError>;

    /// Rank every stored job against the given skills/embedding, best first.
    async fn find_matching_jobs(
        &self,
        embedding: Option<&[f32]>,
        skills: &[String],
        limit: usize,
    ) -> Result<Vec<RankedJob>, StorageError>;
}

/// Store factory, mirroring the embedder factory.
pub async fn create_store(backend: &StoreBackend) -> Result<Arc<dyn PersistenceStore>, StorageError> {
    match backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::JsonFile(path) => Ok(Arc::new(JsonFileStore::open(path.clone()).await?)),
    }
}

/// The whole persisted dataset. Shared by both backends; the JSON store
/// serializes this struct verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct StoreState {
    pub profiles: Vec<StoredProfile>,
    pub jobs: Vec<StoredJob>,
    pub matches: Vec<StoredMatch>,
    pub next_id: i64,
}

impl StoreState {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn insert_profile(&mut self, insert: ProfileInsert) -> i64 {
        let platform = insert.platform.unwrap_or(Platform::Generic);
        // Re-storing a username/platform pair replaces the previous record.
        self.profiles
            .retain(|p| !(p.username == insert.username && p.platform == platform));

        let id = self.allocate_id();
        self.profiles.push(StoredProfile {
            id,
            username: insert.username,
            platform,
            record: insert.record,
            skills: insert.skills,
            embedding: insert.embedding,
            stored_at: Utc::now(),
        });
        id
    }

    pub fn insert_job(&mut self, insert: JobInsert) -> i64 {
        let id = self.allocate_id();
        self.jobs.push(StoredJob {
            id,
            title: insert.title,
            company: insert.company,
            description: insert.description,
            skills: insert.skills,
            embedding: insert.embedding,
            stored_at: Utc::now(),
        });
        id
    }

    pub fn insert_match(&mut self, insert: MatchInsert) -> i64 {
        let id = self.allocate_id();
        self.matches.push(StoredMatch {
            id,
            profile_id: insert.profile_id,
            job_id: insert.job_id,
            score: insert.score,
            matching_skills: insert.matching_skills,
            skill_overlap_pct: insert.skill_overlap_pct,
            stored_at: Utc::now(),
        });
        id
    }

    pub fn profile(&self, username: &str, platform: Platform) -> Option<StoredProfile> {
        self.profiles
            .iter()
            .find(|p| p.username == username && p.platform == platform)
            .cloned()
    }

    pub fn job(&self, id: i64) -> Option<StoredJob> {
        self.jobs.iter().find(|j| j.id == id).cloned()
    }
}

/// Rank stored jobs for a skill set and optional embedding. Shared by both
/// backends so they stay behaviourally identical.
pub(crate) fn rank_stored_jobs(
    jobs: &[StoredJob],
    embedding: Option<&[f32]>,
    skills: &[String],
    limit: usize,
    weights: &ScoreWeights,
) -> Vec<RankedJob> {
    let profile_set = normalize_skill_set(skills);

    let mut ranked: Vec<RankedJob> = jobs
        .iter()
        .map(|job| {
            let job_set = normalize_skill_set(&job.skills);
            let mut overlap: Vec<String> =
                job_set.intersection(&profile_set).cloned().collect();
            overlap.sort();

            let skill_overlap_pct = if job_set.is_empty() {
                0.0
            } else {
                overlap.len() as f64 / job_set.len() as f64
            };

            let vector_similarity = match (embedding, job.embedding.as_deref()) {
                (Some(a), Some(b)) => cosine_similarity(a, b),
                _ => 0.0,
            };

            RankedJob {
                combined_score: weights.blend(skill_overlap_pct, vector_similarity),
                job: job.clone(),
                skill_overlap: overlap,
                skill_overlap_pct,
                vector_similarity,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.combined_score
            .partial_cmp(&a.combined_score)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(limit);
    ranked
}
