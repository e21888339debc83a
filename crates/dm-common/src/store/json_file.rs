use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::{
    rank_stored_jobs, JobInsert, MatchInsert, PersistenceStore, ProfileInsert, RankedJob,
    StorageError, StoreState, StoredJob, StoredProfile,
};
use crate::matching::weights::ScoreWeights;
use crate::sources::Platform;

/// JSON-file backed store: the whole dataset is kept in memory and written
/// back (pretty-printed) after every mutation. Meant for small single-node
/// deployments and as the durable fallback when no database is configured.
pub struct JsonFileStore {
    path: PathBuf,
    state: Mutex<StoreState>,
    weights: ScoreWeights,
}

impl JsonFileStore {
    /// Open (or create) the store file. A missing file starts an empty
    /// dataset; a corrupt file is an error rather than silent data loss.
    pub async fn open(path: PathBuf) -> Result<Self, StorageError> {
        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => StoreState::default(),
            Err(err) => return Err(err.into()),
        };

        debug!(path = %path.display(), "opened json store");
        Ok(Self {
            path,
            state: Mutex::new(state),
            weights: ScoreWeights::default(),
        })
    }

    async fn persist(&self, state: &StoreState) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(state)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl PersistenceStore for JsonFileStore {
    async fn store_profile(&self, insert: ProfileInsert) -> Result<i64, StorageError> {
        let mut state = self.state.lock().await;
        let id = state.insert_profile(insert);
        self.persist(&state).await?;
        Ok(id)
    }

    async fn store_job(&self, insert: JobInsert) -> Result<i64, StorageError> {
        let mut state = self.state.lock().await;
        let id = state.insert_job(insert);
        self.persist(&state).await?;
        Ok(id)
    }

    async fn store_match(&self, insert: MatchInsert) -> Result<i64, StorageError> {
        let mut state = self.state.lock().await;
        let id = state.insert_match(insert);
        self.persist(&state).await?;
        Ok(id)
    }

    async fn get_profile(
        &self,
        username: &str,
        platform: Platform,
    ) -> Result<Option<StoredProfile>, StorageError> {
        Ok(self.state.lock().await.profile(username, platform))
    }

    async fn get_job(&self, id: i64) -> Result<Option<StoredJob>, StorageError> {
        Ok(self.state.lock().await.job(id))
    }

    async fn all_jobs(&self) -> Result<Vec<StoredJob>, StorageError> {
        Ok(self.state.lock().await.jobs.clone())
    }

    async fn find_matching_jobs(
        &self,
        embedding: Option<&[f32]>,
        skills: &[String],
        limit: usize,
    ) -> Result<Vec<RankedJob>, StorageError> {
        let state = self.state.lock().await;
        Ok(rank_stored_jobs(
            &state.jobs,
            embedding,
            skills,
            limit,
            &self.weights,
        ))
    }
}
