use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    rank_stored_jobs, JobInsert, MatchInsert, PersistenceStore, ProfileInsert, RankedJob,
    StorageError, StoreState, StoredJob, StoredProfile,
};
use crate::matching::weights::ScoreWeights;
use crate::sources::Platform;

/// Process-local store. Also the no-op fallback: when durable storage is
/// unavailable the service swaps this in so match computations keep working.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
    weights: ScoreWeights,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersistenceStore for MemoryStore {
    async fn store_profile(&self, insert: ProfileInsert) -> Result<i64, StorageError> {
        Ok(self.state.write().await.insert_profile(insert))
    }

    async fn store_job(&self, insert: JobInsert) -> Result<i64, StorageError> {
        Ok(self.state.write().await.insert_job(insert))
    }

    async fn store_match(&self, insert: MatchInsert) -> Result<i64, StorageError> {
        Ok(self.state.write().await.insert_match(insert))
    }

    async fn get_profile(
        &self,
        username: &str,
        platform: Platform,
    ) -> Result<Option<StoredProfile>, StorageError> {
        Ok(self.state.read().await.profile(username, platform))
    }

    async fn get_job(&self, id: i64) -> Result<Option<StoredJob>, StorageError> {
        Ok(self.state.read().await.job(id))
    }

    async fn all_jobs(&self) -> Result<Vec<StoredJob>, StorageError> {
        Ok(self.state.read().await.jobs.clone())
    }

    async fn find_matching_jobs(
        &self,
        embedding: Option<&[f32]>,
        skills: &[String],
        limit: usize,
    ) -> Result<Vec<RankedJob>, StorageError> {
        let state = self.state.read().await;
        Ok(rank_stored_jobs(
            &state.jobs,
            embedding,
            skills,
            limit,
            &self.weights,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_profiles_and_jobs() {
        let store = MemoryStore::new();

        let profile_id = store
            .store_profile(ProfileInsert {
                username: "ada".into(),
                platform: Some(Platform::Github),
                skills: vec!["rust".into(), "python".into()],
                ..Default::default()
            })
            .await
            .unwrap();

        let job_id = store
            .store_job(JobInsert {
                title: "Backend Engineer".into(),
                company: "Acme".into(),
                skills: vec!["rust".into()],
                ..Default::default()
            })
            .await
            .unwrap();

        assert_ne!(profile_id, job_id);

        let profile = store.get_profile("ada", Platform::Github).await.unwrap();
        assert_eq!(profile.unwrap().skills.len(), 2);

        let job = store.get_job(job_id).await.unwrap().unwrap();
        assert_eq!(job.title, "Backend Engineer");
        assert!(store.get_job(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn finds_matching_jobs_ranked() {
        let store = MemoryStore::new();
        store
            .store_job(JobInsert {
                title: "Java Shop".into(),
                company: "A".into(),
                skills: vec!["java".into()],
                ..Default::default()
            })
            .await
            .unwrap();
        store
            .store_job(JobInsert {
                title: "Python Shop".into(),
                company: "B".into(),
                skills: vec!["python".into()],
                ..Default::default()
            })
            .await
            .unwrap();

        let ranked = store
            .find_matching_jobs(None, &["python".to_string()], 10)
            .await
            .unwrap();

        assert_eq!(ranked[0].job.title, "Python Shop");
        assert!(ranked[0].combined_score > ranked[1].combined_score);
    }
}
