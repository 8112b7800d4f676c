use time::OffsetDateTime;
use tracing::{debug, instrument, warn};

use super::{generate_id, job_key, Repository, RepositoryError, JOBS_INDEX};
use crate::infrastructure::store::Batch;
use crate::marshal::{self, MarshalError};
use crate::modules::job::model::{Job, JobFilter};

impl Repository {
    /// Stores `job`, assigning an id and a UTC creation time when missing.
    ///
    /// There is no existence check: a caller-supplied id that is already in
    /// use is overwritten.
    #[instrument(skip_all, fields(provider = %job.provider_name))]
    pub async fn create_job(&self, job: &mut Job) -> Result<(), RepositoryError> {
        if job.id.is_empty() {
            job.id = generate_id()?;
        }
        if job.creation_time.is_none() {
            job.creation_time = Some(OffsetDateTime::now_utc());
        }

        let fields = marshal::to_fields(job)?;

        let mut batch = Batch::new();
        batch
            .replace_hash(job_key(&job.id), fields)
            .add_member(JOBS_INDEX, job.id.as_str());
        self.store.exec(batch).await?;

        debug!(job_id = %job.id, "job stored");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_job(&self, id: &str) -> Result<Job, RepositoryError> {
        let fields = self.store.read_hash(&job_key(id)).await?;

        let mut job = Job::default();
        match marshal::load_fields(&fields, &mut job) {
            Ok(()) => {}
            Err(MarshalError::NotFound) => return Err(RepositoryError::JobNotFound),
            Err(e) => return Err(e.into()),
        }
        job.id = id.to_string();
        Ok(job)
    }

    #[instrument(skip_all, fields(job_id = %job.id))]
    pub async fn delete_job(&self, job: &Job) -> Result<(), RepositoryError> {
        if !self.store.delete_hash(&job_key(&job.id)).await? {
            return Err(RepositoryError::JobNotFound);
        }

        if let Err(e) = self.store.remove_member(JOBS_INDEX, &job.id).await {
            warn!(job_id = %job.id, error = %e, "failed to remove job from index");
        }
        Ok(())
    }

    /// Jobs created at or after `filter.since`, oldest first, capped at
    /// `filter.limit` when non-zero.
    pub async fn list_jobs(&self, filter: JobFilter) -> Result<Vec<Job>, RepositoryError> {
        let ids = self.store.members(JOBS_INDEX).await?;

        let mut jobs = Vec::with_capacity(ids.len());
        for id in ids {
            match self.get_job(&id).await {
                Ok(job) => jobs.push(job),
                Err(RepositoryError::JobNotFound) => {
                    debug!(job_id = %id, "skipping dangling index entry");
                }
                Err(e) => return Err(e),
            }
        }

        if let Some(since) = filter.since {
            jobs.retain(|job| job.creation_time.is_some_and(|created| created >= since));
        }
        jobs.sort_by(|a, b| {
            a.creation_time
                .cmp(&b.creation_time)
                .then_with(|| a.id.cmp(&b.id))
        });
        if filter.limit > 0 {
            jobs.truncate(filter.limit);
        }
        Ok(jobs)
    }
}
