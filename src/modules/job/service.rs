use super::dto::{CreateJobRequest, JobResponse, ListJobsQuery};
use super::model::Job;
use crate::common::response::ApiError;
use crate::modules::provider::{ProviderError, TranscodingProvider};
use crate::repository::RepositoryError;
use crate::state::AppState;
use axum::http::StatusCode;
use tracing::info;
use validator::Validate;

pub struct JobService;

impl JobService {
    pub async fn create(state: AppState, req: CreateJobRequest) -> Result<Job, ApiError> {
        req.validate()?;

        // Unknown references in the request body are the caller's mistake.
        let preset_map = state
            .repository
            .get_preset_map(&req.preset)
            .await
            .map_err(|e| match e {
                RepositoryError::PresetMapNotFound => {
                    ApiError(
                        format!("preset map not found: {}", req.preset),
                        StatusCode::BAD_REQUEST,
                    )
                }
                e => ApiError::from(e),
            })?;

        let provider = Self::provider(&state, &req.provider).map_err(|e| match e {
            ProviderError::NotFound(_) => ApiError(e.to_string(), StatusCode::BAD_REQUEST),
            e => ApiError::from(e),
        })?;

        let streaming_params = req.streaming_params.map(|mut params| {
            if params.segment_duration == 0 {
                params.segment_duration = state.config.default_segment_duration;
            }
            params
        });

        let mut job = Job {
            provider_name: req.provider,
            source_media: req.source,
            preset_map: req.preset,
            adaptive_streaming: streaming_params
                .as_ref()
                .is_some_and(|params| !params.protocol.is_empty()),
            streaming_params,
            ..Job::default()
        };

        job.provider_job_id = provider.transcode(&job, &preset_map).await?;
        state.repository.create_job(&mut job).await?;

        info!(job_id = %job.id, provider = %job.provider_name, "job created");
        Ok(job)
    }

    pub async fn get(state: AppState, id: &str) -> Result<JobResponse, ApiError> {
        let job = state.repository.get_job(id).await?;
        let provider = Self::provider(&state, &job.provider_name)?;
        let status = provider.job_status(&job).await?;

        Ok(JobResponse { job, status })
    }

    pub async fn list(state: AppState, query: ListJobsQuery) -> Result<Vec<Job>, ApiError> {
        Ok(state.repository.list_jobs(query.into()).await?)
    }

    pub async fn cancel(state: AppState, id: &str) -> Result<JobResponse, ApiError> {
        let job = state.repository.get_job(id).await?;
        let provider = Self::provider(&state, &job.provider_name)?;
        provider.cancel_job(&job).await?;
        let status = provider.job_status(&job).await?;

        info!(job_id = %job.id, "job canceled");
        Ok(JobResponse { job, status })
    }

    pub async fn delete(state: AppState, id: &str) -> Result<(), ApiError> {
        let job = state.repository.get_job(id).await?;
        state.repository.delete_job(&job).await?;
        Ok(())
    }

    fn provider(
        state: &AppState,
        name: &str,
    ) -> Result<Box<dyn TranscodingProvider>, ProviderError> {
        let factory = state.providers.get_provider_factory(name)?;
        factory(&state.config)
    }
}
