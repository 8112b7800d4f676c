//! Transcoding backends. Concrete adapters register a factory under their
//! name; the job endpoints resolve it per request.

use async_trait::async_trait;
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use utoipa::ToSchema;

use crate::modules::job::model::Job;
use crate::modules::preset_map::model::PresetMap;
use crate::state::AppState;

pub mod dto;
pub mod handler;
pub mod registry;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider not found: {0}")]
    NotFound(String),

    #[error("provider already registered: {0}")]
    AlreadyRegistered(String),

    #[error("preset map {preset_map:?} has no preset for provider {provider:?}")]
    PresetNotMapped { provider: String, preset_map: String },

    #[error("provider request failed: {0}")]
    Request(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    pub provider_job_id: String,
    /// One of `queued`, `started`, `finished`, `failed`, `canceled`.
    pub status: String,
    pub progress: f64,
    pub message: String,
}

#[async_trait]
pub trait TranscodingProvider: Send + Sync {
    /// Submits the job and returns the provider's own job id.
    async fn transcode(&self, job: &Job, preset_map: &PresetMap) -> Result<String, ProviderError>;

    async fn job_status(&self, job: &Job) -> Result<JobStatus, ProviderError>;

    async fn cancel_job(&self, job: &Job) -> Result<(), ProviderError>;

    async fn healthcheck(&self) -> Result<(), ProviderError>;
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_providers))
        .route("/{name}", get(handler::get_provider))
}
