use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::model::{Job, JobFilter, StreamingParams};
use crate::modules::provider::JobStatus;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    #[validate(length(min = 1, message = "Source media is required"))]
    pub source: String,
    #[validate(length(min = 1, message = "Provider is required"))]
    pub provider: String,
    #[validate(length(min = 1, message = "Preset is required"))]
    pub preset: String,
    pub streaming_params: Option<StreamingParams>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListJobsQuery {
    /// RFC 3339 timestamp; older jobs are left out.
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[param(value_type = Option<String>, format = DateTime)]
    pub since: Option<OffsetDateTime>,
    /// Zero or absent means no limit.
    pub limit: Option<usize>,
}

impl From<ListJobsQuery> for JobFilter {
    fn from(q: ListJobsQuery) -> Self {
        Self {
            since: q.since,
            limit: q.limit.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JobResponse {
    pub job: Job,
    pub status: JobStatus,
}
