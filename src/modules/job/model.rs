use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::hash_record;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StreamingParams {
    pub segment_duration: u32,
    pub protocol: String,
    pub playlist_file_name: String,
}

/// A transcoding job handed to a provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Lives in the store key, not in the hash.
    pub id: String,
    pub provider_name: String,
    #[serde(rename = "providerJobId")]
    pub provider_job_id: String,
    pub source_media: String,
    pub preset_map: String,
    pub streaming_params: Option<StreamingParams>,
    pub adaptive_streaming: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub creation_time: Option<OffsetDateTime>,
}

hash_record!(StreamingParams {
    segment_duration: "segmentDuration",
    protocol: "protocol",
    playlist_file_name: "playlistFileName",
});

hash_record!(Job {
    id: "-",
    provider_name: "providerName",
    provider_job_id: "providerJobID",
    source_media: "source",
    preset_map: "presetmap",
    streaming_params: "streamingparams,expand,omitempty",
    adaptive_streaming: "adaptivestreaming,omitempty",
    creation_time: "creationTime",
});

/// Narrows `list_jobs`. A `limit` of zero means no cap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub since: Option<OffsetDateTime>,
    pub limit: usize,
}
