use super::dto::{CreatePresetMapRequest, UpdatePresetMapRequest};
use super::model::PresetMap;
use super::service::PresetMapService;
use crate::common::response::{ApiResponse, ApiSuccess};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

/// List all preset maps
#[utoipa::path(
    get,
    path = "/api/v1/presetmaps",
    responses(
        (status = 200, description = "List of preset maps", body = ApiResponse<Vec<PresetMap>>)
    ),
    tag = "Presets"
)]
pub async fn list_preset_maps(State(state): State<AppState>) -> impl IntoResponse {
    match PresetMapService::find_all(state).await {
        Ok(preset_maps) => ApiSuccess(
            ApiResponse::success(preset_maps, "Preset maps retrieved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a new preset map
#[utoipa::path(
    post,
    path = "/api/v1/presetmaps",
    request_body = CreatePresetMapRequest,
    responses(
        (status = 201, description = "Preset map created", body = ApiResponse<PresetMap>),
        (status = 400, description = "Bad Request"),
        (status = 409, description = "Preset map already exists")
    ),
    tag = "Presets"
)]
pub async fn create_preset_map(
    State(state): State<AppState>,
    Json(payload): Json<CreatePresetMapRequest>,
) -> impl IntoResponse {
    match PresetMapService::create(state, payload).await {
        Ok(preset_map) => ApiSuccess(
            ApiResponse::success(preset_map, "Preset map created successfully"),
            StatusCode::CREATED,
        )
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get preset map by name
#[utoipa::path(
    get,
    path = "/api/v1/presetmaps/{name}",
    params(
        ("name" = String, Path, description = "Preset map name")
    ),
    responses(
        (status = 200, description = "Preset map details", body = ApiResponse<PresetMap>),
        (status = 404, description = "Preset map not found")
    ),
    tag = "Presets"
)]
pub async fn get_preset_map(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match PresetMapService::find_by_name(state, &name).await {
        Ok(preset_map) => ApiSuccess(
            ApiResponse::success(preset_map, "Preset map retrieved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Replace a preset map
#[utoipa::path(
    put,
    path = "/api/v1/presetmaps/{name}",
    params(
        ("name" = String, Path, description = "Preset map name")
    ),
    request_body = UpdatePresetMapRequest,
    responses(
        (status = 200, description = "Preset map updated", body = ApiResponse<PresetMap>),
        (status = 400, description = "Bad Request"),
        (status = 404, description = "Preset map not found"),
        (status = 409, description = "Concurrent modification")
    ),
    tag = "Presets"
)]
pub async fn update_preset_map(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(payload): Json<UpdatePresetMapRequest>,
) -> impl IntoResponse {
    match PresetMapService::update(state, name, payload).await {
        Ok(preset_map) => ApiSuccess(
            ApiResponse::success(preset_map, "Preset map updated successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete preset map
#[utoipa::path(
    delete,
    path = "/api/v1/presetmaps/{name}",
    params(
        ("name" = String, Path, description = "Preset map name")
    ),
    responses(
        (status = 200, description = "Preset map deleted", body = ApiResponse<String>),
        (status = 404, description = "Preset map not found")
    ),
    tag = "Presets"
)]
pub async fn delete_preset_map(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match PresetMapService::delete(state, &name).await {
        Ok(()) => ApiSuccess(
            ApiResponse::success((), "Preset map deleted successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => e.into_response(),
    }
}
