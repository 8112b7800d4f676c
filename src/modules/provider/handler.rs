use super::dto::ProviderResponse;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

/// List registered providers
#[utoipa::path(
    get,
    path = "/api/v1/providers",
    responses(
        (status = 200, description = "Registered provider names", body = ApiResponse<Vec<String>>)
    ),
    tag = "Providers"
)]
pub async fn list_providers(State(state): State<AppState>) -> impl IntoResponse {
    ApiSuccess(
        ApiResponse::success(state.providers.names(), "Providers retrieved successfully"),
        StatusCode::OK,
    )
}

/// Get provider health
#[utoipa::path(
    get,
    path = "/api/v1/providers/{name}",
    params(
        ("name" = String, Path, description = "Provider name")
    ),
    responses(
        (status = 200, description = "Provider details", body = ApiResponse<ProviderResponse>),
        (status = 404, description = "Provider not found")
    ),
    tag = "Providers"
)]
pub async fn get_provider(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    let factory = match state.providers.get_provider_factory(&name) {
        Ok(factory) => factory,
        Err(e) => return ApiError::from(e).into_response(),
    };

    let health = match factory(&state.config) {
        Ok(provider) => provider.healthcheck().await,
        Err(e) => Err(e),
    };

    let response = ProviderResponse {
        name,
        healthy: health.is_ok(),
        message: health.err().map(|e| e.to_string()),
    };

    ApiSuccess(
        ApiResponse::success(response, "Provider retrieved successfully"),
        StatusCode::OK,
    )
    .into_response()
}
