use axum::routing::{get, post};
use axum::Router;
use crate::state::AppState;

pub mod dto;
pub mod handler;
pub mod model;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_jobs).post(handler::create_job))
        .route("/{id}", get(handler::get_job).delete(handler::delete_job))
        .route("/{id}/cancel", post(handler::cancel_job))
}
