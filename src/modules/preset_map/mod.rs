use axum::routing::get;
use axum::Router;
use crate::state::AppState;

pub mod dto;
pub mod handler;
pub mod model;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_preset_maps).post(handler::create_preset_map))
        .route(
            "/{name}",
            get(handler::get_preset_map)
                .put(handler::update_preset_map)
                .delete(handler::delete_preset_map),
        )
}
