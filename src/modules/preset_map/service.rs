use super::dto::{CreatePresetMapRequest, UpdatePresetMapRequest};
use super::model::PresetMap;
use crate::common::response::ApiError;
use crate::state::AppState;
use tracing::info;
use validator::Validate;

pub struct PresetMapService;

impl PresetMapService {
    pub async fn create(
        state: AppState,
        req: CreatePresetMapRequest,
    ) -> Result<PresetMap, ApiError> {
        req.validate()?;
        let preset_map = PresetMap::from(req);
        state.repository.create_preset_map(&preset_map).await?;

        info!(name = %preset_map.name, "preset map created");
        Ok(preset_map)
    }

    pub async fn find_all(state: AppState) -> Result<Vec<PresetMap>, ApiError> {
        let mut preset_maps = state.repository.list_preset_maps().await?;
        preset_maps.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(preset_maps)
    }

    pub async fn find_by_name(state: AppState, name: &str) -> Result<PresetMap, ApiError> {
        Ok(state.repository.get_preset_map(name).await?)
    }

    pub async fn update(
        state: AppState,
        name: String,
        req: UpdatePresetMapRequest,
    ) -> Result<PresetMap, ApiError> {
        req.validate()?;
        let preset_map = req.into_preset_map(name);
        state.repository.update_preset_map(&preset_map).await?;
        Ok(preset_map)
    }

    pub async fn delete(state: AppState, name: &str) -> Result<(), ApiError> {
        let preset_map = PresetMap {
            name: name.to_string(),
            ..PresetMap::default()
        };
        state.repository.delete_preset_map(&preset_map).await?;
        Ok(())
    }
}
