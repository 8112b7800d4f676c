use std::collections::HashMap;

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::model::{OutputOptions, PresetMap};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePresetMapRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "At least one provider mapping is required"))]
    pub provider_mapping: HashMap<String, String>,
    pub output: OutputOptions,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePresetMapRequest {
    #[validate(length(min = 1, message = "At least one provider mapping is required"))]
    pub provider_mapping: HashMap<String, String>,
    pub output: OutputOptions,
}

impl From<CreatePresetMapRequest> for PresetMap {
    fn from(req: CreatePresetMapRequest) -> Self {
        Self {
            name: req.name,
            provider_mapping: req.provider_mapping,
            output: req.output,
        }
    }
}

impl UpdatePresetMapRequest {
    pub fn into_preset_map(self, name: String) -> PresetMap {
        PresetMap {
            name,
            provider_mapping: self.provider_mapping,
            output: self.output,
        }
    }
}
