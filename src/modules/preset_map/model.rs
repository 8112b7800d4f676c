use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::hash_record;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OutputOptions {
    pub extension: String,
}

/// Maps one preset name onto each provider's own preset identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresetMap {
    pub name: String,
    pub provider_mapping: HashMap<String, String>,
    pub output: OutputOptions,
}

hash_record!(OutputOptions {
    extension: "extension",
});

hash_record!(PresetMap {
    name: "-",
    provider_mapping: "pmapping,expand",
    output: "output,expand",
});
