use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::hash_record;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoPreset {
    pub profile: String,
    pub profile_level: String,
    /// Zero keeps the source dimension.
    pub width: u32,
    pub height: u32,
    pub codec: String,
    pub bitrate: u64,
    pub gop_size: u32,
    pub gop_mode: String,
    pub interlace_mode: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AudioPreset {
    pub codec: String,
    pub bitrate: u64,
}

/// A full encoding specification, for providers without remote presets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub name: String,
    pub description: String,
    pub container: String,
    pub rate_control: String,
    pub two_pass: bool,
    pub video: VideoPreset,
    pub audio: AudioPreset,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LocalPreset {
    pub name: String,
    pub preset: Preset,
}

hash_record!(VideoPreset {
    profile: "profile",
    profile_level: "profilelevel",
    width: "width,omitempty",
    height: "height,omitempty",
    codec: "codec",
    bitrate: "bitrate",
    gop_size: "gopsize",
    gop_mode: "gopmode",
    interlace_mode: "interlacemode",
});

hash_record!(AudioPreset {
    codec: "codec",
    bitrate: "bitrate",
});

hash_record!(Preset {
    name: "name",
    description: "description,omitempty",
    container: "container",
    rate_control: "ratecontrol,omitempty",
    two_pass: "twopass",
    video: "video,expand",
    audio: "audio,expand",
});

hash_record!(LocalPreset {
    name: "-",
    preset: "preset,expand",
});
