pub mod job;
pub mod local_preset;
pub mod preset_map;
pub mod provider;
