use serde::Deserialize;
use crate::config::env::{self, EnvKey};

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub redis_url: String,
    /// Segment length, in seconds, for streaming jobs that do not set one.
    pub default_segment_duration: u32,
    pub swagger_enabled: bool,
}

impl AppConfig {
    pub fn new() -> Result<Self, std::env::VarError> {
        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3000),
            redis_url: env::get(EnvKey::RedisUrl)?,
            default_segment_duration: env::get_parsed(EnvKey::DefaultSegmentDuration, 5),
            swagger_enabled: env::get_or(EnvKey::SwaggerEnabled, "true") != "false",
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 3000,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            default_segment_duration: 5,
            swagger_enabled: true,
        }
    }
}
