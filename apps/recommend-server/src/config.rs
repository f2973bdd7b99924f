//! Server configuration: the engine's own `EngineConfig` plus the HTTP
//! surface's own knobs, loaded together from the environment.

use std::env;

use resonance_recommend_engine::{ConfigError, ConfigResult, EngineConfig};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub engine: EngineConfig,
    pub port: u16,
    pub cors_allowed_origins: Option<Vec<String>>,
}

const DEFAULT_PORT: u16 = 8085;

impl ServerConfig {
    pub fn from_env() -> ConfigResult<Self> {
        let engine = EngineConfig::from_env()?;

        let port = match env::var("PORT") {
            Ok(v) => v.parse().map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{e}")))?,
            Err(_) => DEFAULT_PORT,
        };

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS").ok().map(|raw| {
            raw.split(',').map(|origin| origin.trim().to_string()).filter(|origin| !origin.is_empty()).collect()
        });

        Ok(Self { engine, port, cors_allowed_origins })
    }
}
