use std::time::Duration;

use foundation::math::AlbersConfig;
use layers::RefreshPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_FIRES_URL: &str = "data/fires.json";
pub const DEFAULT_TOPOLOGY_URL: &str = "https://cdn.jsdelivr.net/npm/us-atlas@3/states-10m.json";

pub const ENV_FIRES: &str = "FIREMAP_FIRES";
pub const ENV_TOPOLOGY: &str = "FIREMAP_TOPOLOGY";
pub const ENV_TICK_MS: &str = "FIREMAP_TICK_MS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Projection parameters; the translate is always the canvas center.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionSettings {
    pub rotate: [f64; 2],
    pub center: [f64; 2],
    pub parallels: [f64; 2],
    pub scale: f64,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        let ca = AlbersConfig::default();
        Self {
            rotate: ca.rotate_deg,
            center: ca.center_deg,
            parallels: ca.parallels_deg,
            scale: ca.scale,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub width: f64,
    pub height: f64,
    /// Fire dataset location (URL in the browser, path in the CLI).
    pub fires: String,
    /// TopoJSON boundary location.
    pub topology: String,
    pub boundary_object: String,
    pub boundary_id: String,
    pub tick_ms: u64,
    pub refresh_policy: RefreshPolicy,
    pub projection: ProjectionSettings,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 700.0,
            height: 900.0,
            fires: DEFAULT_FIRES_URL.to_string(),
            topology: DEFAULT_TOPOLOGY_URL.to_string(),
            boundary_object: "states".to_string(),
            boundary_id: "06".to_string(),
            tick_ms: 300,
            refresh_policy: RefreshPolicy::FrozenOnEntry,
            projection: ProjectionSettings::default(),
        }
    }
}

impl ViewerConfig {
    /// Parses a partial JSON config; missing fields keep their defaults.
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = serde_json::from_str(payload)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(ConfigError::Invalid("width must be a positive number"));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(ConfigError::Invalid("height must be a positive number"));
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::Invalid("tick_ms must be at least 1"));
        }
        if !(self.projection.scale.is_finite() && self.projection.scale > 0.0) {
            return Err(ConfigError::Invalid("projection scale must be a positive number"));
        }
        Ok(())
    }

    /// Applies `FIREMAP_*` overrides. Unparseable values are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(fires) = lookup(ENV_FIRES) {
            self.fires = fires;
        }
        if let Some(topology) = lookup(ENV_TOPOLOGY) {
            self.topology = topology;
        }
        if let Some(ms) = lookup(ENV_TICK_MS).and_then(|v| v.parse::<u64>().ok())
            && ms > 0
        {
            self.tick_ms = ms;
        }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn albers(&self) -> AlbersConfig {
        AlbersConfig {
            rotate_deg: self.projection.rotate,
            center_deg: self.projection.center,
            parallels_deg: self.projection.parallels,
            scale: self.projection.scale,
            translate: [self.width / 2.0, self.height / 2.0],
        }
    }
}
