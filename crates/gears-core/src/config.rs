//! Scene configuration files (RON)

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_TEETH, colors};
use crate::gear::GearParams;
use crate::golden::GoldenConfig;
use crate::scene::{AnimationConfig, ViewParams, ViewportConfig};

/// One gear of the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearSpec {
    pub name: String,
    pub params: GearParams,
    /// Material color (RGBA)
    pub color: [f32; 4],
    /// Translation of the gear center
    pub position: [f32; 3],
    #[serde(default = "default_rotation_scale")]
    pub rotation_scale: f32,
    #[serde(default)]
    pub rotation_offset: f32,
}

fn default_rotation_scale() -> f32 {
    1.0
}

/// Complete scene configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "classic_gears")]
    pub gears: Vec<GearSpec>,
    #[serde(default)]
    pub view: ViewParams,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub golden: GoldenConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            gears: classic_gears(),
            view: ViewParams::default(),
            animation: AnimationConfig::default(),
            viewport: ViewportConfig::default(),
            golden: GoldenConfig::default(),
        }
    }
}

/// The red, green and blue meshing gears
fn classic_gears() -> Vec<GearSpec> {
    vec![
        GearSpec {
            name: "red".into(),
            params: GearParams::new(1.0, 4.0, 1.0, 20, 0.7),
            color: colors::RED,
            position: [-3.0, -2.0, 0.0],
            rotation_scale: 1.0,
            rotation_offset: 0.0,
        },
        GearSpec {
            name: "green".into(),
            params: GearParams::new(0.5, 2.0, 2.0, 10, 0.7),
            color: colors::GREEN,
            position: [3.1, -2.0, 0.0],
            rotation_scale: -2.0,
            rotation_offset: -9.0,
        },
        GearSpec {
            name: "blue".into(),
            params: GearParams::new(1.3, 2.0, 0.5, 10, 0.7),
            color: colors::BLUE,
            position: [-3.1, 4.2, 0.0],
            rotation_scale: -2.0,
            rotation_offset: -25.0,
        },
    ]
}

impl SceneConfig {
    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = self.to_ron_string()?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Load configuration from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config = Self::from_ron_str(&content)?;
        tracing::debug!("Loaded scene config from {}", path.display());
        Ok(config)
    }

    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            ron::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the generator or the harness cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(spec) = self.gears.iter().find(|g| g.params.teeth > MAX_TEETH) {
            return Err(ConfigError::Invalid(format!(
                "gear '{}' has {} teeth (max {MAX_TEETH})",
                spec.name, spec.params.teeth
            )));
        }
        if self.golden.interval == 0 {
            return Err(ConfigError::Invalid("golden interval must be positive".into()));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
