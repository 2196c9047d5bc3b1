//! Renderer configuration
//!
//! All tunable parameters of the pipeline live here: window dimensions,
//! shadow-map resolution, the directional light's orthographic frustum, the
//! point light's shadow far plane and the camera's projection parameters.
//! Configurations are serde-derived and can be loaded from a TOML file;
//! `Default` matches the values the demo scene was authored against.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML or does not match the schema
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is outside its valid range
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Window / default framebuffer parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Framebuffer width in pixels
    pub width: u32,
    /// Framebuffer height in pixels
    pub height: u32,
    /// Window title
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "lantern".to_string(),
        }
    }
}

/// Shadow-map parameters shared by both depth passes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShadowConfig {
    /// Whether shadow mapping runs at all; when false the depth passes are
    /// skipped and lighting is plain Phong
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Shadow-map width in texels (both the 2D map and each cubemap face)
    pub map_width: u32,
    /// Shadow-map height in texels
    pub map_height: u32,
    /// Half-extent of the directional light's orthographic frustum
    pub ortho_extent: f32,
    /// Near plane of the directional light's frustum
    pub ortho_near: f32,
    /// Far plane of the directional light's frustum
    pub ortho_far: f32,
    /// Near plane of the point light's 90-degree cube-face frustum
    pub cube_near: f32,
    /// Far plane shared by all six cube faces; also uploaded as `farPlane`
    /// so fragment depth can be linearized for comparison
    pub far_plane: f32,
}

fn default_true() -> bool {
    true
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            map_width: 1024,
            map_height: 1024,
            ortho_extent: 10.0,
            ortho_near: 1.0,
            ortho_far: 7.5,
            cube_near: 1.0,
            far_plane: 25.0,
        }
    }
}

/// Camera projection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_deg: f32,
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Top-level renderer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Window / framebuffer settings
    pub window: WindowConfig,
    /// Shadow-map settings
    pub shadow: ShadowConfig,
    /// Camera projection settings
    pub camera: CameraConfig,
}

impl RendererConfig {
    /// Load a configuration from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that would break pass setup
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid("window dimensions must be non-zero".into()));
        }
        if self.shadow.map_width == 0 || self.shadow.map_height == 0 {
            return Err(ConfigError::Invalid("shadow map dimensions must be non-zero".into()));
        }
        if self.shadow.far_plane <= self.shadow.cube_near {
            return Err(ConfigError::Invalid(
                "shadow far plane must exceed the cube near plane".into(),
            ));
        }
        if self.camera.far <= self.camera.near {
            return Err(ConfigError::Invalid("camera far plane must exceed near plane".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(RendererConfig::default().validate().is_ok());
    }

    #[test]
    fn parses_partial_overrides_from_toml() {
        let text = r#"
            [window]
            width = 800
            height = 600
            title = "test"

            [shadow]
            map_width = 512
            map_height = 512
            ortho_extent = 10.0
            ortho_near = 1.0
            ortho_far = 7.5
            cube_near = 1.0
            far_plane = 25.0

            [camera]
            fov_deg = 60.0
            near = 0.1
            far = 100.0
        "#;
        let config: RendererConfig = toml::from_str(text).expect("valid toml");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.shadow.map_width, 512);
        assert!((config.camera.fov_deg - 60.0).abs() < f32::EPSILON);
    }

    #[test]
    fn rejects_inverted_shadow_planes() {
        let mut config = RendererConfig::default();
        config.shadow.far_plane = 0.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
