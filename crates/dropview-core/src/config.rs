//! Viewer configuration loaded from TOML
//!
//! Every field has a default, so an absent file or a partial one is fine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub camera: CameraConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            title: default_title(),
        }
    }
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    450
}

fn default_title() -> String {
    "dropview - models loading".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Directory name searched for by `resources::resolve_resource_dir`
    #[serde(default = "default_resource_dir")]
    pub resource_dir: String,
    /// Startup model, relative to the resource directory
    #[serde(default = "default_model")]
    pub model: String,
    /// Startup diffuse texture, relative to the resource directory
    #[serde(default = "default_texture")]
    pub texture: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            resource_dir: default_resource_dir(),
            model: default_model(),
            texture: default_texture(),
        }
    }
}

fn default_resource_dir() -> String {
    "resources".to_string()
}

fn default_model() -> String {
    "wallace.glb".to_string()
}

fn default_texture() -> String {
    "wabbit_alpha.png".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Length of each gizmo axis in world units
    #[serde(default = "default_axis_scale")]
    pub axis_scale: f32,
    #[serde(default = "default_exit_on_escape")]
    pub exit_on_escape: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            axis_scale: default_axis_scale(),
            exit_on_escape: default_exit_on_escape(),
        }
    }
}

fn default_axis_scale() -> f32 {
    50.0
}

fn default_exit_on_escape() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    #[serde(default = "default_camera_target")]
    pub target: [f32; 3],
    #[serde(default = "default_camera_up")]
    pub up: [f32; 3],
    /// Vertical field of view
    #[serde(default = "default_fovy")]
    pub fovy_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            target: default_camera_target(),
            up: default_camera_up(),
            fovy_degrees: default_fovy(),
        }
    }
}

fn default_camera_position() -> [f32; 3] {
    [50.0, 50.0, 50.0]
}

fn default_camera_target() -> [f32; 3] {
    [0.0, 10.0, 0.0]
}

fn default_camera_up() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

fn default_fovy() -> f32 {
    45.0
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn model_path(&self, resource_dir: &Path) -> PathBuf {
        resource_dir.join(&self.assets.model)
    }

    pub fn texture_path(&self, resource_dir: &Path) -> PathBuf {
        resource_dir.join(&self.assets.texture)
    }
}

/// Load configuration from file, or defaults when the file does not exist
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Config::from_toml(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}
