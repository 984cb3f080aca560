//! dropview Core - Engine-independent logic for the dropview model viewer
//!
//! This crate holds everything the viewer does that does not need a window:
//! - Asset classification and model/texture import into CPU-side data
//! - The scene controller that owns the active model, texture and selection
//! - Axis gizmo segment generation
//! - Overlay text, palette and FPS coloring
//! - Resource directory discovery and configuration loading

pub mod config;
pub mod format;
pub mod gizmo;
pub mod import;
pub mod overlay;
pub mod resources;
pub mod scene;
pub mod selection;

#[cfg(test)]
pub(crate) mod testdata;

pub use config::{Config, ConfigError};
pub use format::{AssetKind, ModelFormat, TextureFormat};
pub use gizmo::{axis_segments, Axis, AxisSegment};
pub use import::{BoundingBox, LoadError, MeshData, ModelData, TextureData};
pub use scene::{AssetBackend, DropIgnored, DropOutcome, SceneAsset};
pub use selection::Selection;
