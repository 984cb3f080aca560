//! Model and texture import into CPU-side data
//!
//! Everything here runs before a GPU handle exists. The scene controller
//! imports a dropped file first and only releases the previous handle once
//! the import has succeeded.

mod gltf_read;
mod obj_read;
mod texture;
mod vox_read;

use bevy_math::bounding::{Aabb3d, RayCast3d};
use bevy_math::{Ray3d, Vec3, Vec3A};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::format::{AssetKind, ModelFormat};

pub use texture::TextureData;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to import glTF {}: {source}", .path.display())]
    Gltf {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },
    #[error("Failed to decode image {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Malformed {format} file {}: {reason}", .path.display())]
    Malformed {
        format: &'static str,
        path: PathBuf,
        reason: String,
    },
    #[error("No meshes found in {}", .path.display())]
    NoMeshes { path: PathBuf },
    #[error("No importer available for {format} files ({})", .path.display())]
    NoImporter { format: ModelFormat, path: PathBuf },
    #[error("Not a supported asset type: {}", .path.display())]
    Unsupported { path: PathBuf },
}

/// Axis-aligned bounding box in model space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box enclosing all points, or `None` for an empty slice
    pub fn from_points(points: &[[f32; 3]]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let start = Vec3::from_array(*first);
        let (min, max) = rest.iter().fold((start, start), |(min, max), p| {
            let p = Vec3::from_array(*p);
            (min.min(p), max.max(p))
        });
        Some(Self { min, max })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Distance along the ray to the first intersection, if any
    pub fn ray_intersection(&self, ray: Ray3d) -> Option<f32> {
        let aabb = Aabb3d {
            min: Vec3A::from(self.min),
            max: Vec3A::from(self.max),
        };
        RayCast3d::from_ray(ray, f32::MAX).aabb_intersection_at(&aabb)
    }
}

/// One drawable triangle list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    /// UV0 with a top-left origin
    pub uvs: Option<Vec<[f32; 2]>>,
    /// Linear RGBA vertex colors
    pub colors: Option<Vec<[f32; 4]>>,
    /// Triangle list indices; `None` means every three positions form a triangle
    pub indices: Option<Vec<u32>>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.positions.len() / 3,
        }
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.positions)
    }

    /// Check that every attribute matches the position count and every index is in range
    fn validate(&self) -> Result<(), String> {
        let count = self.positions.len();
        if let Some(normals) = &self.normals {
            if normals.len() != count {
                return Err(format!("{} normals for {} positions", normals.len(), count));
            }
        }
        if let Some(uvs) = &self.uvs {
            if uvs.len() != count {
                return Err(format!("{} UVs for {} positions", uvs.len(), count));
            }
        }
        if let Some(colors) = &self.colors {
            if colors.len() != count {
                return Err(format!("{} colors for {} positions", colors.len(), count));
            }
        }
        if let Some(indices) = &self.indices {
            if indices.len() % 3 != 0 {
                return Err(format!("index count {} is not a multiple of 3", indices.len()));
            }
            if let Some(bad) = indices.iter().find(|&&i| i as usize >= count) {
                return Err(format!("index {} out of range for {} positions", bad, count));
            }
        } else if count % 3 != 0 {
            return Err(format!("{} positions do not form whole triangles", count));
        }
        Ok(())
    }
}

/// A loaded model: at least one non-empty mesh, all sharing material slot 0
#[derive(Debug, Clone)]
pub struct ModelData {
    meshes: Vec<MeshData>,
    source: PathBuf,
}

impl ModelData {
    /// Import a model file, dispatching on its extension
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let format = match AssetKind::classify(path) {
            Some(AssetKind::Model(format)) => format,
            _ => {
                return Err(LoadError::Unsupported {
                    path: path.to_path_buf(),
                })
            }
        };

        let meshes = match format {
            ModelFormat::Obj => obj_read::read_obj(path)?,
            ModelFormat::Gltf | ModelFormat::Glb => gltf_read::read_gltf(path)?,
            ModelFormat::Vox => vox_read::read_vox(path)?,
            ModelFormat::Iqm | ModelFormat::M3d => {
                return Err(LoadError::NoImporter {
                    format,
                    path: path.to_path_buf(),
                })
            }
        };

        let model = Self::from_meshes(path, meshes)?;
        debug!(
            path = %path.display(),
            meshes = model.meshes.len(),
            "Model imported"
        );
        Ok(model)
    }

    /// Build a model from already-imported meshes
    ///
    /// Meshes without positions are dropped. Fails with `NoMeshes` when
    /// nothing is left and with `Malformed` when a mesh is inconsistent.
    pub fn from_meshes(source: impl Into<PathBuf>, meshes: Vec<MeshData>) -> Result<Self, LoadError> {
        let source = source.into();
        let meshes: Vec<MeshData> = meshes
            .into_iter()
            .filter(|mesh| !mesh.positions.is_empty())
            .collect();

        if meshes.is_empty() {
            return Err(LoadError::NoMeshes { path: source });
        }

        for (i, mesh) in meshes.iter().enumerate() {
            if let Err(reason) = mesh.validate() {
                return Err(LoadError::Malformed {
                    format: "mesh",
                    path: source,
                    reason: format!("mesh {}: {}", i, reason),
                });
            }
        }

        Ok(Self { meshes, source })
    }

    pub fn meshes(&self) -> &[MeshData] {
        &self.meshes
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Bounds of the first mesh, used for hit-testing the whole model
    pub fn bounding_box(&self) -> BoundingBox {
        self.meshes
            .first()
            .and_then(MeshData::bounding_box)
            .unwrap_or_default()
    }
}
