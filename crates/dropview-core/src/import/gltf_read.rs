//! glTF 2.0 / GLB importer
//!
//! Walks the default scene (or the first one) and emits one `MeshData` per
//! triangle primitive per node, with the node's world transform baked into
//! positions and normals. Only the document and its buffers are loaded;
//! images are never touched since the viewer binds its own diffuse texture.

use bevy_math::{Mat3, Mat4, Vec3};
use gltf::mesh::Mode;
use std::path::Path;
use tracing::debug;

use super::{LoadError, MeshData};

pub fn read_gltf(path: &Path) -> Result<Vec<MeshData>, LoadError> {
    let gltf_err = |source: gltf::Error| match source {
        gltf::Error::Io(source) => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
        source => LoadError::Gltf {
            path: path.to_path_buf(),
            source,
        },
    };

    let gltf::Gltf { document, blob } = gltf::Gltf::open(path).map_err(gltf_err)?;
    let buffers = gltf::import_buffers(&document, path.parent(), blob).map_err(gltf_err)?;

    let mut meshes = Vec::new();
    match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => {
            for node in scene.nodes() {
                visit_node(&node, Mat4::IDENTITY, &buffers, &mut meshes);
            }
        }
        // Scene-less files still carry meshes; draw them untransformed
        None => {
            for mesh in document.meshes() {
                read_mesh(&mesh, Mat4::IDENTITY, &buffers, &mut meshes);
            }
        }
    }

    Ok(meshes)
}

fn visit_node(
    node: &gltf::Node<'_>,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<MeshData>,
) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        read_mesh(&mesh, world, buffers, out);
    }
    for child in node.children() {
        visit_node(&child, world, buffers, out);
    }
}

fn read_mesh(mesh: &gltf::Mesh<'_>, world: Mat4, buffers: &[gltf::buffer::Data], out: &mut Vec<MeshData>) {
    for primitive in mesh.primitives() {
        if primitive.mode() != Mode::Triangles {
            debug!(
                mesh = mesh.index(),
                mode = ?primitive.mode(),
                "Skipping non-triangle primitive"
            );
            continue;
        }

        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

        let Some(positions) = reader.read_positions() else {
            continue;
        };

        let mut data = MeshData {
            positions: positions.collect(),
            normals: reader.read_normals().map(|normals| normals.collect()),
            uvs: reader.read_tex_coords(0).map(|uvs| uvs.into_f32().collect()),
            colors: reader.read_colors(0).map(|colors| colors.into_rgba_f32().collect()),
            indices: reader.read_indices().map(|indices| indices.into_u32().collect()),
        };
        if world != Mat4::IDENTITY {
            apply_transform(&mut data, world);
        }
        out.push(data);
    }
}

/// Bake `world` into the mesh; a mirroring transform also flips the winding
fn apply_transform(mesh: &mut MeshData, world: Mat4) {
    for p in &mut mesh.positions {
        *p = world.transform_point3(Vec3::from_array(*p)).to_array();
    }

    if let Some(normals) = &mut mesh.normals {
        let normal_matrix = Mat3::from_mat4(world).inverse().transpose();
        for n in normals.iter_mut() {
            *n = (normal_matrix * Vec3::from_array(*n)).normalize_or_zero().to_array();
        }
    }

    if world.determinant() < 0.0 {
        let mut indices = mesh
            .indices
            .take()
            .unwrap_or_else(|| (0..mesh.positions.len() as u32).collect());
        for triangle in indices.chunks_exact_mut(3) {
            triangle.swap(1, 2);
        }
        mesh.indices = Some(indices);
    }
}
