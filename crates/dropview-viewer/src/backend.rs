//! Bevy implementation of the scene's asset backend
//!
//! A model becomes one mesh entity per imported mesh, all sharing a single
//! unlit white material whose base color texture is the diffuse map.

use bevy::asset::RenderAssetUsages;
use bevy::ecs::system::SystemParam;
use bevy::mesh::Indices;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, PrimitiveTopology, TextureDimension, TextureFormat};
use dropview_core::{AssetBackend, MeshData, ModelData, TextureData};
use tracing::debug;

/// Marker for entities that draw part of the active model
#[derive(Component)]
pub struct ModelMesh;

/// Handles owned by one uploaded model
#[derive(Debug)]
pub struct ModelHandles {
    pub entities: Vec<Entity>,
    pub meshes: Vec<Handle<Mesh>>,
    pub material: Handle<StandardMaterial>,
}

/// Grouped system parameters for uploading and releasing scene assets
#[derive(SystemParam)]
pub struct SceneAssets<'w, 's> {
    pub commands: Commands<'w, 's>,
    pub meshes: ResMut<'w, Assets<Mesh>>,
    pub images: ResMut<'w, Assets<Image>>,
    pub materials: ResMut<'w, Assets<StandardMaterial>>,
}

/// Convert imported mesh data into a Bevy triangle list mesh
pub fn to_bevy_mesh(data: &MeshData) -> Mesh {
    let count = data.vertex_count();

    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, data.positions.clone())
        .with_inserted_attribute(
            Mesh::ATTRIBUTE_UV_0,
            data.uvs.clone().unwrap_or_else(|| vec![[0.0, 0.0]; count]),
        );

    if let Some(colors) = &data.colors {
        mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors.clone());
    }
    if let Some(indices) = &data.indices {
        mesh.insert_indices(Indices::U32(indices.clone()));
    }
    match &data.normals {
        Some(normals) => mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals.clone()),
        None => mesh.compute_normals(),
    }

    mesh
}

/// Convert decoded RGBA8 pixels into an sRGB texture
pub fn to_bevy_image(texture: &TextureData) -> Image {
    Image::new(
        Extent3d {
            width: texture.width(),
            height: texture.height(),
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        texture.pixels().to_vec(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}

/// White, unlit material; fully transparent texels are cut out
pub fn model_material() -> StandardMaterial {
    StandardMaterial {
        base_color: Color::WHITE,
        unlit: true,
        alpha_mode: AlphaMode::Mask(0.5),
        ..default()
    }
}

impl AssetBackend for SceneAssets<'_, '_> {
    type Model = ModelHandles;
    type Texture = Handle<Image>;

    fn upload_model(&mut self, model: &ModelData) -> ModelHandles {
        let material = self.materials.add(model_material());

        let mut entities = Vec::with_capacity(model.meshes().len());
        let mut meshes = Vec::with_capacity(model.meshes().len());
        for data in model.meshes() {
            let mesh = self.meshes.add(to_bevy_mesh(data));
            let entity = self
                .commands
                .spawn((
                    Mesh3d(mesh.clone()),
                    MeshMaterial3d(material.clone()),
                    Transform::IDENTITY,
                    ModelMesh,
                ))
                .id();
            entities.push(entity);
            meshes.push(mesh);
        }

        debug!(meshes = meshes.len(), "Uploaded model");
        ModelHandles {
            entities,
            meshes,
            material,
        }
    }

    fn upload_texture(&mut self, texture: &TextureData) -> Handle<Image> {
        debug!(
            width = texture.width(),
            height = texture.height(),
            "Uploaded texture"
        );
        self.images.add(to_bevy_image(texture))
    }

    fn bind_diffuse(&mut self, model: &mut ModelHandles, texture: &Handle<Image>) {
        if let Some(material) = self.materials.get_mut(&model.material) {
            material.base_color_texture = Some(texture.clone());
        }
    }

    fn release_model(&mut self, model: ModelHandles) {
        for entity in model.entities {
            self.commands.entity(entity).despawn();
        }
        for mesh in &model.meshes {
            self.meshes.remove(mesh);
        }
        self.materials.remove(&model.material);
    }

    fn release_texture(&mut self, texture: Handle<Image>) {
        self.images.remove(&texture);
    }
}
