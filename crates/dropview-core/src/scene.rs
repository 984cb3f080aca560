//! The active model, its diffuse texture and the selection state
//!
//! `SceneAsset` is generic over the renderer through [`AssetBackend`], which
//! hands out opaque handles for uploaded models and textures. Every handle
//! the scene acquires is released exactly once: either when it is replaced
//! or when the scene itself is released.

use bevy_math::Ray3d;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::format::AssetKind;
use crate::import::{BoundingBox, LoadError, ModelData, TextureData};
use crate::selection::Selection;

/// GPU side of the scene: turns CPU data into renderer handles and back
pub trait AssetBackend {
    type Model;
    type Texture;

    fn upload_model(&mut self, model: &ModelData) -> Self::Model;
    fn upload_texture(&mut self, texture: &TextureData) -> Self::Texture;
    /// Bind `texture` to the diffuse slot of the model's first material
    fn bind_diffuse(&mut self, model: &mut Self::Model, texture: &Self::Texture);
    fn release_model(&mut self, model: Self::Model);
    fn release_texture(&mut self, texture: Self::Texture);
}

/// Why a drop did not change the scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropIgnored {
    Empty,
    MultipleFiles(usize),
    UnsupportedType(PathBuf),
}

/// Result of handling one file drop event
#[derive(Debug)]
pub enum DropOutcome {
    ModelReplaced { path: PathBuf },
    TextureReplaced { path: PathBuf },
    Ignored(DropIgnored),
    /// The file had a supported extension but could not be imported; the
    /// previous assets are untouched
    Failed(LoadError),
}

pub struct SceneAsset<M, T> {
    // Only `None` between taking a handle for release and storing its replacement
    model: Option<M>,
    texture: Option<T>,
    bounds: BoundingBox,
    selection: Selection,
    model_source: PathBuf,
    texture_source: PathBuf,
}

impl<M, T> SceneAsset<M, T> {
    /// Upload the startup model and texture and bind the texture as diffuse map
    pub fn new<B>(backend: &mut B, model: &ModelData, texture: &TextureData) -> Self
    where
        B: AssetBackend<Model = M, Texture = T>,
    {
        let mut model_handle = backend.upload_model(model);
        let texture_handle = backend.upload_texture(texture);
        backend.bind_diffuse(&mut model_handle, &texture_handle);

        let bounds = model.bounding_box();
        info!(
            model = %model.source().display(),
            texture = %texture.source().display(),
            meshes = model.meshes().len(),
            "Scene ready"
        );

        Self {
            model: Some(model_handle),
            texture: Some(texture_handle),
            bounds,
            selection: Selection::default(),
            model_source: model.source().to_path_buf(),
            texture_source: texture.source().to_path_buf(),
        }
    }

    /// Handle one drop event carrying `paths`
    ///
    /// Only a single file is acted on. A model file replaces the model and
    /// rebinds the current texture; a PNG replaces the texture and rebinds it
    /// on the current model. The new file is imported before the old handle
    /// is released, so a failed import leaves the scene as it was.
    pub fn handle_drop<B>(&mut self, backend: &mut B, paths: &[PathBuf]) -> DropOutcome
    where
        B: AssetBackend<Model = M, Texture = T>,
    {
        let path = match paths {
            [] => return DropOutcome::Ignored(DropIgnored::Empty),
            [path] => path,
            _ => {
                debug!(count = paths.len(), "Ignoring multi-file drop");
                return DropOutcome::Ignored(DropIgnored::MultipleFiles(paths.len()));
            }
        };

        match AssetKind::classify(path) {
            Some(AssetKind::Model(_)) => match ModelData::load(path) {
                Ok(model) => {
                    self.replace_model(backend, &model);
                    DropOutcome::ModelReplaced { path: path.clone() }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Dropped model could not be loaded");
                    DropOutcome::Failed(e)
                }
            },
            Some(AssetKind::Texture(_)) => match TextureData::load(path) {
                Ok(texture) => {
                    self.replace_texture(backend, &texture);
                    DropOutcome::TextureReplaced { path: path.clone() }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Dropped texture could not be loaded");
                    DropOutcome::Failed(e)
                }
            },
            None => {
                debug!(path = %path.display(), "Ignoring drop of unsupported file type");
                DropOutcome::Ignored(DropIgnored::UnsupportedType(path.clone()))
            }
        }
    }

    /// Swap in an already imported model, keeping the current texture
    pub fn replace_model<B>(&mut self, backend: &mut B, model: &ModelData)
    where
        B: AssetBackend<Model = M, Texture = T>,
    {
        if let Some(old) = self.model.take() {
            backend.release_model(old);
        }

        let mut handle = backend.upload_model(model);
        if let Some(texture) = &self.texture {
            backend.bind_diffuse(&mut handle, texture);
        }
        self.model = Some(handle);
        self.bounds = model.bounding_box();
        self.model_source = model.source().to_path_buf();

        info!(
            path = %model.source().display(),
            meshes = model.meshes().len(),
            "Model replaced"
        );
    }

    /// Swap in an already decoded texture and bind it to the current model
    pub fn replace_texture<B>(&mut self, backend: &mut B, texture: &TextureData)
    where
        B: AssetBackend<Model = M, Texture = T>,
    {
        if let Some(old) = self.texture.take() {
            backend.release_texture(old);
        }

        let handle = backend.upload_texture(texture);
        if let Some(model) = self.model.as_mut() {
            backend.bind_diffuse(model, &handle);
        }
        self.texture = Some(handle);
        self.texture_source = texture.source().to_path_buf();

        info!(
            path = %texture.source().display(),
            width = texture.width(),
            height = texture.height(),
            "Texture replaced"
        );
    }

    /// Apply a left click given the picking ray under the cursor
    ///
    /// No ray (cursor outside the viewport) counts as a miss. Returns whether
    /// the model is selected afterwards.
    pub fn handle_click(&mut self, ray: Option<Ray3d>) -> bool {
        let hit = ray.is_some_and(|ray| self.bounds.ray_intersection(ray).is_some());
        let selected = self.selection.register_click(hit);
        debug!(hit, selected, "Model click");
        selected
    }

    /// Release every handle the scene holds
    pub fn release<B>(mut self, backend: &mut B)
    where
        B: AssetBackend<Model = M, Texture = T>,
    {
        if let Some(model) = self.model.take() {
            backend.release_model(model);
        }
        if let Some(texture) = self.texture.take() {
            backend.release_texture(texture);
        }
        debug!("Scene assets released");
    }

    pub fn is_selected(&self) -> bool {
        self.selection.is_selected()
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn model(&self) -> Option<&M> {
        self.model.as_ref()
    }

    pub fn texture(&self) -> Option<&T> {
        self.texture.as_ref()
    }

    pub fn model_source(&self) -> &Path {
        &self.model_source
    }

    pub fn texture_source(&self) -> &Path {
        &self.texture_source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::MeshData;
    use crate::testdata;
    use bevy_math::{Dir3, Vec3};
    use std::collections::HashSet;

    #[derive(Debug, Clone, PartialEq)]
    struct FakeModel {
        id: u32,
        diffuse: Option<u32>,
    }

    #[derive(Default)]
    struct FakeBackend {
        next_id: u32,
        live_models: HashSet<u32>,
        live_textures: HashSet<u32>,
        events: Vec<String>,
    }

    impl FakeBackend {
        fn next(&mut self) -> u32 {
            self.next_id += 1;
            self.next_id
        }
    }

    impl AssetBackend for FakeBackend {
        type Model = FakeModel;
        type Texture = u32;

        fn upload_model(&mut self, _model: &ModelData) -> FakeModel {
            let id = self.next();
            self.live_models.insert(id);
            self.events.push(format!("upload model {}", id));
            FakeModel { id, diffuse: None }
        }

        fn upload_texture(&mut self, _texture: &TextureData) -> u32 {
            let id = self.next();
            self.live_textures.insert(id);
            self.events.push(format!("upload texture {}", id));
            id
        }

        fn bind_diffuse(&mut self, model: &mut FakeModel, texture: &u32) {
            model.diffuse = Some(*texture);
            self.events.push(format!("bind {} to {}", texture, model.id));
        }

        fn release_model(&mut self, model: FakeModel) {
            assert!(self.live_models.remove(&model.id), "model {} released twice", model.id);
            self.events.push(format!("release model {}", model.id));
        }

        fn release_texture(&mut self, texture: u32) {
            assert!(self.live_textures.remove(&texture), "texture {} released twice", texture);
            self.events.push(format!("release texture {}", texture));
        }
    }

    /// Unit cube corners centred on the origin, as a bare point cloud mesh
    fn cube_model() -> ModelData {
        let positions = vec![
            [-1.0, -1.0, -1.0],
            [1.0, -1.0, -1.0],
            [1.0, 1.0, 1.0],
            [-1.0, 1.0, 1.0],
            [-1.0, -1.0, 1.0],
            [1.0, 1.0, -1.0],
        ];
        ModelData::from_meshes(
            "cube.obj",
            vec![MeshData {
                positions,
                ..Default::default()
            }],
        )
        .unwrap()
    }

    fn white_texture() -> TextureData {
        TextureData::from_rgba8("white.png", 1, 1, vec![255; 4]).unwrap()
    }

    fn new_scene(backend: &mut FakeBackend) -> SceneAsset<FakeModel, u32> {
        SceneAsset::new(backend, &cube_model(), &white_texture())
    }

    fn ray_from(origin: Vec3, toward: Vec3) -> Option<Ray3d> {
        Some(Ray3d::new(origin, Dir3::new(toward - origin).unwrap()))
    }

    #[test]
    fn test_new_binds_texture_to_model() {
        let mut backend = FakeBackend::default();
        let scene = new_scene(&mut backend);

        assert_eq!(scene.model().unwrap().diffuse, scene.texture().copied());
        assert!(!scene.is_selected());
        assert_eq!(scene.bounds().min, Vec3::splat(-1.0));
        assert_eq!(scene.model_source(), Path::new("cube.obj"));
    }

    #[test]
    fn test_click_toggles_and_miss_clears() {
        let mut backend = FakeBackend::default();
        let mut scene = new_scene(&mut backend);
        let eye = Vec3::new(50.0, 50.0, 50.0);

        assert!(scene.handle_click(ray_from(eye, Vec3::ZERO)));
        assert!(!scene.handle_click(ray_from(eye, Vec3::ZERO)));
        assert!(scene.handle_click(ray_from(eye, Vec3::ZERO)));

        // Aim well above the model
        assert!(!scene.handle_click(ray_from(eye, Vec3::new(0.0, 40.0, 0.0))));
        assert!(!scene.is_selected());

        scene.handle_click(ray_from(eye, Vec3::ZERO));
        assert!(!scene.handle_click(None));
    }

    #[test]
    fn test_drop_model_replaces_and_keeps_texture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("castle.glb");
        std::fs::write(&path, testdata::triangle_glb()).unwrap();

        let mut backend = FakeBackend::default();
        let mut scene = new_scene(&mut backend);
        let texture = *scene.texture().unwrap();

        let outcome = scene.handle_drop(&mut backend, &[path.clone()]);
        assert!(matches!(outcome, DropOutcome::ModelReplaced { .. }));

        let model = scene.model().unwrap();
        assert_eq!(model.id, 3);
        assert_eq!(model.diffuse, Some(texture));
        assert_eq!(backend.live_models, HashSet::from([3]));
        assert_eq!(scene.model_source(), path.as_path());
        assert_eq!(scene.bounds().max, Vec3::new(1.0, 1.0, 0.0));

        let release = backend.events.iter().position(|e| e == "release model 1").unwrap();
        let upload = backend.events.iter().position(|e| e == "upload model 3").unwrap();
        assert!(release < upload);
    }

    #[test]
    fn test_drop_texture_rebinds_current_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = testdata::write_png(dir.path(), "skin.png", 2, 2);

        let mut backend = FakeBackend::default();
        let mut scene = new_scene(&mut backend);

        let outcome = scene.handle_drop(&mut backend, &[path.clone()]);
        assert!(matches!(outcome, DropOutcome::TextureReplaced { .. }));

        assert_eq!(scene.texture(), Some(&3));
        assert_eq!(scene.model().unwrap().diffuse, Some(3));
        assert_eq!(backend.live_textures, HashSet::from([3]));
        assert_eq!(scene.texture_source(), path.as_path());
        assert_eq!(backend.events.last().map(String::as_str), Some("bind 3 to 1"));
    }

    #[test]
    fn test_ignored_drops_change_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let a = testdata::write_png(dir.path(), "a.png", 1, 1);
        let b = testdata::write_png(dir.path(), "b.png", 1, 1);
        let bmp = testdata::write_bmp(dir.path(), "picture.bmp");

        let mut backend = FakeBackend::default();
        let mut scene = new_scene(&mut backend);
        let events = backend.events.len();

        assert!(matches!(
            scene.handle_drop(&mut backend, &[]),
            DropOutcome::Ignored(DropIgnored::Empty)
        ));
        assert!(matches!(
            scene.handle_drop(&mut backend, &[a, b]),
            DropOutcome::Ignored(DropIgnored::MultipleFiles(2))
        ));
        match scene.handle_drop(&mut backend, &[bmp.clone()]) {
            DropOutcome::Ignored(DropIgnored::UnsupportedType(path)) => assert_eq!(path, bmp),
            other => panic!("unexpected outcome {:?}", other),
        }

        assert_eq!(backend.events.len(), events);
        assert_eq!(scene.model().unwrap().id, 1);
    }

    #[test]
    fn test_failed_import_keeps_previous_assets() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.glb");
        std::fs::write(&broken, b"not a model").unwrap();
        let missing = dir.path().join("missing.png");

        let mut backend = FakeBackend::default();
        let mut scene = new_scene(&mut backend);
        let events = backend.events.len();

        assert!(matches!(
            scene.handle_drop(&mut backend, &[broken]),
            DropOutcome::Failed(LoadError::Gltf { .. })
        ));
        assert!(matches!(
            scene.handle_drop(&mut backend, &[missing]),
            DropOutcome::Failed(LoadError::Io { .. })
        ));

        assert_eq!(backend.events.len(), events);
        assert_eq!(scene.model().unwrap().id, 1);
        assert_eq!(scene.texture(), Some(&2));
    }

    #[test]
    fn test_selection_survives_model_swap() {
        let mut backend = FakeBackend::default();
        let mut scene = new_scene(&mut backend);
        scene.handle_click(ray_from(Vec3::splat(50.0), Vec3::ZERO));

        scene.replace_model(&mut backend, &cube_model());
        assert!(scene.is_selected());
    }

    #[test]
    fn test_release_frees_everything_once() {
        let dir = tempfile::tempdir().unwrap();
        let png = testdata::write_png(dir.path(), "skin.png", 1, 1);

        let mut backend = FakeBackend::default();
        let mut scene = new_scene(&mut backend);
        scene.handle_drop(&mut backend, &[png]);
        scene.replace_model(&mut backend, &cube_model());
        scene.release(&mut backend);

        assert!(backend.live_models.is_empty());
        assert!(backend.live_textures.is_empty());
        let releases = backend.events.iter().filter(|e| e.starts_with("release")).count();
        let uploads = backend.events.iter().filter(|e| e.starts_with("upload")).count();
        assert_eq!(releases, uploads);
    }
}
