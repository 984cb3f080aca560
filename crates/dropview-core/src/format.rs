//! File extension classification for dropped and startup assets

use std::fmt;
use std::path::Path;

/// Model file formats accepted on drop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFormat {
    Obj,
    Gltf,
    Glb,
    Vox,
    Iqm,
    M3d,
}

impl ModelFormat {
    pub const ALL: [ModelFormat; 6] = [
        ModelFormat::Obj,
        ModelFormat::Gltf,
        ModelFormat::Glb,
        ModelFormat::Vox,
        ModelFormat::Iqm,
        ModelFormat::M3d,
    ];

    /// Lowercase extension without the leading dot
    pub fn extension(self) -> &'static str {
        match self {
            ModelFormat::Obj => "obj",
            ModelFormat::Gltf => "gltf",
            ModelFormat::Glb => "glb",
            ModelFormat::Vox => "vox",
            ModelFormat::Iqm => "iqm",
            ModelFormat::M3d => "m3d",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(ext))
    }
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.extension())
    }
}

/// Texture file formats accepted on drop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    Png,
}

impl TextureFormat {
    pub fn extension(self) -> &'static str {
        match self {
            TextureFormat::Png => "png",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("png") {
            Some(TextureFormat::Png)
        } else {
            None
        }
    }
}

/// What a file path refers to, judged by its extension alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Model(ModelFormat),
    Texture(TextureFormat),
}

impl AssetKind {
    /// Classify a path by extension (case-insensitive)
    ///
    /// Returns `None` for paths without an extension or with one that is
    /// neither a supported model nor a supported texture format.
    pub fn classify(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        ModelFormat::from_extension(ext)
            .map(AssetKind::Model)
            .or_else(|| TextureFormat::from_extension(ext).map(AssetKind::Texture))
    }
}
