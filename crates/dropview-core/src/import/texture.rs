use std::path::{Path, PathBuf};

use super::LoadError;

/// Decoded texture as tightly packed RGBA8 rows, top row first
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    source: PathBuf,
}

impl TextureData {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let image = image::open(path).map_err(|source| match source {
            image::ImageError::IoError(source) => LoadError::Io {
                path: path.to_path_buf(),
                source,
            },
            source => LoadError::Image {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let rgba = image.into_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
            source: path.to_path_buf(),
        })
    }

    /// Wrap raw RGBA8 pixels; fails when the buffer does not match the dimensions
    pub fn from_rgba8(
        source: impl Into<PathBuf>,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Result<Self, LoadError> {
        let source = source.into();
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected || expected == 0 {
            return Err(LoadError::Malformed {
                format: "RGBA8",
                path: source,
                reason: format!(
                    "{} bytes for a {}x{} image, expected {}",
                    pixels.len(),
                    width,
                    height,
                    expected
                ),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            source,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}
