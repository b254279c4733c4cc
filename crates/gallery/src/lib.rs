//! Hoverable items and their image data.
//!
//! The registry is the shared collection the hover effect reads at retarget
//! time: an ordered list of items whose textures arrive asynchronously while
//! the rest of the program is already running. Items are created up front
//! from the gallery manifest and never removed; only their texture slot
//! changes, exactly once, when the preloader delivers the decoded image.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use image::GenericImageView;

mod loader;
mod manifest;

pub use loader::{spawn_preloader, PreloadEvent, PreloadRequest};
pub use manifest::{GalleryManifest, ItemEntry, WindowSettings};

#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    #[error("failed to read gallery manifest at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse gallery manifest: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("gallery manifest lists no items")]
    Empty,
    #[error("failed to decode image at {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Decoded RGBA8 pixels plus the image's natural dimensions. Shared by `Arc`
/// so the registry, the uniform set, and the GPU upload all refer to the
/// same allocation; texture identity is `Arc` pointer identity.
pub struct TextureData {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl TextureData {
    pub fn load(path: &Path) -> Result<Self, GalleryError> {
        let image = image::open(path).map_err(|source| GalleryError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let (width, height) = image.dimensions();
        let rgba = image.to_rgba8().into_raw();
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// A single-colour texture, mostly useful for demos and tests.
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixels = (width as usize) * (height as usize);
        let mut rgba = Vec::with_capacity(pixels * 4);
        for _ in 0..pixels {
            rgba.extend_from_slice(&color);
        }
        Self {
            width,
            height,
            rgba,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Natural width over natural height; the plane is scaled by this so the
    /// image is never stretched.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn pixels(&self) -> &[u8] {
        &self.rgba
    }
}

/// One hoverable entry. The index is its ordinal position in the gallery and
/// never changes; the texture is absent until preloading resolves it.
pub struct Item {
    pub index: usize,
    pub label: String,
    pub texture: Option<Arc<TextureData>>,
}

/// Cheap clone of one item's hover-relevant state.
#[derive(Clone)]
pub struct ItemView {
    pub index: usize,
    pub texture: Option<Arc<TextureData>>,
}

/// Shared, ordered collection of items. Clones are handles onto the same
/// collection; the shell attaches textures as the preloader delivers them
/// while the effect reads through the same handle.
#[derive(Clone)]
pub struct ItemRegistry {
    inner: Arc<RwLock<Vec<Item>>>,
}

impl ItemRegistry {
    pub fn new(labels: impl IntoIterator<Item = String>) -> Self {
        let items = labels
            .into_iter()
            .enumerate()
            .map(|(index, label)| Item {
                index,
                label,
                texture: None,
            })
            .collect();
        Self {
            inner: Arc::new(RwLock::new(items)),
        }
    }

    pub fn from_manifest(manifest: &GalleryManifest) -> Self {
        Self::new(manifest.items.iter().map(|entry| entry.label.clone()))
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Item>> {
        self.inner.read().unwrap_or_else(|err| err.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Item>> {
        self.inner.write().unwrap_or_else(|err| err.into_inner())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn attach_texture(&self, index: usize, texture: Arc<TextureData>) {
        let mut items = self.write();
        match items.get_mut(index) {
            Some(item) => item.texture = Some(texture),
            None => {
                tracing::warn!(item = index, "texture arrived for unknown item index");
            }
        }
    }

    pub fn view(&self, index: usize) -> Option<ItemView> {
        self.read().get(index).map(|item| ItemView {
            index: item.index,
            texture: item.texture.clone(),
        })
    }

    pub fn texture(&self, index: usize) -> Option<Arc<TextureData>> {
        self.read().get(index).and_then(|item| item.texture.clone())
    }

    pub fn label(&self, index: usize) -> Option<String> {
        self.read().get(index).map(|item| item.label.clone())
    }

    /// Number of items whose texture has resolved.
    pub fn loaded_count(&self) -> usize {
        self.read()
            .iter()
            .filter(|item| item.texture.is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_of(count: usize) -> ItemRegistry {
        ItemRegistry::new((0..count).map(|index| format!("item {index}")))
    }

    #[test]
    fn views_preserve_texture_identity() {
        let registry = registry_of(3);
        let texture = Arc::new(TextureData::solid(2, 2, [10, 20, 30, 255]));
        registry.attach_texture(1, texture.clone());

        let view = registry.view(1).expect("item exists");
        assert!(Arc::ptr_eq(view.texture.as_ref().expect("loaded"), &texture));
        assert!(registry.view(0).expect("item exists").texture.is_none());
        assert_eq!(registry.loaded_count(), 1);
    }

    #[test]
    fn attach_out_of_range_is_ignored() {
        let registry = registry_of(1);
        registry.attach_texture(9, Arc::new(TextureData::solid(1, 1, [0; 4])));
        assert_eq!(registry.loaded_count(), 0);
    }

    #[test]
    fn clones_share_the_same_collection() {
        let registry = registry_of(2);
        let handle = registry.clone();
        handle.attach_texture(0, Arc::new(TextureData::solid(1, 1, [255; 4])));
        assert_eq!(registry.loaded_count(), 1);
    }

    #[test]
    fn aspect_ratio_comes_from_natural_dimensions() {
        let texture = TextureData::solid(1600, 900, [0; 4]);
        assert!((texture.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
    }
}
