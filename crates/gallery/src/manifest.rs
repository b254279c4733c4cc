use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use transitions::Transition;

use crate::GalleryError;

/// TOML description of a gallery: which transition to run, how to open the
/// window, and the ordered list of hoverable items.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GalleryManifest {
    #[serde(default = "default_transition")]
    pub transition: Transition,
    #[serde(default)]
    pub window: WindowSettings,
    #[serde(default)]
    pub items: Vec<ItemEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WindowSettings {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_title")]
    pub title: String,
    /// Displayed plane height in logical pixels; width follows the image
    /// aspect ratio.
    #[serde(default = "default_plane_height")]
    pub plane_height: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItemEntry {
    pub label: String,
    pub image: PathBuf,
}

impl GalleryManifest {
    pub fn from_toml(text: &str) -> Result<Self, GalleryError> {
        let manifest: GalleryManifest = toml::from_str(text)?;
        if manifest.items.is_empty() {
            return Err(GalleryError::Empty);
        }
        Ok(manifest)
    }

    pub fn load(path: &Path) -> Result<Self, GalleryError> {
        let text = std::fs::read_to_string(path).map_err(|source| GalleryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }
}

impl ItemEntry {
    /// Image path resolved against the manifest's directory when relative.
    pub fn resolved_image(&self, base: &Path) -> PathBuf {
        if self.image.is_absolute() {
            self.image.clone()
        } else {
            base.join(&self.image)
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            title: default_title(),
            plane_height: default_plane_height(),
        }
    }
}

fn default_transition() -> Transition {
    Transition::Perlin
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    800
}

fn default_title() -> String {
    "hoverdrift".to_string()
}

fn default_plane_height() -> f32 {
    320.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_manifest() {
        let manifest = GalleryManifest::from_toml(
            r#"
            transition = "glitch-displace"

            [window]
            width = 1600
            height = 900
            title = "demo"
            plane_height = 300.0

            [[items]]
            label = "Lake"
            image = "assets/lake.jpg"

            [[items]]
            label = "Forest"
            image = "/opt/images/forest.png"
            "#,
        )
        .expect("manifest parses");

        assert_eq!(manifest.transition, Transition::GlitchDisplace);
        assert_eq!(manifest.window.width, 1600);
        assert_eq!(manifest.items.len(), 2);
        assert_eq!(manifest.items[0].label, "Lake");
    }

    // Mirrors the manifest shown in the README; keep the two in sync.
    #[test]
    fn parses_the_readme_example() {
        let manifest = GalleryManifest::from_toml(
            r#"
            transition = "perlin"

            [window]
            width = 1280
            height = 800
            plane_height = 320.0

            [[items]]
            label = "forest"
            image = "images/forest.png"

            [[items]]
            label = "coast"
            image = "images/coast.png"
            "#,
        )
        .expect("manifest parses");

        assert_eq!(manifest.transition, Transition::Perlin);
        assert_eq!(manifest.items.len(), 2);
        assert_eq!(manifest.items[1].image, PathBuf::from("images/coast.png"));
    }

    #[test]
    fn applies_defaults_for_missing_sections() {
        let manifest = GalleryManifest::from_toml(
            r#"
            [[items]]
            label = "only"
            image = "only.png"
            "#,
        )
        .expect("manifest parses");

        assert_eq!(manifest.transition, Transition::Perlin);
        assert_eq!(manifest.window.width, 1280);
        assert_eq!(manifest.window.height, 800);
        assert_eq!(manifest.window.title, "hoverdrift");
        assert!((manifest.window.plane_height - 320.0).abs() < f32::EPSILON);
    }

    #[test]
    fn rejects_unknown_transition_names() {
        let err = GalleryManifest::from_toml(
            r#"
            transition = "ripple"

            [[items]]
            label = "x"
            image = "x.png"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, GalleryError::Parse(_)));
    }

    #[test]
    fn rejects_empty_item_lists() {
        let err = GalleryManifest::from_toml("transition = \"perlin\"").unwrap_err();
        assert!(matches!(err, GalleryError::Empty));
    }

    #[test]
    fn resolves_relative_image_paths_against_base() {
        let entry = ItemEntry {
            label: "x".into(),
            image: PathBuf::from("a/b.png"),
        };
        assert_eq!(
            entry.resolved_image(Path::new("/gallery")),
            PathBuf::from("/gallery/a/b.png")
        );

        let absolute = ItemEntry {
            label: "y".into(),
            image: PathBuf::from("/abs/c.png"),
        };
        assert_eq!(
            absolute.resolved_image(Path::new("/gallery")),
            PathBuf::from("/abs/c.png")
        );
    }
}
