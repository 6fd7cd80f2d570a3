//! Texture assets: the named sprite images the particle field draws with.
//!
//! Textures are looked up by name under an asset directory and decoded to
//! tightly packed RGBA8. The renderer consumes [`TextureImage`]s, never paths.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Sprite for suspended motes.
pub const PARTICLES_TEXTURE: &str = "particles.png";
/// Sprite for rising bubbles.
pub const BUBBLES_TEXTURE: &str = "bubbles.png";

/// Textures the scene cannot start without.
pub const REQUIRED_TEXTURES: [&str; 2] = [PARTICLES_TEXTURE, BUBBLES_TEXTURE];

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("texture `{name}` not found at {path}")]
    NotFound { name: String, path: PathBuf },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode `{name}`: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("texture `{0}` was not loaded")]
    Missing(String),
}

/// A decoded RGBA8 image.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    /// Decode an encoded image held in memory.
    pub fn decode(name: &str, bytes: &[u8]) -> Result<Self, AssetError> {
        let img = image::load_from_memory(bytes).map_err(|source| AssetError::Decode {
            name: name.to_string(),
            source,
        })?;
        let rgba = img.to_rgba8();
        Ok(Self {
            name: name.to_string(),
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        })
    }
}

/// Textures keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct TextureStore {
    root: PathBuf,
    textures: BTreeMap<String, TextureImage>,
}

impl TextureStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            textures: BTreeMap::new(),
        }
    }

    /// Load every texture the scene requires from `root`.
    pub fn load_required(root: impl Into<PathBuf>) -> Result<Self, AssetError> {
        let mut store = Self::new(root);
        for name in REQUIRED_TEXTURES {
            store.load(name)?;
        }
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load `name` relative to the root, replacing any earlier copy.
    pub fn load(&mut self, name: &str) -> Result<&TextureImage, AssetError> {
        let path = self.root.join(name);
        if !path.is_file() {
            return Err(AssetError::NotFound {
                name: name.to_string(),
                path,
            });
        }
        let bytes = std::fs::read(&path)?;
        let texture = TextureImage::decode(name, &bytes)?;
        tracing::debug!(
            name,
            width = texture.width,
            height = texture.height,
            "loaded texture"
        );
        self.textures.insert(name.to_string(), texture);
        self.get(name)
    }

    /// Register an already decoded texture.
    pub fn insert(&mut self, texture: TextureImage) {
        self.textures.insert(texture.name.clone(), texture);
    }

    pub fn get(&self, name: &str) -> Result<&TextureImage, AssetError> {
        self.textures
            .get(name)
            .ok_or_else(|| AssetError::Missing(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
