//! Typed asset handles
//!
//! The external loader owns textures. The simulation only needs sprite sizes,
//! so every key is resolved once, after loading completes, into a catalog
//! indexed the same way as the content it came from.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::content::{GameContent, MapConfig};
use crate::error::AssetError;

/// Everything the simulation asks the loader for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetKey {
    /// First animation frame of a character skin
    Skin { skin: String, texture: String },
    /// One obstacle pole (top and bottom share the texture)
    ObstaclePole { map: String, texture: String },
    /// A scenery element from the map atlas
    Scenery { map: String, texture: String },
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKey::Skin { skin, texture } => write!(f, "skin '{skin}' ('{texture}')"),
            AssetKey::ObstaclePole { map, texture } => {
                write!(f, "obstacle '{texture}' of map '{map}'")
            }
            AssetKey::Scenery { map, texture } => write!(f, "scenery '{texture}' of map '{map}'"),
        }
    }
}

impl AssetKey {
    /// Texture file named in the content, the key the loader files it under
    pub fn texture(&self) -> &str {
        match self {
            AssetKey::Skin { texture, .. }
            | AssetKey::ObstaclePole { texture, .. }
            | AssetKey::Scenery { texture, .. } => texture,
        }
    }
}

/// Unscaled texture size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteSize {
    pub width: f32,
    pub height: f32,
}

impl SpriteSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

/// Index of a skin in `GameContent::skins`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SkinHandle(pub usize);

/// Sprite sizes for one map, resolved from loader output
#[derive(Debug, Clone, PartialEq)]
pub struct AssetCatalog {
    skins: Vec<SpriteSize>,
    obstacle_pole: SpriteSize,
    /// Parallel to `MapConfig::scenery`
    scenery: Vec<SpriteSize>,
}

fn fetch<F>(lookup: &mut F, key: AssetKey) -> Result<SpriteSize, AssetError>
where
    F: FnMut(&AssetKey) -> Option<SpriteSize>,
{
    match lookup(&key) {
        Some(size) if size.width > 0.0 && size.height > 0.0 => Ok(size),
        Some(_) => Err(AssetError::ZeroSized(key.to_string())),
        None => Err(AssetError::Missing(key.to_string())),
    }
}

impl AssetCatalog {
    /// Resolve every key the map needs through the loader's lookup
    pub fn resolve<F>(content: &GameContent, map: &MapConfig, mut lookup: F) -> Result<Self, AssetError>
    where
        F: FnMut(&AssetKey) -> Option<SpriteSize>,
    {
        let skins = content
            .skins
            .iter()
            .map(|s| {
                fetch(
                    &mut lookup,
                    AssetKey::Skin {
                        skin: s.skin.clone(),
                        texture: s.texture.clone(),
                    },
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let obstacle_pole = fetch(
            &mut lookup,
            AssetKey::ObstaclePole {
                map: map.map.clone(),
                texture: map.obstacle.texture.clone(),
            },
        )?;

        let scenery = map
            .scenery
            .iter()
            .map(|e| {
                fetch(
                    &mut lookup,
                    AssetKey::Scenery {
                        map: map.map.clone(),
                        texture: e.texture.clone(),
                    },
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::info!(
            "Resolved {} skin(s), {} scenery sprite(s) for map '{}'",
            skins.len(),
            scenery.len(),
            map.map
        );

        Ok(Self {
            skins,
            obstacle_pole,
            scenery,
        })
    }

    /// Frame size of a skin; handles come from the same content so are in range
    pub fn skin(&self, handle: SkinHandle) -> SpriteSize {
        self.skins
            .get(handle.0)
            .or_else(|| self.skins.first())
            .copied()
            .unwrap_or(SpriteSize::new(1.0, 1.0))
    }

    pub fn obstacle_pole(&self) -> SpriteSize {
        self.obstacle_pole
    }

    pub fn scenery(&self, index: usize) -> Option<SpriteSize> {
        self.scenery.get(index).copied()
    }
}
