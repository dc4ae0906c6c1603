//! Parallax scenery
//!
//! Each scenery element scrolls at `scroll_velocity * scale / distance`: the
//! further away, the slower. Tiling layers only shift a texture offset; spawn
//! layers keep their own small ring of decorations, recycled the same way as
//! the obstacle pool.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::assets::{AssetCatalog, AssetKey, SpriteSize};
use crate::content::{Anchor, MapConfig, SceneryConfig, SceneryKind, SceneryLayer};
use crate::error::{AssetError, ConfigError, SetupError};
use crate::surface::Surface;

/// One repeating strip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileLayer {
    /// Index into the map's scenery list
    pub scenery: usize,
    pub layer: SceneryLayer,
    pub distance: f32,
    /// Horizontal texture offset, wrapped into `(-size.x, 0]`
    pub tile_offset: f32,
    /// Top edge of the strip
    pub y: f32,
    /// Scaled size of one texture repetition
    pub size: Vec2,
}

/// A pool of discrete decorations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnLayer {
    pub scenery: usize,
    pub layer: SceneryLayer,
    pub distance: f32,
    /// Scaled spacing between decorations
    pub spawn_gap: f32,
    /// Top edge shared by every decoration
    pub y: f32,
    pub size: Vec2,
    /// Left edges, ascending
    pub xs: VecDeque<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ParallaxLayer {
    Tile(TileLayer),
    Spawn(SpawnLayer),
}

impl ParallaxLayer {
    pub fn layer(&self) -> SceneryLayer {
        match self {
            ParallaxLayer::Tile(t) => t.layer,
            ParallaxLayer::Spawn(s) => s.layer,
        }
    }
}

/// Top edge of a sprite of `height` placed against `anchor`
fn anchored_y(anchor: Anchor, offset: f32, height: f32, surface: &Surface) -> f32 {
    let offset = offset * surface.scale_factor();
    match anchor {
        Anchor::Top => offset,
        Anchor::Bottom => surface.height() - offset - height,
        Anchor::Fill => 0.0,
    }
}

/// All scenery layers of a map, in configuration order (back to front)
#[derive(Debug, Clone)]
pub struct ParallaxField {
    layers: Vec<ParallaxLayer>,
    scroll_velocity: f32,
    screen: Surface,
}

impl ParallaxField {
    pub fn new<R: Rng>(
        map: &MapConfig,
        catalog: &AssetCatalog,
        surface: &Surface,
        rng: &mut R,
    ) -> Result<Self, SetupError> {
        let layers = map
            .scenery
            .iter()
            .enumerate()
            .map(|(index, element)| {
                let texture = catalog.scenery(index).ok_or_else(|| {
                    AssetError::Missing(
                        AssetKey::Scenery {
                            map: map.map.clone(),
                            texture: element.texture.clone(),
                        }
                        .to_string(),
                    )
                })?;
                Self::build_layer(map, index, element, texture, surface, rng)
            })
            .collect::<Result<Vec<_>, SetupError>>()?;

        log::info!("Built {} parallax layer(s) for '{}'", layers.len(), map.map);

        Ok(Self {
            layers,
            scroll_velocity: map.scroll_velocity,
            screen: *surface,
        })
    }

    fn build_layer<R: Rng>(
        map: &MapConfig,
        index: usize,
        element: &SceneryConfig,
        texture: SpriteSize,
        surface: &Surface,
        rng: &mut R,
    ) -> Result<ParallaxLayer, SetupError> {
        let scale = match element.position {
            Anchor::Fill => surface.height() / texture.height,
            _ => surface.scale_factor(),
        };
        let size = texture.scaled(scale);
        let y = anchored_y(element.position, element.offset, size.height, surface);

        match element.kind {
            SceneryKind::Tile => Ok(ParallaxLayer::Tile(TileLayer {
                scenery: index,
                layer: element.layer,
                distance: element.distance,
                tile_offset: 0.0,
                y,
                size: Vec2::new(size.width, size.height),
            })),
            SceneryKind::Spawn => {
                let gap = element.spawn_gap.ok_or_else(|| ConfigError::MissingSpawnGap {
                    map: map.map.clone(),
                    texture: element.texture.clone(),
                })?;
                let spawn_gap = gap * surface.scale_factor();
                let count = (surface.width() / spawn_gap).ceil() as usize + 1;
                let start = (rng.random::<f32>() * surface.width()).round();
                let xs = (0..count).map(|i| start + i as f32 * spawn_gap).collect();
                Ok(ParallaxLayer::Spawn(SpawnLayer {
                    scenery: index,
                    layer: element.layer,
                    distance: element.distance,
                    spawn_gap,
                    y,
                    size: Vec2::new(size.width, size.height),
                    xs,
                }))
            }
        }
    }

    /// Scroll every layer and recycle spawn decorations that left the screen
    pub fn scroll(&mut self, dt: f32) {
        let scale = self.screen.scale_factor();
        for layer in &mut self.layers {
            match layer {
                ParallaxLayer::Tile(tile) => {
                    let dx = self.scroll_velocity * (scale / tile.distance) * dt;
                    tile.tile_offset = (tile.tile_offset - dx) % tile.size.x;
                }
                ParallaxLayer::Spawn(spawn) => {
                    let dx = self.scroll_velocity * scale * (scale / spawn.distance) * dt;
                    for x in spawn.xs.iter_mut() {
                        *x -= dx;
                    }
                    Self::recycle(spawn);
                }
            }
        }
    }

    fn recycle(spawn: &mut SpawnLayer) {
        let Some(&head) = spawn.xs.front() else {
            return;
        };
        if head + spawn.size.x >= 0.0 {
            return;
        }
        spawn.xs.pop_front();
        let tail = spawn.xs.back().copied().unwrap_or(head);
        spawn.xs.push_back(tail + spawn.spawn_gap);
    }

    pub fn layers(&self) -> &[ParallaxLayer] {
        &self.layers
    }

    /// Layers drawn behind the obstacles and character
    pub fn background(&self) -> impl Iterator<Item = &ParallaxLayer> {
        self.layers
            .iter()
            .filter(|l| l.layer() == SceneryLayer::Background)
    }

    /// Layers drawn over everything in the game scene
    pub fn foreground(&self) -> impl Iterator<Item = &ParallaxLayer> {
        self.layers
            .iter()
            .filter(|l| l.layer() == SceneryLayer::Foreground)
    }
}
