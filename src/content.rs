//! Map and skin configuration
//!
//! Loaded once at startup and passed down immutably. `GameContent::validate`
//! is the only gate: anything that gets past it is safe to simulate.

use serde::{Deserialize, Serialize};

use crate::consts::{ASPECT_RATIO, REFERENCE_WIDTH};
use crate::error::ConfigError;

/// Content shipped with the game
const BUILTIN_CONTENT: &str = include_str!("../content/game_content.json");

/// Root of the content file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameContent {
    pub skins: Vec<SkinContent>,
    pub maps: Vec<MapConfig>,
}

/// A selectable character skin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinContent {
    pub skin: String,
    /// Animation atlas consumed by the asset loader
    pub texture: String,
}

/// One scrolling map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapConfig {
    pub map: String,
    /// Base side-scrolling speed shared by obstacles and scenery
    pub scroll_velocity: f32,
    /// Horizontal spacing between obstacle pairs (unscaled)
    pub distance: f32,
    /// Obstacles before a map change; only one map ships, so unused by the sim
    #[serde(default)]
    pub pass_amount: u32,
    /// Scenery atlas
    pub source: String,
    pub scenery: Vec<SceneryConfig>,
    pub obstacle: ObstacleConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneryLayer {
    Background,
    Foreground,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneryKind {
    /// One repeating strip
    Tile,
    /// Pool of discrete decorations
    Spawn,
}

/// Vertical reference point for a scenery element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Top,
    Bottom,
    /// Stretched to the screen height
    Fill,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneryConfig {
    pub layer: SceneryLayer,
    pub texture: String,
    #[serde(rename = "type")]
    pub kind: SceneryKind,
    pub position: Anchor,
    /// Pixel offset from the anchor (unscaled)
    #[serde(default)]
    pub offset: f32,
    /// Parallax distance; larger scrolls slower
    pub distance: f32,
    /// Spacing between pooled decorations (spawn layers only)
    #[serde(default)]
    pub spawn_gap: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObstacleConfig {
    /// Vertical space between the two poles (unscaled)
    pub gap: f32,
    /// Minimum distance from the bottom edge of the screen to the gap
    pub min_gap_height: f32,
    /// Minimum distance from the top edge of the screen to the gap
    pub max_gap_height: f32,
    pub texture: String,
    pub behaviours: Vec<BehaviourRule>,
}

impl ObstacleConfig {
    /// Vertical room left for randomising the gap at the reference size
    pub fn reference_room(&self) -> f32 {
        REFERENCE_WIDTH * ASPECT_RATIO - self.min_gap_height - self.max_gap_height - self.gap
    }
}

/// A behaviour change threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BehaviourRule {
    /// Obstacle counter from which this rule applies
    pub start: u32,
    #[serde(flatten)]
    pub action: BehaviourAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum BehaviourAction {
    /// Stationary poles
    Static,
    /// Up-down poles
    Bob { speed: f32 },
}

/// Behaviour thresholds checked to be ascending and anchored at 0
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviourTable {
    rules: Vec<BehaviourRule>,
}

impl BehaviourTable {
    pub fn new(map: &str, rules: &[BehaviourRule]) -> Result<Self, ConfigError> {
        match rules.first() {
            Some(first) if first.start == 0 => {}
            _ => return Err(ConfigError::MissingBaseBehaviour(map.to_string())),
        }
        for pair in rules.windows(2) {
            if pair[1].start <= pair[0].start {
                return Err(ConfigError::UnsortedBehaviours {
                    map: map.to_string(),
                    start: pair[1].start,
                });
            }
        }
        for rule in rules {
            if let BehaviourAction::Bob { speed } = rule.action {
                positive(map, "bob speed", speed)?;
            }
        }
        Ok(Self {
            rules: rules.to_vec(),
        })
    }

    /// Last rule whose start is at or below `counter`
    pub fn resolve(&self, counter: u32) -> BehaviourAction {
        let idx = self.rules.partition_point(|r| r.start <= counter);
        // rules[0].start == 0, so idx >= 1
        self.rules[idx - 1].action
    }

}

fn positive(map: &str, field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive {
            map: map.to_string(),
            field,
            value,
        })
    }
}

impl MapConfig {
    pub fn validate(&self) -> Result<BehaviourTable, ConfigError> {
        let name = self.map.as_str();
        positive(name, "scrollVelocity", self.scroll_velocity)?;
        positive(name, "distance", self.distance)?;
        positive(name, "obstacle gap", self.obstacle.gap)?;
        if self.obstacle.min_gap_height < 0.0 || self.obstacle.max_gap_height < 0.0 {
            return Err(ConfigError::NonPositive {
                map: name.to_string(),
                field: "gap height bound",
                value: self.obstacle.min_gap_height.min(self.obstacle.max_gap_height),
            });
        }
        if self.obstacle.reference_room() < 0.0 {
            return Err(ConfigError::NoVerticalRoom(name.to_string()));
        }

        for element in &self.scenery {
            positive(name, "scenery distance", element.distance)?;
            if element.kind == SceneryKind::Spawn {
                match element.spawn_gap {
                    Some(gap) => positive(name, "spawnGap", gap)?,
                    None => {
                        return Err(ConfigError::MissingSpawnGap {
                            map: name.to_string(),
                            texture: element.texture.clone(),
                        });
                    }
                }
            }
        }

        BehaviourTable::new(name, &self.obstacle.behaviours)
    }
}

impl GameContent {
    /// Parse and validate content JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let content: GameContent =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        content.validate()?;
        log::info!(
            "Loaded content: {} map(s), {} skin(s)",
            content.maps.len(),
            content.skins.len()
        );
        Ok(content)
    }

    /// The content bundled with the game
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json(BUILTIN_CONTENT)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.maps.is_empty() {
            return Err(ConfigError::NoMaps);
        }
        if self.skins.is_empty() {
            return Err(ConfigError::NoSkins);
        }
        for map in &self.maps {
            map.validate()?;
        }
        Ok(())
    }

    /// Position of the map called `name`
    pub fn map_index(&self, name: &str) -> Result<usize, ConfigError> {
        self.maps
            .iter()
            .position(|m| m.map == name)
            .ok_or_else(|| ConfigError::UnknownMap(name.to_string()))
    }

    /// Map played when nothing else is selected
    pub fn default_map(&self) -> Result<&MapConfig, ConfigError> {
        self.maps.first().ok_or(ConfigError::NoMaps)
    }

    pub fn skin_names(&self) -> Vec<String> {
        self.skins.iter().map(|s| s.skin.clone()).collect()
    }
}
