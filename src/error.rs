//! Error types
//!
//! Everything here is a setup-time failure. Per-tick simulation code is total
//! and never returns these.

use crate::sim::Scene;

/// Invalid map or skin configuration
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    /// Content JSON could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Map '{0}' has no behaviour starting at 0")]
    MissingBaseBehaviour(String),

    #[error("Map '{map}' behaviours are not strictly ascending at start {start}")]
    UnsortedBehaviours { map: String, start: u32 },

    #[error("Map '{map}': {field} must be positive, got {value}")]
    NonPositive {
        map: String,
        field: &'static str,
        value: f32,
    },

    #[error("Map '{0}': gap bounds leave no vertical room for the obstacle gap")]
    NoVerticalRoom(String),

    #[error("Map '{map}': spawn scenery '{texture}' needs a spawnGap")]
    MissingSpawnGap { map: String, texture: String },

    #[error("Unknown map '{0}'")]
    UnknownMap(String),

    #[error("Content defines no maps")]
    NoMaps,

    #[error("Content defines no skins")]
    NoSkins,

    #[error("Tuning: {field} must be positive and finite, got {value}")]
    InvalidTuning { field: &'static str, value: f32 },
}

/// Rejected screen dimensions
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SurfaceError {
    #[error("Screen size must be positive and finite, got {width}x{height}")]
    InvalidSize { width: f32, height: f32 },
}

/// A sprite the simulation depends on was not provided by the loader
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AssetError {
    #[error("Missing sprite for {0}")]
    Missing(String),

    #[error("Sprite for {0} has zero size")]
    ZeroSized(String),
}

/// Failure building the simulation once assets are ready
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SetupError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Fewer pooled items than one screen width needs
    #[error("Pool of {len} cannot cover a {width}px wide screen at spacing {spacing}")]
    RingUnderflow { len: usize, width: f32, spacing: f32 },
}

/// A scene change request that cannot be honoured
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TransitionError {
    #[error("No transition from {from:?} to {to:?}")]
    NotAllowed { from: Scene, to: Scene },

    #[error("A transition is already playing")]
    Busy,

    #[error("Assets are still loading")]
    NotLoaded,
}
