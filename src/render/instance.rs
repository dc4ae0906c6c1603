//! Sprite instance data handed to the rendering backend

use bytemuck::{Pod, Zeroable};

/// What a sprite instance draws; the backend maps these to textures
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    /// Variant: index into the map's scenery list
    Scenery = 0,
    ObstaclePole = 1,
    /// Variant: skin index
    Character = 2,
    /// Full-screen black overlay
    Backdrop = 3,
    LoaderSpinner = 4,
    /// Variant: skin index
    MenuSkin = 5,
    /// Variant: countdown step 0..4
    CountdownLabel = 6,
    /// Variant: current score
    ScoreLabel = 7,
    /// Variant: final score
    EndPanel = 8,
    /// Variant: highscore
    BestLabel = 9,
}

pub mod flags {
    /// Draw the texture upside down (top poles)
    pub const FLIP_Y: u32 = 1;
    /// `pos` is the sprite center rather than its top-left corner
    pub const CENTERED: u32 = 1 << 1;
    /// `size` is a scale for content sized by the backend (text)
    pub const SCALE_ONLY: u32 = 1 << 2;
    /// The end panel is showing a new highscore
    pub const NEW_BEST: u32 = 1 << 3;
}

/// One textured quad
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Top-left corner in screen pixels, or the center with `CENTERED`
    pub pos: [f32; 2],
    pub size: [f32; 2],
    /// Radians clockwise around the sprite center
    pub rotation: f32,
    pub alpha: f32,
    pub kind: u32,
    pub variant: u32,
    pub flags: u32,
}

impl SpriteInstance {
    pub fn new(kind: SpriteKind, pos: [f32; 2], size: [f32; 2]) -> Self {
        Self {
            pos,
            size,
            rotation: 0.0,
            alpha: 1.0,
            kind: kind as u32,
            variant: 0,
            flags: 0,
        }
    }

    pub fn with_variant(mut self, variant: u32) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags |= flags;
        self
    }

    pub fn is(&self, kind: SpriteKind) -> bool {
        self.kind == kind as u32
    }

    /// Instances as raw bytes for a vertex buffer upload
    pub fn as_bytes(instances: &[SpriteInstance]) -> &[u8] {
        bytemuck::cast_slice(instances)
    }
}
