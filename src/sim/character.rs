//! Player character physics
//!
//! Alive: gravity, jumps, nose-down tilt. Dead: input off, forced plunge until
//! the sprite is fully below the screen.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::surface::Surface;
use crate::tuning::Tuning;

/// The player entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    /// Sprite center
    pub pos: Vec2,
    /// Vertical velocity (positive is down)
    pub velocity: f32,
    /// Radians, clockwise
    pub rotation: f32,
    /// Scaled sprite size
    pub size: Vec2,
    /// Jump input accepted
    pub controls_enabled: bool,
    /// Passing obstacles earns points
    pub scoring_active: bool,
}

impl Character {
    pub fn new(size: Vec2, surface: &Surface, tuning: &Tuning) -> Self {
        let mut character = Self {
            pos: Vec2::ZERO,
            velocity: 0.0,
            rotation: 0.0,
            size,
            controls_enabled: true,
            scoring_active: true,
        };
        character.reset(surface, tuning);
        character
    }

    /// Back to the spawn point, ready for a new run
    pub fn reset(&mut self, surface: &Surface, tuning: &Tuning) {
        self.velocity = 0.0;
        self.rotation = 0.0;
        self.pos = Vec2::new(
            surface.width() * tuning.character_x_fraction,
            surface.height() / 2.0,
        );
        self.controls_enabled = true;
        self.scoring_active = true;
    }

    /// Upward impulse, ignored once the character is a third of a screen
    /// above the top edge
    pub fn jump(&mut self, surface: &Surface, tuning: &Tuning) -> bool {
        if self.pos.y > -(surface.height() / 3.0) {
            self.velocity = -(tuning.jump_impulse * surface.scale_factor());
            true
        } else {
            false
        }
    }

    /// Integrate one step of `dt` frames
    pub fn tick(&mut self, dt: f32, surface: &Surface, tuning: &Tuning) {
        let scale = surface.scale_factor();

        if self.velocity < tuning.terminal_velocity {
            self.velocity += tuning.gravity * dt * scale;
        }

        if !self.is_dead(surface) {
            self.pos.y += self.velocity * dt * scale;
        }

        let tilt = self.rotation.max(0.0) + (self.velocity / tuning.rotation_divisor) * dt;
        self.rotation = tilt.clamp(0.0, tuning.max_tilt);
    }

    /// Stop input and scoring, and plunge
    pub fn die(&mut self, tuning: &Tuning) {
        self.controls_enabled = false;
        self.scoring_active = false;
        self.velocity = tuning.death_velocity;
    }

    /// Fully below the visible area
    pub fn is_dead(&self, surface: &Surface) -> bool {
        self.pos.y > self.off_world_y(surface)
    }

    #[inline]
    fn off_world_y(&self, surface: &Surface) -> f32 {
        surface.height() + self.size.y
    }
}
