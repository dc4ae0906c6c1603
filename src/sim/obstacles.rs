//! Obstacle pool
//!
//! A fixed ring of pole pairs. Ring order is spatial order, left to right:
//! the head is recycled onto the tail once it leaves the screen, so the ring
//! never grows and never needs sorting.

use std::collections::VecDeque;
use std::f64::consts::PI;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::assets::SpriteSize;
use crate::content::{BehaviourAction, BehaviourTable, MapConfig};
use crate::error::SetupError;
use crate::surface::Surface;

/// Vertical motion of one obstacle pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Behaviour {
    Static,
    /// Sine oscillation through the whole placement window
    Bob { speed: f32, phase: f32 },
}

/// A top and bottom pole sharing one container
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Container top-left corner
    pub pos: Vec2,
    pub behaviour: Behaviour,
}

/// Scaled obstacle dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleGeometry {
    pub width: f32,
    pub pole_height: f32,
    pub gap: f32,
    /// Minimum room between the gap and the bottom edge
    pub min_gap_height: f32,
    /// Minimum room between the gap and the top edge
    pub max_gap_height: f32,
}

impl ObstacleGeometry {
    pub fn new(map: &MapConfig, pole: SpriteSize, scale: f32) -> Self {
        Self {
            width: pole.width * scale,
            pole_height: pole.height * scale,
            gap: map.obstacle.gap * scale,
            min_gap_height: map.obstacle.min_gap_height * scale,
            max_gap_height: map.obstacle.max_gap_height * scale,
        }
    }

    /// Full container height: top pole, gap, bottom pole
    #[inline]
    pub fn height(&self) -> f32 {
        self.pole_height * 2.0 + self.gap
    }

    /// Container y with the gap as high as allowed
    #[inline]
    pub fn min_y(&self) -> f32 {
        -(self.height() / 2.0) + self.gap / 2.0 + self.max_gap_height
    }

    /// How far the container can move down from `min_y`
    #[inline]
    pub fn room(&self, screen_height: f32) -> f32 {
        screen_height - self.min_gap_height - self.max_gap_height - self.gap
    }

    /// Container y for a 0..1 position inside the placement window
    #[inline]
    pub fn y_at(&self, t: f32, screen_height: f32) -> f32 {
        self.min_y() + self.room(screen_height) * t
    }

    /// Vertical extent of the gap for an obstacle at `y`
    pub fn gap_window(&self, y: f32) -> (f32, f32) {
        let center = y + self.height() / 2.0;
        (center - self.gap / 2.0, center + self.gap / 2.0)
    }
}

/// Outcome of one recycle check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recycle {
    /// Head still on screen
    None,
    /// Head moved to the tail
    Moved,
    /// Head moved, but the collision index was already at 0
    IndexUnderflow,
}

/// The scrolling ring of obstacles plus its bookkeeping indices
#[derive(Debug, Clone)]
pub struct ObstacleField {
    ring: VecDeque<Obstacle>,
    geometry: ObstacleGeometry,
    behaviours: BehaviourTable,
    /// Scaled horizontal distance between consecutive obstacles
    spacing: f32,
    /// Unscaled scroll speed
    scroll_velocity: f32,
    screen: Surface,
    /// Obstacles assigned a behaviour so far
    counter: u32,
    /// Next obstacle pending score credit
    scoring_index: usize,
    /// Nearest obstacle not yet fully passed
    collision_index: usize,
}

impl ObstacleField {
    /// Pool sized to cover the screen width plus one
    pub fn new<R: Rng>(
        map: &MapConfig,
        behaviours: BehaviourTable,
        pole: SpriteSize,
        surface: &Surface,
        rng: &mut R,
    ) -> Result<Self, SetupError> {
        let spacing = map.distance * surface.scale_factor();
        let len = (surface.width() / spacing).ceil() as usize + 1;
        Self::with_len(map, behaviours, pole, surface, len, rng)
    }

    /// Pool with an explicit length
    pub fn with_len<R: Rng>(
        map: &MapConfig,
        behaviours: BehaviourTable,
        pole: SpriteSize,
        surface: &Surface,
        len: usize,
        rng: &mut R,
    ) -> Result<Self, SetupError> {
        let spacing = map.distance * surface.scale_factor();
        // The tail must start at or beyond the right edge after any recycle
        if len < 2 || (len - 1) as f32 * spacing < surface.width() {
            return Err(SetupError::RingUnderflow {
                len,
                width: surface.width(),
                spacing,
            });
        }

        let idle = Obstacle {
            pos: Vec2::ZERO,
            behaviour: Behaviour::Static,
        };
        let mut field = Self {
            ring: std::iter::repeat_n(idle, len).collect(),
            geometry: ObstacleGeometry::new(map, pole, surface.scale_factor()),
            behaviours,
            spacing,
            scroll_velocity: map.scroll_velocity,
            screen: *surface,
            counter: 0,
            scoring_index: 0,
            collision_index: 0,
        };
        field.reset(rng);
        Ok(field)
    }

    /// Re-place the whole ring starting at the right edge
    pub fn reset<R: Rng>(&mut self, rng: &mut R) {
        self.counter = 0;
        self.scoring_index = 0;
        self.collision_index = 0;

        let mut x = self.screen.width();
        for i in 0..self.ring.len() {
            let y = self.random_y(rng);
            let behaviour = self.behaviour_for(self.counter + 1, rng);
            self.ring[i] = Obstacle {
                pos: Vec2::new(x, y),
                behaviour,
            };
            x += self.spacing;
            self.counter += 1;
        }
    }

    /// Resolve the configured behaviour for the `counter`-th obstacle
    pub fn behaviour_for<R: Rng>(&self, counter: u32, rng: &mut R) -> Behaviour {
        match self.behaviours.resolve(counter) {
            BehaviourAction::Static => Behaviour::Static,
            BehaviourAction::Bob { speed } => Behaviour::Bob {
                speed,
                phase: rng.random::<f32>(),
            },
        }
    }

    /// Random container y keeping the gap inside the configured bounds
    fn random_y<R: Rng>(&self, rng: &mut R) -> f32 {
        self.geometry.y_at(rng.random::<f32>(), self.screen.height())
    }

    /// Move every obstacle left, then apply its vertical behaviour
    pub fn scroll(&mut self, dt: f32, accumulated: f64) {
        let dx = self.scroll_velocity * dt * self.screen.scale_factor();
        for obstacle in self.ring.iter_mut() {
            obstacle.pos.x -= dx;
        }
        for i in 0..self.ring.len() {
            self.animate(i, accumulated);
        }
    }

    fn animate(&mut self, index: usize, accumulated: f64) {
        let geometry = self.geometry;
        let height = self.screen.height();
        let obstacle = &mut self.ring[index];
        match obstacle.behaviour {
            Behaviour::Static => {}
            Behaviour::Bob { speed, phase } => {
                let angle = accumulated / 1000.0 * f64::from(speed) + PI * f64::from(phase);
                let wave = ((angle.sin() + 1.0) / 2.0) as f32;
                obstacle.pos.y = geometry.y_at(wave, height);
            }
        }
    }

    /// Move the head to the tail once it is fully off the left edge
    pub fn recycle<R: Rng>(&mut self, rng: &mut R) -> Recycle {
        let Some(head) = self.ring.front() else {
            return Recycle::None;
        };
        if head.pos.x + self.geometry.width >= 0.0 {
            return Recycle::None;
        }

        let tail_x = self.ring.back().map(|o| o.pos.x).unwrap_or(head.pos.x);
        let y = self.random_y(rng);
        let behaviour = self.behaviour_for(self.counter + 1, rng);
        self.counter += 1;

        self.ring.pop_front();
        self.ring.push_back(Obstacle {
            pos: Vec2::new(tail_x + self.spacing, y),
            behaviour,
        });

        // Scoring stalls after death, so the head can leave unscored
        self.scoring_index = self.scoring_index.saturating_sub(1);

        log::debug!("Recycled obstacle #{} to x={:.1}", self.counter, tail_x + self.spacing);

        match self.collision_index.checked_sub(1) {
            Some(index) => {
                self.collision_index = index;
                Recycle::Moved
            }
            None => Recycle::IndexUnderflow,
        }
    }

    pub fn geometry(&self) -> &ObstacleGeometry {
        &self.geometry
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Obstacle> {
        self.ring.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.ring.iter()
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    pub fn scoring_index(&self) -> usize {
        self.scoring_index
    }

    pub fn collision_index(&self) -> usize {
        self.collision_index
    }

    pub fn advance_scoring(&mut self) {
        self.scoring_index += 1;
    }

    pub fn advance_collision(&mut self) {
        self.collision_index += 1;
    }

    #[cfg(test)]
    pub(crate) fn ring_mut(&mut self) -> &mut VecDeque<Obstacle> {
        &mut self.ring
    }

    #[cfg(test)]
    pub(crate) fn set_indices(&mut self, scoring: usize, collision: usize) {
        self.scoring_index = scoring;
        self.collision_index = collision;
    }
}
