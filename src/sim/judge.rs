//! Collision and scoring judgment
//!
//! Rectangle tests only: a shrunk character box against the gap window of
//! the single nearest unresolved obstacle.

use glam::Vec2;

use super::character::Character;
use super::obstacles::{ObstacleField, ObstacleGeometry};
use crate::tuning::HitboxInsets;

/// Axis-aligned box, y down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Character sprite box shrunk by the (unscaled) hitbox insets
    pub fn character(character: &Character, insets: &HitboxInsets, scale: f32) -> Self {
        let half = character.size / 2.0;
        Self {
            min: Vec2::new(
                character.pos.x - half.x + insets.left * scale,
                character.pos.y - half.y + insets.top * scale,
            ),
            max: Vec2::new(
                character.pos.x + half.x - insets.right * scale,
                character.pos.y + half.y - insets.bottom * scale,
            ),
        }
    }
}

/// Result of one judge pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Judgment {
    /// Character overlaps a pole
    pub collided: bool,
    /// An obstacle's center was passed this tick
    pub scored: bool,
    /// The collision index pointed outside the ring
    pub invariant_broken: bool,
}

/// Credit the obstacle at the scoring index once its center is behind the
/// character. Returns true when a point was earned.
pub fn check_scoring(field: &mut ObstacleField, character: &Character) -> Option<bool> {
    let obstacle = field.get(field.scoring_index())?;
    let width = field.geometry().width;
    if (obstacle.pos.x + width / 2.0) - character.pos.x <= 0.0 {
        field.advance_scoring();
        Some(true)
    } else {
        Some(false)
    }
}

/// Whether `hitbox` overlaps the poles of an obstacle at `pos`
pub fn overlaps_poles(hitbox: &Aabb, pos: Vec2, geometry: &ObstacleGeometry) -> bool {
    let min_x = pos.x;
    let max_x = pos.x + geometry.width;
    let within = |x: f32| x > min_x && x < max_x;

    if !(within(hitbox.max.x) || within(hitbox.min.x)) {
        return false;
    }

    let (gap_top, gap_bottom) = geometry.gap_window(pos.y);
    let inside_gap = |y: f32| y > gap_top && y < gap_bottom;
    // Safe only with the whole vertical extent inside the gap
    !(inside_gap(hitbox.min.y) && inside_gap(hitbox.max.y))
}

/// Test the character against the obstacle at the collision index, moving the
/// index on once that obstacle is fully behind the character
pub fn check_collision(
    field: &mut ObstacleField,
    character: &Character,
    insets: &HitboxInsets,
    scale: f32,
) -> Option<bool> {
    let obstacle = *field.get(field.collision_index())?;
    let geometry = *field.geometry();
    let hitbox = Aabb::character(character, insets, scale);
    let collided = overlaps_poles(&hitbox, obstacle.pos, &geometry);

    if character.pos.x > obstacle.pos.x + geometry.width {
        field.advance_collision();
    }
    Some(collided)
}

/// One full judge pass: collision, then scoring while clear and still active
pub fn judge(
    field: &mut ObstacleField,
    character: &Character,
    insets: &HitboxInsets,
    scale: f32,
) -> Judgment {
    let Some(collided) = check_collision(field, character, insets, scale) else {
        return Judgment {
            invariant_broken: true,
            ..Default::default()
        };
    };

    if collided || !character.scoring_active {
        return Judgment {
            collided,
            ..Default::default()
        };
    }

    match check_scoring(field, character) {
        Some(scored) => Judgment {
            collided: false,
            scored,
            invariant_broken: false,
        },
        None => Judgment {
            invariant_broken: true,
            ..Default::default()
        },
    }
}
