//! Data-driven game balance
//!
//! Velocities are in pixels per frame unit at the reference width, durations
//! in frame units. All of it is scaled by the surface scale factor at use.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Shrinks the character sprite rectangle into its hitbox (unscaled pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitboxInsets {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Default for HitboxInsets {
    fn default() -> Self {
        // Tighter on top/right: the sprite has transparent padding there
        Self {
            left: 0.0,
            top: 25.0,
            right: 45.0,
            bottom: 20.0,
        }
    }
}

/// Physics and animation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Character ===
    /// Downward acceleration per frame
    pub gravity: f32,
    /// Upward velocity set by a jump
    pub jump_impulse: f32,
    /// Gravity stops applying at this velocity
    pub terminal_velocity: f32,
    /// Velocity forced on death so the fall is always visible
    pub death_velocity: f32,
    /// Rotation gained per frame is velocity / this
    pub rotation_divisor: f32,
    /// Maximum nose-down tilt (radians)
    pub max_tilt: f32,
    /// Character sprite scale relative to its texture
    pub character_scale: f32,
    /// Character x as a fraction of screen width
    pub character_x_fraction: f32,
    pub hitbox: HitboxInsets,

    // === Transitions ===
    /// Backdrop fade and end panel cross-fade (frames)
    pub transition_frames: f32,
    /// One countdown label fade-in (frames)
    pub countdown_frames: f32,
    /// Previous countdown label fades out at this fraction of the fade-in rate
    pub countdown_fade_out_factor: f32,
    /// In-game "GO!" fade-out and score fade-in (frames)
    pub hud_fade_frames: f32,

    // === Clock ===
    /// Largest frame delta the clock will hand out
    pub max_frame_delta: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            jump_impulse: 10.0,
            terminal_velocity: 50.0,
            death_velocity: 10.0,
            rotation_divisor: 300.0,
            max_tilt: std::f32::consts::PI / 20.0,
            character_scale: 0.6,
            character_x_fraction: 0.30,
            hitbox: HitboxInsets::default(),

            transition_frames: 30.0,
            countdown_frames: 25.0,
            countdown_fade_out_factor: 5.0 / 6.0,
            hud_fade_frames: 40.0,

            max_frame_delta: 6.0,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reject values later used as divisors or clamps
    pub fn validate(&self) -> Result<(), ConfigError> {
        let divisors = [
            ("rotation_divisor", self.rotation_divisor),
            ("character_scale", self.character_scale),
            ("transition_frames", self.transition_frames),
            ("countdown_frames", self.countdown_frames),
            ("hud_fade_frames", self.hud_fade_frames),
            ("max_frame_delta", self.max_frame_delta),
        ];
        match divisors
            .into_iter()
            .find(|(_, value)| !(value.is_finite() && *value > 0.0))
        {
            Some((field, value)) => Err(ConfigError::InvalidTuning { field, value }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{"gravity": 0.8, "hitbox": {"top": 10}}"#).unwrap();
        assert_eq!(tuning.gravity, 0.8);
        assert_eq!(tuning.jump_impulse, 10.0);
        assert_eq!(tuning.hitbox.top, 10.0);
        assert_eq!(tuning.hitbox.right, 45.0);
    }

    #[test]
    fn test_validate_rejects_zero_duration() {
        assert!(Tuning::default().validate().is_ok());
        let tuning = Tuning {
            transition_frames: 0.0,
            ..Default::default()
        };
        assert_eq!(
            tuning.validate(),
            Err(ConfigError::InvalidTuning {
                field: "transition_frames",
                value: 0.0
            })
        );
    }
}
