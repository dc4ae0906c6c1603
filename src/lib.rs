//! Canopy Flap - an endless side-scrolling forest flyer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacle pool, parallax, scenes)
//! - `content`: Map and skin configuration, validated at load time
//! - `tuning`: Data-driven physics and animation constants
//! - `render`: Sprite instance lists handed to an external renderer
//! - `persistence`: Highscore and skin selection save data

pub mod assets;
pub mod content;
pub mod error;
pub mod persistence;
pub mod render;
pub mod sim;
pub mod surface;
pub mod tuning;

pub use content::GameContent;
pub use error::{ConfigError, SetupError};
pub use persistence::SaveData;
pub use surface::Surface;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Width every layout constant is authored against
    pub const REFERENCE_WIDTH: f32 = 480.0;
    /// Playfield height / width
    pub const ASPECT_RATIO: f32 = 4.0 / 3.0;
    /// Duration of one frame unit in milliseconds (60 Hz)
    pub const NOMINAL_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Number of labels in the pre-run countdown ("3", "2", "1", "GO!")
    pub const COUNTDOWN_STEPS: usize = 4;
}

/// Move `value` toward `target` by `step`, never overshooting
#[inline]
pub fn approach(value: f32, target: f32, step: f32) -> f32 {
    if value < target {
        (value + step).min(target)
    } else {
        (value - step).max(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approach_clamps_both_directions() {
        assert_eq!(approach(0.9, 1.0, 0.5), 1.0);
        assert_eq!(approach(0.1, 0.0, 0.5), 0.0);
        assert!((approach(0.2, 1.0, 0.1) - 0.3).abs() < 1e-6);
    }
}
