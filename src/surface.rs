//! Rendering surface dimensions
//!
//! The playfield is at most 480 wide and always 4:3 tall. Every layout and
//! speed constant is authored against the 480 reference and multiplied by
//! `scale_factor`.

use serde::{Deserialize, Serialize};

use crate::consts::{ASPECT_RATIO, REFERENCE_WIDTH};
use crate::error::SurfaceError;

/// Validated screen size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    width: f32,
    height: f32,
    scale_factor: f32,
}

impl Surface {
    /// Reject sizes that would poison scale-derived divisions
    pub fn new(width: f32, height: f32) -> Result<Self, SurfaceError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(SurfaceError::InvalidSize { width, height });
        }
        Ok(Self {
            width,
            height,
            scale_factor: width / REFERENCE_WIDTH,
        })
    }

    /// Fit the playfield into a window of the given width
    pub fn fit_window(window_width: f32) -> Result<Self, SurfaceError> {
        let width = window_width.min(REFERENCE_WIDTH);
        Self::new(width, width * ASPECT_RATIO)
    }

    /// The 480x640 authoring size
    pub fn reference() -> Self {
        Self {
            width: REFERENCE_WIDTH,
            height: REFERENCE_WIDTH * ASPECT_RATIO,
            scale_factor: 1.0,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline]
    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }
}
