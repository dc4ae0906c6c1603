//! Simulation clock
//!
//! The backend calls back once per displayed frame with wall time. All speeds
//! are tuned in "frames at 60 Hz", so elapsed time is converted to that unit
//! and clamped to keep a stalled tab from teleporting everything.

use crate::consts::NOMINAL_FRAME_MS;

#[derive(Debug, Clone, Default)]
pub struct SimClock {
    /// Timestamp (ms) of the previous callback
    last_time: Option<f64>,
    /// Frames elapsed since the clock started; drives bobbing obstacles.
    /// Kept in f64 so long sessions keep sub-frame resolution.
    accumulated: f64,
    max_delta: f32,
}

impl SimClock {
    pub fn new(max_delta: f32) -> Self {
        Self {
            last_time: None,
            accumulated: 0.0,
            max_delta,
        }
    }

    /// Convert a frame callback timestamp into a frame delta
    ///
    /// The first callback yields exactly one frame.
    pub fn frame_delta(&mut self, now_ms: f64) -> f32 {
        let delta = match self.last_time {
            Some(last) => ((now_ms - last) / NOMINAL_FRAME_MS) as f32,
            None => 1.0,
        };
        self.last_time = Some(now_ms);
        if delta.is_finite() {
            delta.clamp(0.0, self.max_delta)
        } else {
            0.0
        }
    }

    /// Record `dt` frames of simulated time
    pub fn accumulate(&mut self, dt: f32) {
        self.accumulated += f64::from(dt);
    }

    pub fn accumulated(&self) -> f64 {
        self.accumulated
    }
}
