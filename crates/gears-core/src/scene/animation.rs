//! Fixed-timestep rotation driver

use serde::{Deserialize, Serialize};

use crate::constants::animation::{DEGREES_PER_SECOND, TIMESTEP, WRAP_DEGREES};

/// Animation settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Rotation speed of the driving gear
    pub degrees_per_second: f32,
    /// Time advanced per frame, in seconds
    pub timestep: f32,
    /// The angle is wrapped back by this amount once it exceeds it
    pub wrap_degrees: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            degrees_per_second: DEGREES_PER_SECOND,
            timestep: TIMESTEP,
            wrap_degrees: WRAP_DEGREES,
        }
    }
}

/// Scene rotation angle advanced once per frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Animation {
    angle: f32,
    config: AnimationConfig,
}

impl Animation {
    pub fn new(config: AnimationConfig) -> Self {
        Self { angle: 0.0, config }
    }

    /// Current angle in degrees
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Degrees added by one call to [`Animation::advance`]
    pub fn step_degrees(&self) -> f32 {
        self.config.degrees_per_second * self.config.timestep
    }

    /// Advance one frame and return the new angle
    pub fn advance(&mut self) -> f32 {
        self.angle += self.step_degrees();
        if self.angle > self.config.wrap_degrees {
            self.angle -= self.config.wrap_degrees;
        }
        self.angle
    }

    /// Advance `frames` frames
    pub fn advance_by(&mut self, frames: u64) -> f32 {
        for _ in 0..frames {
            self.advance();
        }
        self.angle
    }

    pub fn reset(&mut self) {
        self.angle = 0.0;
    }
}
