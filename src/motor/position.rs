//! Position tracking for the feed axis.
//!
//! Linear distance and shaft angle are two views of the same motion, related by the
//! ratio of steps per millimetre to steps per degree.

use crate::config::units::{Degrees, Millimeters, FULL_TURN};

/// Conversion factors between feed distance, shaft angle and motor steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleScale {
    /// Motor steps per millimetre of feed.
    pub steps_per_mm: f32,
    /// Motor steps per degree of shaft rotation.
    pub steps_per_angle: f32,
}

impl AngleScale {
    /// Create a new scale.
    #[inline]
    pub fn new(steps_per_mm: f32, steps_per_angle: f32) -> Self {
        Self {
            steps_per_mm,
            steps_per_angle,
        }
    }

    /// Feed distance covered by rotating the shaft by `angle`.
    #[inline]
    pub fn angle_to_distance(&self, angle: f32) -> f32 {
        angle * self.steps_per_angle / self.steps_per_mm
    }

    /// Shaft rotation produced by feeding `distance`.
    #[inline]
    pub fn distance_to_angle(&self, distance: f32) -> f32 {
        distance * self.steps_per_mm / self.steps_per_angle
    }

    /// Whole motor steps for a shaft angle, truncated toward zero.
    #[inline]
    pub fn angle_to_steps(&self, angle: Degrees) -> u32 {
        libm::fabsf(angle.0 * self.steps_per_angle) as u32
    }
}

/// Linear and angular accumulators of one feed axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisPosition {
    /// Position reached once every queued block has run.
    pub current: Millimeters,
    /// Position requested by the last command.
    pub target: Millimeters,
    /// Shaft angle matching `current`, kept in `[0, 360)`.
    pub current_angle: Degrees,
    /// Shaft angle requested by the last command.
    pub target_angle: Degrees,
    /// Sub-step remainder carried into the next block.
    pub unstepped: f32,
}

impl AxisPosition {
    /// Advance by `travel`, wrapping the angle and resynchronizing the linear position
    /// whenever the angle leaves `[0, 360)`.
    pub fn advance(&mut self, travel: f32, scale: &AngleScale) {
        self.current.0 += travel;
        let angle = self.current_angle.0 + scale.distance_to_angle(travel);

        if (0.0..FULL_TURN).contains(&angle) {
            self.current_angle = Degrees(angle);
        } else {
            self.current_angle = Degrees(angle).normalized();
            self.current.0 = scale.angle_to_distance(self.current_angle.0);
        }
    }

    /// Move every accumulator to the origin.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
