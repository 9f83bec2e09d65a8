//! Shortest-path conversion of a requested shaft angle into feed travel.
//!
//! The shaft is treated as symmetric under a half turn, so besides the direct
//! difference the optimizer also considers the antipodal point of the previous angle,
//! each with and without crossing the 0/360 boundary.

use crate::config::units::{Degrees, FULL_TURN};
use crate::motor::AngleScale;

/// Lowest accepted input angle.
pub const MIN_ANGLE_LIMIT: f32 = 0.0;

/// Highest accepted input angle; larger inputs wrap.
pub const MAX_ANGLE_LIMIT: f32 = FULL_TURN;

const HALF_TURN: f32 = FULL_TURN / 2.0;

/// Rotation candidate picked by the optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RotationCase {
    /// Straight from the previous angle.
    Direct,
    /// From the previous angle, across the 0/360 boundary.
    DirectWrapped,
    /// From the antipodal point of the previous angle.
    Antipodal,
    /// From the antipodal point, across the 0/360 boundary.
    AntipodalWrapped,
}

/// Result of one optimization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Optimized {
    /// Signed feed distance to travel.
    pub travel: f32,
    /// Requested angle wrapped into `[0, 360)`.
    pub angle: Degrees,
    /// Winning candidate, `None` when no motion is needed.
    pub case: Option<RotationCase>,
}

/// Tracks the last commanded angle and turns new angles into travel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AngleOptimizer {
    previous: Degrees,
}

/// `angle + 180`, wrapped below 360.
#[inline]
pub fn antipode(angle: f32) -> f32 {
    let edge = angle + HALF_TURN;
    if edge >= FULL_TURN {
        edge - FULL_TURN
    } else {
        edge
    }
}

fn wrap_input(angle: f32) -> f32 {
    let mut angle = angle;
    if angle < 0.0 {
        angle += FULL_TURN;
    }
    if !(MIN_ANGLE_LIMIT..MAX_ANGLE_LIMIT).contains(&angle) {
        angle = Degrees(angle).normalized().0;
    }
    angle
}

impl AngleOptimizer {
    /// Create an optimizer anchored at 0°.
    pub const fn new() -> Self {
        Self {
            previous: Degrees(0.0),
        }
    }

    /// Last commanded angle.
    #[inline]
    pub fn previous_angle(&self) -> Degrees {
        self.previous
    }

    /// Re-anchor without computing travel.
    pub fn set_reference(&mut self, angle: Degrees) {
        self.previous = angle.normalized();
    }

    /// Compute the travel reaching `input` from the last commanded angle.
    ///
    /// Updates the reference to the wrapped input unless no motion is needed. Call once
    /// per command.
    pub fn optimize(&mut self, input: Degrees, scale: &AngleScale) -> Optimized {
        let mut target = input.0;
        if target < 0.0 {
            target += FULL_TURN;
        }

        if target == self.previous.0 {
            return Optimized {
                travel: 0.0,
                angle: Degrees(target),
                case: None,
            };
        }

        let target = wrap_input(input.0);
        let previous = self.previous.0;
        let edge = antipode(previous);

        let candidates = [
            (RotationCase::Direct, libm::fabsf(previous - target)),
            (
                RotationCase::DirectWrapped,
                libm::fabsf(FULL_TURN - libm::fabsf(previous - target)),
            ),
            (RotationCase::Antipodal, libm::fabsf(edge - target)),
            (
                RotationCase::AntipodalWrapped,
                libm::fabsf(FULL_TURN - libm::fabsf(edge - target)),
            ),
        ];

        // strict comparison keeps the first candidate on ties
        let (case, distance) = candidates
            .iter()
            .copied()
            .fold(candidates[0], |best, c| if c.1 < best.1 { c } else { best });

        if distance == 0.0 {
            return Optimized {
                travel: 0.0,
                angle: Degrees(target),
                case: None,
            };
        }

        let travel = match case {
            RotationCase::Direct => scale.angle_to_distance(target - previous),
            RotationCase::DirectWrapped => {
                if previous - target < 0.0 {
                    -scale.angle_to_distance(distance)
                } else {
                    scale.angle_to_distance(distance)
                }
            }
            RotationCase::Antipodal => scale.angle_to_distance(target - edge),
            RotationCase::AntipodalWrapped => {
                if edge - target < 0.0 {
                    -scale.angle_to_distance(distance)
                } else {
                    scale.angle_to_distance(distance)
                }
            }
        };

        self.previous = Degrees(target);

        Optimized {
            travel,
            angle: Degrees(target),
            case: Some(case),
        }
    }
}
