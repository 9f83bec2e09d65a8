//! Per-block motion mode and step planning.

use crate::motor::Direction;

/// How the feed axis moves during the next block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionMode {
    /// No feed motion.
    #[default]
    Off,
    /// Feed alone on a zero-length primary block, with its own acceleration ramp.
    Solo,
    /// Feed in proportion to the primary axes.
    Follow,
}

impl MotionMode {
    /// Get the mode name for debugging.
    pub fn name(self) -> &'static str {
        match self {
            MotionMode::Off => "Off",
            MotionMode::Solo => "Solo",
            MotionMode::Follow => "Follow",
        }
    }
}

/// Whole steps of one block and the remainder carried to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPlan {
    /// Step count, magnitude only.
    pub steps: u32,
    /// Direction of the stepped motion.
    pub direction: Direction,
    /// Sub-step remainder after this block.
    pub unstepped: f32,
}

impl StepPlan {
    /// Round `travel` plus the carried remainder down to whole steps.
    ///
    /// The remainder keeps the exact fraction that was not stepped and stays within
    /// `[0, 1 / steps_per_mm)`, so the long-run step count tracks the requested distance.
    pub fn compute(steps_per_mm: f32, travel: f32, unstepped: f32) -> Self {
        let total = travel + unstepped;
        let signed_steps = libm::floorf(steps_per_mm * total);
        let steps = libm::fabsf(signed_steps) as u32;

        // a negative travel smaller than the carry still nets forward
        let direction = Direction::from_distance(signed_steps);

        Self {
            steps,
            direction,
            unstepped: total - signed_steps / steps_per_mm,
        }
    }

    /// Whether the block moves the motor at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps == 0
    }
}
