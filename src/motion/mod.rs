//! Motion module for extruder-motion.
//!
//! Provides the angle optimizer, block claiming, step planning and servo speed math.

mod block;
mod optimizer;
pub mod servo;
mod steps;

pub use block::{BlockHandle, ClaimedBlock};
pub use optimizer::{antipode, AngleOptimizer, Optimized, RotationCase, MAX_ANGLE_LIMIT, MIN_ANGLE_LIMIT};
pub use steps::{MotionMode, StepPlan};
