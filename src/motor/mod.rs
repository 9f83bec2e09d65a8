//! Motor module for extruder-motion.
//!
//! Provides the stepper collaborator trait and feed-axis position bookkeeping.

mod position;
mod stepper;

pub use position::{AngleScale, AxisPosition};
pub use stepper::{Direction, StepperMotor};
