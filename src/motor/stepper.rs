//! Stepper pulse generator as seen by the feed axis.

/// Direction of feed motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Pushes filament (positive travel).
    Forward,
    /// Pulls filament back (zero or negative travel).
    Reverse,
}

impl Direction {
    /// Direction of a signed travel distance. Only strictly positive travel is forward.
    #[inline]
    pub fn from_distance(distance: f32) -> Self {
        if distance > 0.0 {
            Direction::Forward
        } else {
            Direction::Reverse
        }
    }
}

/// Step pulse generator driving the feed motor.
///
/// Implementations own pulse timing. The owner wires the generator's completion
/// interrupt to [`crate::MotionHooks::on_stepper_finished`].
pub trait StepperMotor {
    /// Start a move of `steps` pulses in `direction`.
    fn move_steps(&mut self, direction: Direction, steps: u32);

    /// Start a move and set the step rate in one call.
    fn move_steps_at(&mut self, direction: Direction, steps: u32, rate: f32) {
        self.move_steps(direction, steps);
        self.set_speed(rate);
    }

    /// Set the current step rate, steps per second.
    fn set_speed(&mut self, rate: f32);

    /// Current step rate, steps per second.
    fn speed(&self) -> f32;

    /// Steps of the move in progress, as programmed.
    fn steps_to_move(&self) -> u32;

    /// Set the rate ceiling applied by the pulse generator.
    fn set_max_rate(&mut self, rate: f32);

    /// Rate ceiling applied by the pulse generator.
    fn max_rate(&self) -> f32;

    /// Whether a move is still in progress.
    fn is_moving(&self) -> bool;

    /// Drive or release the motor enable line.
    fn enable(&mut self, enabled: bool);

    /// Record whether the last block ended with this motor following the primary axis.
    fn set_moved_last_block(&mut self, moved: bool);
}
