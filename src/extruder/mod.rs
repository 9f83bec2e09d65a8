//! The feed axis: one extruder instance and everything it tracks between blocks.
//!
//! Commands reach the axis in two phases. [`ExtruderAxis::on_command_received`] runs
//! as soon as the command is parsed; [`ExtruderAxis::on_command_execute`] runs once the
//! command reaches the head of the motion queue and decides how the next block moves
//! the feed motor. The [`MotionHooks`](crate::MotionHooks) implementation then turns
//! that decision into steps.

mod builder;
mod commands;
mod hooks;
mod public_data;

use embedded_hal::delay::DelayNs;
use heapless::String;

use crate::config::units::{Degrees, Millimeters, MmPerSec, MmPerSecSquared};
use crate::config::{ExtruderConfig, HomingConfig};
use crate::error::Result;
use crate::homing::{HomingOutcome, HomingScan};
use crate::machine::{HaltSignal, StepTicker};
use crate::motion::{AngleOptimizer, BlockHandle, ClaimedBlock, MotionMode};
use crate::motor::{AngleScale, AxisPosition, StepperMotor};
use crate::retract::{RetractSequencer, RetractSettings};
use crate::sensor::{AngleInput, AngleSensor};
use crate::ultrasonic::{NoUltrasonic, UltrasonicGenerator};

pub use builder::ExtruderAxisBuilder;
pub use public_data::{PublicData, PublicDataRequest};

/// Position and coordinate mode snapshot used by the rate limiter and save/restore.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Milestone {
    position: f32,
    absolute_mode: bool,
}

impl Default for Milestone {
    fn default() -> Self {
        Self {
            position: 0.0,
            absolute_mode: true,
        }
    }
}

/// One extruder feed axis.
pub struct ExtruderAxis<M, T, H, B, S, D, U = NoUltrasonic>
where
    M: StepperMotor,
    T: StepTicker,
    H: HaltSignal,
    B: BlockHandle,
    S: AngleInput,
    D: DelayNs,
    U: UltrasonicGenerator,
{
    name: String<32>,
    identifier: u16,
    enabled: bool,

    stepper: M,
    ticker: T,
    halt: H,
    sensor: AngleSensor<S>,
    delay: D,
    ultrasonic: Option<U>,

    mode: MotionMode,
    absolute_mode: bool,
    position: AxisPosition,
    optimizer: AngleOptimizer,
    scale: AngleScale,
    travel_distance: f32,
    travel_ratio: f32,

    feed_rate: MmPerSec,
    acceleration: MmPerSecSquared,
    filament_diameter: Millimeters,
    volumetric_multiplier: f32,
    extruder_multiplier: f32,
    max_volumetric_rate: f32,

    milestone: Milestone,
    saved: Milestone,
    retract: RetractSequencer,
    homing: HomingConfig,
    tool_offset: [f32; 3],

    block: ClaimedBlock<B>,
}

impl<M, T, H, B, S, D, U> ExtruderAxis<M, T, H, B, S, D, U>
where
    M: StepperMotor,
    T: StepTicker,
    H: HaltSignal,
    B: BlockHandle,
    S: AngleInput,
    D: DelayNs,
    U: UltrasonicGenerator,
{
    /// Create a builder.
    pub fn builder() -> ExtruderAxisBuilder<M, T, H, B, S, D, U> {
        ExtruderAxisBuilder::new()
    }

    pub(crate) fn from_parts(
        name: String<32>,
        config: &ExtruderConfig,
        mut stepper: M,
        ticker: T,
        halt: H,
        sensor: AngleSensor<S>,
        delay: D,
        ultrasonic: Option<U>,
    ) -> Self {
        stepper.set_max_rate(config.max_speed.0);

        Self {
            name,
            identifier: config.identifier,
            enabled: config.enabled,
            stepper,
            ticker,
            halt,
            sensor,
            delay,
            ultrasonic,
            mode: MotionMode::Off,
            absolute_mode: true,
            position: AxisPosition::default(),
            optimizer: AngleOptimizer::new(),
            scale: AngleScale::new(config.steps_per_mm, config.steps_per_angle),
            travel_distance: 0.0,
            travel_ratio: 0.0,
            feed_rate: config.default_feed_rate,
            acceleration: config.acceleration,
            filament_diameter: config.filament_diameter,
            volumetric_multiplier: config.volumetric_multiplier(),
            extruder_multiplier: 1.0,
            max_volumetric_rate: config.max_volumetric_rate,
            milestone: Milestone::default(),
            saved: Milestone::default(),
            retract: RetractSequencer::new(RetractSettings::from_config(config)),
            homing: config.homing,
            tool_offset: [config.x_offset, config.y_offset, config.z_offset],
            block: ClaimedBlock::new(),
        }
    }

    /// Configuration name of the instance.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Identifier matched by `P` arguments.
    pub fn identifier(&self) -> u16 {
        self.identifier
    }

    /// Whether the instance is selected.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Select or deselect the instance (tool change).
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Mode decided by the last command execution.
    pub fn mode(&self) -> MotionMode {
        self.mode
    }

    /// Whether `E` words are absolute.
    pub fn is_absolute_mode(&self) -> bool {
        self.absolute_mode
    }

    /// Position bookkeeping.
    pub fn position(&self) -> &AxisPosition {
        &self.position
    }

    /// Position reached once every started block has run.
    pub fn current_position(&self) -> f32 {
        self.position.current.0
    }

    /// Shaft angle matching the current position.
    pub fn current_angle(&self) -> Degrees {
        self.position.current_angle
    }

    /// Last angle handed to the optimizer.
    pub fn previous_angle(&self) -> Degrees {
        self.optimizer.previous_angle()
    }

    /// Sub-step remainder carried into the next block.
    pub fn unstepped_distance(&self) -> f32 {
        self.position.unstepped
    }

    /// Travel waiting for the next block.
    pub fn travel_distance(&self) -> f32 {
        self.travel_distance
    }

    /// Feed per millimetre of primary travel while following.
    pub fn travel_ratio(&self) -> f32 {
        self.travel_ratio
    }

    /// Distance and angle conversion factors.
    pub fn scale(&self) -> AngleScale {
        self.scale
    }

    /// Solo feed rate.
    pub fn feed_rate(&self) -> MmPerSec {
        self.feed_rate
    }

    /// Solo ramp acceleration.
    pub fn acceleration(&self) -> MmPerSecSquared {
        self.acceleration
    }

    /// Filament diameter; zero when volumetric extrusion is off.
    pub fn filament_diameter(&self) -> Millimeters {
        self.filament_diameter
    }

    /// Flow-rate factor set by `M221`.
    pub fn extruder_multiplier(&self) -> f32 {
        self.extruder_multiplier
    }

    /// Maximum volumetric rate, mm³/s.
    pub fn max_volumetric_rate(&self) -> f32 {
        self.max_volumetric_rate
    }

    /// Retract state and settings.
    pub fn retract(&self) -> &RetractSequencer {
        &self.retract
    }

    /// Whether a block is held.
    pub fn has_claimed_block(&self) -> bool {
        self.block.is_claimed()
    }

    /// The feed stepper.
    pub fn stepper(&self) -> &M {
        &self.stepper
    }

    /// The feed stepper, mutably.
    pub fn stepper_mut(&mut self) -> &mut M {
        &mut self.stepper
    }

    /// The angle sensor.
    pub fn sensor(&self) -> &AngleSensor<S> {
        &self.sensor
    }

    /// X, Y and Z offsets of the tool head.
    pub fn tool_offset(&self) -> [f32; 3] {
        self.tool_offset
    }

    /// The ultrasonic generator, if one is fitted.
    pub fn ultrasonic_mut(&mut self) -> Option<&mut U> {
        self.ultrasonic.as_mut()
    }

    /// Run the homing scan.
    ///
    /// A completed scan makes the home angle the new origin: positions, angles, the
    /// carried remainder and the optimizer reference all return to zero. A halted scan
    /// leaves the state as it was.
    ///
    /// # Errors
    ///
    /// Returns an error if the sweep overflows the sample buffer.
    pub fn home(&mut self) -> Result<HomingOutcome> {
        let outcome = HomingScan {
            stepper: &mut self.stepper,
            sensor: &mut self.sensor,
            halt: &self.halt,
            delay: &mut self.delay,
            scale: self.scale,
            config: self.homing,
        }
        .run()?;

        if let HomingOutcome::Homed { .. } = outcome {
            self.reset_position();
        }
        Ok(outcome)
    }

    /// Move every position accumulator and the optimizer reference to the origin.
    pub fn reset_position(&mut self) {
        self.position.reset();
        self.optimizer.set_reference(Degrees(0.0));
        self.travel_distance = 0.0;
        self.travel_ratio = 0.0;
        self.saved.position = 0.0;
    }

    /// Set both positions from a shaft angle and drop the carried remainder.
    fn set_angle(&mut self, angle: Degrees) {
        let angle = angle.normalized();
        let distance = Millimeters(self.scale.angle_to_distance(angle.0));

        self.optimizer.set_reference(angle);
        self.position.current_angle = angle;
        self.position.target_angle = angle;
        self.position.current = distance;
        self.position.target = distance;
        self.position.unstepped = 0.0;
    }

    fn set_steps_per_mm(&mut self, steps_per_mm: f32) {
        self.scale.steps_per_mm = steps_per_mm;
    }

    fn set_filament_diameter(&mut self, diameter: f32) {
        self.filament_diameter = Millimeters(diameter);
        self.volumetric_multiplier = crate::config::volumetric_multiplier(diameter);
    }

    /// Whether a settings command addresses this instance.
    ///
    /// Without `P` the selected instance answers; with `P` only the matching identifier.
    fn is_targeted(&self, command: &crate::command::Command) -> bool {
        match command.value('P') {
            Some(p) => p == self.identifier as f32,
            None => self.enabled,
        }
    }
}

impl<M, T, H, B, S, D, U> core::fmt::Debug for ExtruderAxis<M, T, H, B, S, D, U>
where
    M: StepperMotor,
    T: StepTicker,
    H: HaltSignal,
    B: BlockHandle,
    S: AngleInput,
    D: DelayNs,
    U: UltrasonicGenerator,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ExtruderAxis")
            .field("name", &self.name)
            .field("identifier", &self.identifier)
            .field("enabled", &self.enabled)
            .field("mode", &self.mode)
            .field("position", &self.position)
            .field("claimed", &self.block.is_claimed())
            .finish()
    }
}
