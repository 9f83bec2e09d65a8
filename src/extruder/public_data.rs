//! Data the rest of the machine reads from or pushes into an extruder.

use embedded_hal::delay::DelayNs;

use crate::config::units::Degrees;
use crate::config::MIN_FILAMENT_DIAMETER;
use crate::machine::{HaltSignal, StepTicker};
use crate::motion::BlockHandle;
use crate::motor::StepperMotor;
use crate::sensor::AngleInput;
use crate::ultrasonic::UltrasonicGenerator;

use super::ExtruderAxis;

/// Request addressed to the extruders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PublicDataRequest {
    /// Read steps per millimetre of the selected extruder.
    StepsPerMm,
    /// Read the head offset of the tool with this identifier.
    ToolOffset {
        /// Tool identifier.
        identifier: u16,
    },
    /// Rate modifier keeping a planned move within the speed limits.
    RateLimit {
        /// `E` of the move, absolute or relative per the milestone mode; mm or mm³.
        target: f32,
        /// Inverse of the move duration, 1/s.
        inverse_secs: f32,
    },
    /// Snapshot the position and coordinate mode.
    SaveState,
    /// Restore the snapshot. Only valid with an empty queue. The shaft angle follows
    /// the restored position.
    RestoreState,
}

/// Reply to a [`PublicDataRequest`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PublicData {
    /// Steps per millimetre.
    StepsPerMm(f32),
    /// X, Y and Z head offset.
    ToolOffset([f32; 3]),
    /// Factor to apply to the move's rate; 1.0 means unchanged.
    RateModifier(f32),
    /// The request was handled and carries no value.
    Taken,
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
    /// Answer a public data request.
    ///
    /// Reads and rate limits are answered by the selected extruder only, offsets by the
    /// instance with the requested identifier; `None` leaves the request to another
    /// instance.
    pub fn on_public_data(&mut self, request: PublicDataRequest) -> Option<PublicData> {
        match request {
            PublicDataRequest::StepsPerMm => {
                self.enabled.then_some(PublicData::StepsPerMm(self.scale.steps_per_mm))
            }
            PublicDataRequest::ToolOffset { identifier } => (identifier == self.identifier)
                .then_some(PublicData::ToolOffset(self.tool_offset)),
            PublicDataRequest::RateLimit {
                target,
                inverse_secs,
            } => self
                .enabled
                .then(|| PublicData::RateModifier(self.check_max_speeds(target, inverse_secs))),
            PublicDataRequest::SaveState => {
                self.saved.position = self.position.current.0;
                self.saved.absolute_mode = self.absolute_mode;
                Some(PublicData::Taken)
            }
            PublicDataRequest::RestoreState => {
                self.position.current.0 = self.saved.position;
                self.position.current_angle =
                    Degrees(self.scale.distance_to_angle(self.saved.position)).normalized();
                self.milestone.position = self.saved.position;
                self.absolute_mode = self.saved.absolute_mode;
                self.milestone.absolute_mode = self.saved.absolute_mode;
                Some(PublicData::Taken)
            }
        }
    }

    /// Rate modifier keeping a move within the volumetric and feed-rate limits.
    ///
    /// Advances the milestone position by the move.
    pub fn check_max_speeds(&mut self, target: f32, inverse_secs: f32) -> f32 {
        let mut modifier = 1.0;
        let mut inverse_secs = inverse_secs;

        let mut delta = if self.milestone.absolute_mode {
            let delta = libm::fabsf(target - self.milestone.position);
            self.milestone.position = target;
            delta
        } else {
            self.milestone.position += target;
            target
        };

        let volumetric = self.filament_diameter.0 > MIN_FILAMENT_DIAMETER;

        if self.max_volumetric_rate > 0.0 && volumetric {
            let flow = delta * inverse_secs;
            if flow > self.max_volumetric_rate {
                modifier = self.max_volumetric_rate / flow;
                inverse_secs *= modifier;
            }
        }

        let max_speed = self.stepper.max_rate();
        if max_speed > 0.0 {
            if volumetric {
                delta *= self.volumetric_multiplier;
            }
            let speed = delta * inverse_secs;
            if speed > max_speed {
                modifier *= max_speed / speed;
            }
        }

        modifier
    }
}
