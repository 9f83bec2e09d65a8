//! Block lifecycle and servo callbacks.

use embedded_hal::delay::DelayNs;

use crate::machine::{HaltEvent, HaltSignal, MotionHooks, SpeedChange, StepTicker};
use crate::motion::servo;
use crate::motion::{BlockHandle, MotionMode, StepPlan};
use crate::motor::{Direction, StepperMotor};
use crate::sensor::AngleInput;
use crate::ultrasonic::UltrasonicGenerator;

use super::ExtruderAxis;

impl<M, T, H, B, S, D, U> MotionHooks<B> for ExtruderAxis<M, T, H, B, S, D, U>
where
    M: StepperMotor,
    T: StepTicker,
    H: HaltSignal,
    B: BlockHandle,
    S: AngleInput,
    D: DelayNs,
    U: UltrasonicGenerator,
{
    fn on_block_begin(&mut self, block: B) {
        if !self.enabled {
            return;
        }

        let travel = match self.mode {
            MotionMode::Off => {
                self.block.clear();
                self.stepper.set_moved_last_block(false);
                return;
            }
            MotionMode::Follow => block.millimeters() * self.travel_ratio,
            // consumed so a later block cannot replay it
            MotionMode::Solo => core::mem::take(&mut self.travel_distance),
        };

        self.position.advance(travel, &self.scale);

        let plan = StepPlan::compute(self.scale.steps_per_mm, travel, self.position.unstepped);
        self.position.unstepped = plan.unstepped;

        if plan.is_empty() {
            log::debug!("'{}': no whole step in block", self.name);
            self.block.clear();
            self.stepper.set_moved_last_block(false);
            return;
        }

        if self.block.is_claimed() {
            log::debug!("'{}': previous block still held, releasing", self.name);
        }
        self.block.claim(block);
        self.stepper.move_steps(plan.direction, plan.steps);

        if self.mode == MotionMode::Follow {
            self.on_speed_change(SpeedChange::Adjusted);
            self.stepper.set_moved_last_block(true);
        } else {
            let target = servo::solo_target_rate(self.feed_rate.0, self.scale.steps_per_mm);
            self.stepper
                .set_speed(servo::solo_start_rate(target, self.rate_increase()));
            self.stepper.set_moved_last_block(false);
        }
    }

    fn on_block_end(&mut self) {
        if !self.enabled {
            return;
        }
        self.block.clear();
    }

    fn on_acceleration_tick(&mut self) {
        if !self.enabled
            || self.mode != MotionMode::Solo
            || !self.block.is_claimed()
            || !self.stepper.is_moving()
        {
            return;
        }

        let target = servo::solo_target_rate(self.feed_rate.0, self.scale.steps_per_mm);
        if let Some(rate) = servo::ramp(self.stepper.speed(), target, self.rate_increase()) {
            self.stepper.set_speed(rate);
        }
    }

    fn on_speed_change(&mut self, change: SpeedChange) {
        if !self.enabled
            || self.mode != MotionMode::Follow
            || !self.block.is_claimed()
            || !self.stepper.is_moving()
        {
            return;
        }

        match change {
            SpeedChange::Flush => {
                self.stepper.move_steps(Direction::Reverse, 0);
                self.block.release();
            }
            SpeedChange::Adjusted => {
                let Some(block) = self.block.get() else {
                    return;
                };
                let speed = servo::follow_speed(
                    self.ticker.trapezoid_adjusted_rate(),
                    self.stepper.steps_to_move(),
                    block.steps_event_count(),
                );
                match speed {
                    Some(speed) => self.stepper.set_speed(speed),
                    None => log::debug!("'{}': block without step events", self.name),
                }
            }
        }
    }

    fn on_stepper_finished(&mut self) {
        if !self.enabled {
            return;
        }
        if !self.block.release() {
            log::debug!("'{}': move finished with no block held", self.name);
        }
    }

    fn on_halt(&mut self, event: HaltEvent) {
        if event == HaltEvent::Asserted {
            self.stepper.enable(false);
        }
    }
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
    fn rate_increase(&self) -> f32 {
        servo::rate_increase(
            self.acceleration.0,
            self.ticker.acceleration_ticks_per_second(),
            self.scale.steps_per_mm,
        )
    }
}
