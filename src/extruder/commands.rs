//! Two-phase command handling.

use core::fmt::{self, Write};

use embedded_hal::delay::DelayNs;

use crate::command::Command;
use crate::config::units::{Degrees, Millimeters, MmPerSec, MmPerSecSquared};
use crate::config::MIN_FILAMENT_DIAMETER;
use crate::homing::HomingOutcome;
use crate::machine::{HaltSignal, MotionQueue, PrimaryAxis, StepTicker};
use crate::motion::{BlockHandle, MotionMode};
use crate::motor::StepperMotor;
use crate::retract::RetractCommand;
use crate::sensor::AngleInput;
use crate::ultrasonic::UltrasonicGenerator;

use super::ExtruderAxis;

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
    /// Handle a command as soon as it is parsed.
    ///
    /// Settings and reports apply immediately. Moves and modal commands are forwarded
    /// to `queue` so their execute phase runs in order with the motion. Replies go to
    /// `out`.
    ///
    /// # Errors
    ///
    /// Only fails if writing a reply fails.
    pub fn on_command_received<Q, P, W>(
        &mut self,
        command: &Command,
        queue: &mut Q,
        primary: &mut P,
        out: &mut W,
    ) -> fmt::Result
    where
        Q: MotionQueue + ?Sized,
        P: PrimaryAxis + ?Sized,
        W: Write + ?Sized,
    {
        if let Some(m) = command.m_number() {
            self.received_m(m, command, queue, out)?;
            match m {
                82 => self.milestone.absolute_mode = true,
                83 => self.milestone.absolute_mode = false,
                _ => {}
            }
        } else if let Some(g) = command.g_number() {
            self.received_g(g, command, queue, primary);
            self.track_milestone_g(g, command, out)?;
        }
        Ok(())
    }

    fn received_m<Q, W>(&mut self, m: u16, command: &Command, queue: &mut Q, out: &mut W) -> fmt::Result
    where
        Q: MotionQueue + ?Sized,
        W: Write + ?Sized,
    {
        match m {
            114 if command.subcode() == 0 && self.enabled => {
                write!(out, " E:{:.3} ", self.position.current.0)?;
            }
            92 if self.is_targeted(command) => {
                if let Some(spm) = command.value('E') {
                    self.set_steps_per_mm(spm);
                }
                writeln!(out, "E:{} ", self.scale.steps_per_mm)?;
            }
            200 if self.is_targeted(command) => match command.value('D') {
                Some(diameter) => {
                    queue.wait_for_empty_queue();
                    self.set_filament_diameter(diameter);
                }
                None if self.filament_diameter.0 > MIN_FILAMENT_DIAMETER => {
                    writeln!(out, "Filament Diameter: {:.6}", self.filament_diameter.0)?;
                }
                None => writeln!(out, "Volumetric extrusion is disabled")?,
            },
            203 if self.is_targeted(command) => {
                if command.num_args() == 0 {
                    writeln!(
                        out,
                        "E:{} V:{}",
                        self.stepper.max_rate(),
                        self.max_volumetric_rate
                    )?;
                } else {
                    if let Some(rate) = command.value('E') {
                        self.stepper.set_max_rate(rate);
                    }
                    if let Some(rate) = command.value('V') {
                        self.max_volumetric_rate = rate;
                    }
                }
            }
            204 if command.has_letter('E') && self.is_targeted(command) => {
                if let Some(acceleration) = command.value('E') {
                    self.acceleration = MmPerSecSquared(acceleration);
                }
            }
            207 if self.is_targeted(command) => {
                let settings = self.retract.settings_mut();
                if let Some(length) = command.value('S') {
                    settings.length = Millimeters(length);
                }
                if let Some(rate) = command.value('F') {
                    settings.feedrate = MmPerSec::from_per_minute(rate);
                }
                if let Some(length) = command.value('Z') {
                    settings.zlift_length = Millimeters(length);
                }
                if let Some(rate) = command.value('Q') {
                    settings.zlift_feedrate = rate;
                }
            }
            208 if self.is_targeted(command) => {
                let settings = self.retract.settings_mut();
                if let Some(length) = command.value('S') {
                    settings.recover_length = Millimeters(length);
                }
                if let Some(rate) = command.value('F') {
                    settings.recover_feedrate = MmPerSec::from_per_minute(rate);
                }
            }
            221 if self.enabled => match command.value('S') {
                Some(percent) => self.extruder_multiplier = percent / 100.0,
                None => writeln!(out, "Flow rate at {:6.2} %", self.extruder_multiplier * 100.0)?,
            },
            50 | 51 => {
                if let Some(generator) = self.ultrasonic.as_mut() {
                    generator.set_enabled(m == 50);
                }
            }
            52 => writeln!(out, "{}", self.ultrasonic.as_mut().map_or(false, |g| g.is_ready()))?,
            53 => writeln!(out, "{}", self.ultrasonic.as_mut().map_or(false, |g| g.is_active()))?,
            54 => writeln!(out, "{}", self.ultrasonic.as_mut().map_or(false, |g| g.has_fault()))?,
            17 | 18 | 82 | 83 | 84 => queue.append_command(command),
            _ => {}
        }
        Ok(())
    }

    fn received_g<Q, P>(&mut self, g: u16, command: &Command, queue: &mut Q, primary: &mut P)
    where
        Q: MotionQueue + ?Sized,
        P: PrimaryAxis + ?Sized,
    {
        let has_e = command.has_letter('E');

        if (g == 92 && has_e) || g == 90 || g == 91 {
            queue.append_command(command);
        } else if self.enabled && g < 4 && has_e && command.is_solo() {
            // later commands must wait for the solo move
            queue.append_command(command);
            queue.queue_solo_barrier();
        } else if let Some(retract) = RetractCommand::from_command(command).filter(|_| self.enabled) {
            match self.retract.request(retract) {
                Some(plan) => plan.queue(command, queue, primary),
                None => log::debug!("ignoring duplicate {:?}", retract),
            }
        } else if self.enabled && (g == 0 || g == 1) && command.has_letter('Z') {
            self.retract.note_z_move(primary.is_absolute_mode());
        }
    }

    fn track_milestone_g<W: Write + ?Sized>(&mut self, g: u16, command: &Command, out: &mut W) -> fmt::Result {
        match g {
            90 => self.milestone.absolute_mode = true,
            91 => self.milestone.absolute_mode = false,
            92 if self.enabled => {
                if let Some(e) = command.value('E') {
                    self.milestone.position = e;
                } else if command.num_args() == 0 {
                    self.milestone.position = 0.0;
                }
            }
            28 if self.enabled && command.has_letter('E') => match self.home() {
                Ok(HomingOutcome::Homed { .. }) => self.milestone.position = 0.0,
                Ok(HomingOutcome::Halted) => writeln!(out, "Operation halted")?,
                Err(e) => {
                    log::error!("homing '{}' failed: {}", self.name, e);
                    writeln!(out, "{}", e)?;
                }
            },
            _ => {}
        }
        Ok(())
    }

    /// Handle a command when it reaches the head of the motion queue.
    ///
    /// Decides the mode of the next block. Enable, disable and coordinate-mode
    /// commands apply to every instance, selected or not.
    pub fn on_command_execute<P>(&mut self, command: &Command, primary: &P)
    where
        P: PrimaryAxis + ?Sized,
    {
        self.mode = MotionMode::Off;

        if let Some(m) = command.m_number() {
            match m {
                17 => self.stepper.enable(true),
                18 | 84 => self.stepper.enable(false),
                82 => self.absolute_mode = true,
                83 => self.absolute_mode = false,
                _ => {}
            }
            return;
        }

        let Some(g) = command.g_number() else {
            return;
        };

        if g == 90 || g == 91 {
            self.absolute_mode = g == 90;
            return;
        }

        if !self.enabled {
            return;
        }

        if g == 92 {
            if let Some(e) = command.value('E') {
                self.set_angle(Degrees(e));
            } else if command.num_args() == 0 {
                self.position.reset();
                self.optimizer.set_reference(Degrees(0.0));
            }
        } else if let Some(retract) = RetractCommand::from_command(command) {
            let (travel, feed_rate) = self.retract.settings().solo_move(retract);
            self.start_solo(travel);
            self.feed_rate = feed_rate;
        } else if g <= 3 {
            if let Some(e) = command.value('E') {
                self.execute_move(e, command);
            }

            // also sets the speed of later non-firmware retracts
            if let Some(f) = command.value('F') {
                let mut rate = f / primary.seconds_per_minute();
                let max_rate = self.stepper.max_rate();
                if max_rate > 0.0 && rate > max_rate {
                    rate = max_rate;
                }
                self.feed_rate = MmPerSec(rate);
            }
        }
    }

    fn execute_move(&mut self, e: f32, command: &Command) {
        let requested = if self.absolute_mode {
            Degrees(e)
        } else {
            self.optimizer.previous_angle() + Degrees(e)
        };

        let optimized = self.optimizer.optimize(requested, &self.scale);
        let travel = optimized.travel;

        self.position.target.0 += travel;
        self.position.target_angle = self.optimizer.previous_angle();

        if command.is_solo() {
            self.mode = MotionMode::Solo;
            self.travel_distance = travel;
        } else {
            self.mode = MotionMode::Follow;
            self.travel_ratio = travel * self.volumetric_multiplier * self.extruder_multiplier
                / command.millimeters_of_travel();
        }

        self.stepper.enable(true);
    }

    fn start_solo(&mut self, travel: f32) {
        self.mode = MotionMode::Solo;
        self.travel_distance = travel;
        self.position.target.0 += travel;

        let angle = (self.position.target_angle + Degrees(self.scale.distance_to_angle(travel))).normalized();
        self.position.target_angle = angle;
        self.optimizer.set_reference(angle);

        self.stepper.enable(true);
    }
}
