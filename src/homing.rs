//! Angle-sensor homing of the feed shaft.
//!
//! The shaft is swept in fixed angular steps while the sensor is sampled after each
//! step. The strongest reading marks home, and a final move brings the shaft there.
//! The scan blocks the caller and polls the halt signal while waiting for each move.

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use crate::config::units::Degrees;
use crate::config::HomingConfig;
use crate::error::{HomingError, Result};
use crate::machine::HaltSignal;
use crate::motor::{AngleScale, Direction, StepperMotor};
use crate::sensor::{AngleInput, AngleSensor};

/// Capacity of the sample buffer.
pub const MAX_HOMING_SAMPLES: usize = 64;

/// How a homing scan ended.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingOutcome {
    /// The shaft was moved to `angle`, measured from where the scan started.
    Homed {
        /// Angle of the strongest reading.
        angle: Degrees,
    },
    /// The machine halted mid-scan; the shaft stays wherever it stopped.
    Halted,
}

/// Index of the first strongest sample.
pub fn peak_index(samples: &[i32]) -> Option<usize> {
    let mut peak: Option<(usize, i32)> = None;
    for (index, &value) in samples.iter().enumerate() {
        match peak {
            Some((_, best)) if value <= best => {}
            _ => peak = Some((index, value)),
        }
    }
    peak.map(|(index, _)| index)
}

/// One homing run over borrowed collaborators.
pub struct HomingScan<'a, M, S, H, D>
where
    M: StepperMotor,
    S: AngleInput,
    H: HaltSignal,
    D: DelayNs,
{
    /// Feed stepper.
    pub stepper: &'a mut M,
    /// Shaft angle sensor.
    pub sensor: &'a mut AngleSensor<S>,
    /// Halt line polled while waiting.
    pub halt: &'a H,
    /// Delay between completion polls.
    pub delay: &'a mut D,
    /// Steps per degree of the shaft.
    pub scale: AngleScale,
    /// Sweep parameters.
    pub config: HomingConfig,
}

impl<M, S, H, D> HomingScan<'_, M, S, H, D>
where
    M: StepperMotor,
    S: AngleInput,
    H: HaltSignal,
    D: DelayNs,
{
    /// Sweep, locate the peak and move to it.
    ///
    /// # Errors
    ///
    /// Returns [`HomingError::SampleBufferFull`] if the sweep takes more samples than
    /// [`MAX_HOMING_SAMPLES`].
    pub fn run(self) -> Result<HomingOutcome> {
        let HomingScan {
            stepper,
            sensor,
            halt,
            delay,
            scale,
            config,
        } = self;

        let step = config.step_angle;
        let step_steps = scale.angle_to_steps(step);

        if config.sample_count() > MAX_HOMING_SAMPLES {
            return Err(HomingError::SampleBufferFull {
                capacity: MAX_HOMING_SAMPLES,
            }
            .into());
        }

        stepper.enable(true);
        stepper.set_speed(config.scan_rate);
        stepper.set_moved_last_block(true);

        let mut samples: Vec<i32, MAX_HOMING_SAMPLES> = Vec::new();
        let mut swept = 0.0;

        while swept < config.sweep_angle.0 {
            stepper.move_steps_at(Direction::Forward, step_steps, config.scan_rate);
            swept += step.0;

            let pushed = samples.push(sensor.raw_value());

            if !wait_for_move(stepper, halt, delay, config.poll_interval_us) {
                return Ok(HomingOutcome::Halted);
            }
            pushed.map_err(|_| HomingError::SampleBufferFull {
                capacity: MAX_HOMING_SAMPLES,
            })?;
        }

        let index = peak_index(&samples).unwrap_or(0);
        let angle = Degrees(index as f32 * step.0);
        log::debug!(
            "homing sampled {} points, peak {} at index {}",
            samples.len(),
            samples.get(index).copied().unwrap_or(0),
            index
        );

        stepper.move_steps_at(Direction::Forward, scale.angle_to_steps(angle), config.scan_rate);
        if !wait_for_move(stepper, halt, delay, config.poll_interval_us) {
            return Ok(HomingOutcome::Halted);
        }

        log::info!("homed at {} degrees", angle.0);
        Ok(HomingOutcome::Homed { angle })
    }
}

fn wait_for_move<M, H, D>(stepper: &M, halt: &H, delay: &mut D, poll_interval_us: u32) -> bool
where
    M: StepperMotor,
    H: HaltSignal,
    D: DelayNs,
{
    while stepper.is_moving() {
        if halt.is_halted() {
            log::warn!("homing halted");
            return false;
        }
        delay.delay_us(poll_interval_us);
    }
    true
}
