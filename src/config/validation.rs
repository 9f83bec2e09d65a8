//! Configuration validation.

use crate::error::{ConfigError, Error, Result};
use crate::homing::MAX_HOMING_SAMPLES;

use super::{ExtruderConfig, SystemConfig};

/// Validate a system configuration.
///
/// Checks every extruder, legacy section included:
/// - Steps per mm and steps per degree are positive
/// - Acceleration is positive
/// - The homing sweep fits the sample buffer
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    for (_, extruder) in config.all_extruders() {
        validate_extruder(&extruder)?;
    }
    Ok(())
}

/// Validate a single extruder configuration.
pub fn validate_extruder(config: &ExtruderConfig) -> Result<()> {
    if config.steps_per_mm <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidStepsPerMm(
            config.steps_per_mm,
        )));
    }

    if config.steps_per_angle <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidStepsPerAngle(
            config.steps_per_angle,
        )));
    }

    if config.acceleration.0 <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidAcceleration(
            config.acceleration.0,
        )));
    }

    let samples = config.homing.sample_count();
    if samples == 0 || samples > MAX_HOMING_SAMPLES {
        return Err(Error::Config(ConfigError::InvalidHomingSweep {
            step_angle: config.homing.step_angle.0,
            sweep_angle: config.homing.sweep_angle.0,
        }));
    }

    Ok(())
}
