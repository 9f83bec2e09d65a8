//! Per-instance extruder configuration from TOML.

use heapless::String;
use serde::Deserialize;

use super::units::{Degrees, Millimeters, MmPerSec, MmPerSecSquared};

/// Filament diameters at or below this are treated as "volumetric extrusion disabled".
pub const MIN_FILAMENT_DIAMETER: f32 = 0.01;

/// Complete extruder configuration (per-instance key namespace).
#[derive(Debug, Clone, Deserialize)]
pub struct ExtruderConfig {
    /// Numeric identifier matched against `P` arguments of settings commands.
    #[serde(default)]
    pub identifier: u16,

    /// Whether the instance starts selected. Tool selection may change it at runtime.
    #[serde(default)]
    pub enabled: bool,

    /// Motor steps per millimetre of feed.
    #[serde(default = "default_steps")]
    pub steps_per_mm: f32,

    /// Motor steps per degree of shaft rotation.
    #[serde(default = "default_steps")]
    pub steps_per_angle: f32,

    /// Filament diameter; zero disables volumetric extrusion.
    #[serde(default)]
    pub filament_diameter: Millimeters,

    /// Acceleration used by the solo ramp.
    #[serde(default = "default_acceleration")]
    pub acceleration: MmPerSecSquared,

    /// Solo feed rate until an `F` word overrides it.
    #[serde(default = "default_feed_rate")]
    pub default_feed_rate: MmPerSec,

    /// Maximum feed rate handed to the stepper.
    #[serde(default = "default_feed_rate")]
    pub max_speed: MmPerSec,

    /// Maximum volumetric rate in mm³/s; zero disables the check.
    #[serde(default)]
    pub max_volumetric_rate: f32,

    /// Firmware retract length.
    #[serde(default = "default_retract_length")]
    pub retract_length: Millimeters,

    /// Firmware retract feed rate.
    #[serde(default = "default_retract_feedrate")]
    pub retract_feedrate: MmPerSec,

    /// Extra length pushed back on un-retract.
    #[serde(default)]
    pub retract_recover_length: Millimeters,

    /// Un-retract feed rate.
    #[serde(default = "default_recover_feedrate")]
    pub retract_recover_feedrate: MmPerSec,

    /// Z hop applied while retracted; zero disables it.
    #[serde(default)]
    pub retract_zlift_length: Millimeters,

    /// Z hop feed rate in mm/min (same unit as `F` words).
    #[serde(default = "default_zlift_feedrate")]
    pub retract_zlift_feedrate: f32,

    /// Analog input channel of the angle sensor. Required.
    pub angle_sensor_pin: String<32>,

    /// Homing scan parameters.
    #[serde(default)]
    pub homing: HomingConfig,

    /// Tool head offset along X.
    #[serde(default)]
    pub x_offset: f32,

    /// Tool head offset along Y.
    #[serde(default)]
    pub y_offset: f32,

    /// Tool head offset along Z.
    #[serde(default)]
    pub z_offset: f32,

    /// Output driving the ultrasonic generator; absent when no generator is fitted.
    #[serde(default)]
    pub ultrasonic_enable_pin: Option<String<32>>,

    /// Generator ready input.
    #[serde(default)]
    pub ultrasonic_ready_pin: Option<String<32>>,

    /// Generator status input.
    #[serde(default)]
    pub ultrasonic_status_pin: Option<String<32>>,

    /// Generator fault input.
    #[serde(default)]
    pub ultrasonic_fault_pin: Option<String<32>>,
}

/// Homing scan parameters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct HomingConfig {
    /// Angle advanced between two sensor samples.
    #[serde(default = "default_step_angle")]
    pub step_angle: Degrees,

    /// Total angle swept while sampling.
    #[serde(default = "default_sweep_angle")]
    pub sweep_angle: Degrees,

    /// Stepper rate during the scan, steps per second.
    #[serde(default = "default_scan_rate")]
    pub scan_rate: f32,

    /// Delay between two completion polls, microseconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_us: u32,
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self {
            step_angle: default_step_angle(),
            sweep_angle: default_sweep_angle(),
            scan_rate: default_scan_rate(),
            poll_interval_us: default_poll_interval(),
        }
    }
}

impl HomingConfig {
    /// Number of samples a full sweep takes.
    pub fn sample_count(&self) -> usize {
        if self.step_angle.0 <= 0.0 {
            return 0;
        }
        libm::ceilf(self.sweep_angle.0 / self.step_angle.0) as usize
    }
}

pub(crate) fn default_steps() -> f32 {
    1.0
}

pub(crate) fn default_acceleration() -> MmPerSecSquared {
    MmPerSecSquared(1000.0)
}

pub(crate) fn default_feed_rate() -> MmPerSec {
    MmPerSec(1000.0)
}

pub(crate) fn default_retract_length() -> Millimeters {
    Millimeters(3.0)
}

pub(crate) fn default_retract_feedrate() -> MmPerSec {
    MmPerSec(45.0)
}

pub(crate) fn default_recover_feedrate() -> MmPerSec {
    MmPerSec(8.0)
}

pub(crate) fn default_zlift_feedrate() -> f32 {
    100.0 * 60.0
}

fn default_step_angle() -> Degrees {
    Degrees(10.0)
}

fn default_sweep_angle() -> Degrees {
    Degrees(360.0)
}

fn default_scan_rate() -> f32 {
    1000.0
}

fn default_poll_interval() -> u32 {
    50
}

impl ExtruderConfig {
    /// Factor converting a requested volume into filament length.
    ///
    /// Returns 1.0 when volumetric extrusion is disabled.
    pub fn volumetric_multiplier(&self) -> f32 {
        volumetric_multiplier(self.filament_diameter.0)
    }

    /// Check whether volumetric extrusion is enabled.
    pub fn is_volumetric(&self) -> bool {
        self.filament_diameter.0 > MIN_FILAMENT_DIAMETER
    }
}

/// `1 / (π r²)` for a usable diameter, 1.0 otherwise.
pub fn volumetric_multiplier(filament_diameter: f32) -> f32 {
    if filament_diameter > MIN_FILAMENT_DIAMETER {
        let radius = filament_diameter / 2.0;
        1.0 / (radius * radius * core::f32::consts::PI)
    } else {
        1.0
    }
}

/// Small non-volumetric configuration shared by unit tests across the crate.
#[cfg(test)]
pub(crate) fn test_config() -> ExtruderConfig {
    ExtruderConfig {
        identifier: 0,
        enabled: true,
        steps_per_mm: 10.0,
        steps_per_angle: 5.0,
        filament_diameter: Millimeters(0.0),
        acceleration: default_acceleration(),
        default_feed_rate: default_feed_rate(),
        max_speed: default_feed_rate(),
        max_volumetric_rate: 0.0,
        retract_length: default_retract_length(),
        retract_feedrate: default_retract_feedrate(),
        retract_recover_length: Millimeters(0.0),
        retract_recover_feedrate: default_recover_feedrate(),
        retract_zlift_length: Millimeters(0.0),
        retract_zlift_feedrate: default_zlift_feedrate(),
        angle_sensor_pin: String::try_from("0.23").unwrap(),
        homing: HomingConfig::default(),
        x_offset: 0.0,
        y_offset: 0.0,
        z_offset: 0.0,
        ultrasonic_enable_pin: None,
        ultrasonic_ready_pin: None,
        ultrasonic_status_pin: None,
        ultrasonic_fault_pin: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volumetric_disabled_by_default() {
        let config = test_config();
        assert!(!config.is_volumetric());
        assert_eq!(config.volumetric_multiplier(), 1.0);
    }

    #[test]
    fn test_volumetric_multiplier() {
        let mut config = test_config();
        config.filament_diameter = Millimeters(1.75);

        // 1 / (0.875² π) ≈ 0.4158
        assert!((config.volumetric_multiplier() - 0.4158).abs() < 0.001);
    }

    #[test]
    fn test_homing_sample_count() {
        assert_eq!(HomingConfig::default().sample_count(), 36);

        let odd = HomingConfig {
            step_angle: Degrees(7.0),
            ..HomingConfig::default()
        };
        // 360 / 7 = 51.4, the last partial step still samples
        assert_eq!(odd.sample_count(), 52);
    }
}
