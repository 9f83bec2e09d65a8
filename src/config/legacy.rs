//! Legacy single-extruder key namespace.

use heapless::String;
use serde::Deserialize;

use super::extruder::{
    default_acceleration, default_feed_rate, default_recover_feedrate, default_retract_feedrate,
    default_retract_length, default_steps, default_zlift_feedrate, ExtruderConfig, HomingConfig,
};
use super::units::{Millimeters, MmPerSec, MmPerSecSquared};

/// Extruder settings under the old `extruder_*` key names.
///
/// Only one instance exists in this layout. It carries no retract, homing, offset or ultrasonic
/// keys, so those take their defaults when converted.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyExtruderConfig {
    /// Whether the module is loaded at all.
    #[serde(default)]
    pub extruder_module_enable: bool,

    /// Motor steps per millimetre of feed.
    #[serde(default = "default_steps")]
    pub extruder_steps_per_mm: f32,

    /// Motor steps per degree of shaft rotation.
    #[serde(default = "default_steps")]
    pub extruder_steps_per_angle: f32,

    /// Filament diameter.
    #[serde(default)]
    pub extruder_filament_diameter: Millimeters,

    /// Solo ramp acceleration.
    #[serde(default = "default_acceleration")]
    pub extruder_acceleration: MmPerSecSquared,

    /// Solo feed rate.
    #[serde(default = "default_feed_rate")]
    pub extruder_default_feed_rate: MmPerSec,

    /// Maximum feed rate.
    #[serde(default = "default_feed_rate")]
    pub extruder_max_speed: MmPerSec,

    /// Analog input channel of the angle sensor.
    pub angle_sensor_pin: String<32>,
}

impl LegacyExtruderConfig {
    /// Convert into the per-instance shape with identifier 0.
    pub fn to_extruder_config(&self) -> ExtruderConfig {
        ExtruderConfig {
            identifier: 0,
            enabled: self.extruder_module_enable,
            steps_per_mm: self.extruder_steps_per_mm,
            steps_per_angle: self.extruder_steps_per_angle,
            filament_diameter: self.extruder_filament_diameter,
            acceleration: self.extruder_acceleration,
            default_feed_rate: self.extruder_default_feed_rate,
            max_speed: self.extruder_max_speed,
            max_volumetric_rate: 0.0,
            retract_length: default_retract_length(),
            retract_feedrate: default_retract_feedrate(),
            retract_recover_length: Millimeters(0.0),
            retract_recover_feedrate: default_recover_feedrate(),
            retract_zlift_length: Millimeters(0.0),
            retract_zlift_feedrate: default_zlift_feedrate(),
            angle_sensor_pin: self.angle_sensor_pin.clone(),
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
}
