//! Unit tests for TOML configuration parsing.

use extruder_motion::config::{SystemConfig, LEGACY_EXTRUDER_NAME};

/// Test parsing a named extruder with every key set.
#[test]
fn test_parse_extruder_config() {
    let toml_str = r#"
[extruders.hotend]
identifier = 3
enabled = true
steps_per_mm = 140.0
steps_per_angle = 8.9
filament_diameter = 1.75
acceleration = 500.0
default_feed_rate = 20.0
max_speed = 50.0
max_volumetric_rate = 12.0
retract_length = 2.5
retract_feedrate = 35.0
retract_recover_length = 0.2
retract_recover_feedrate = 10.0
retract_zlift_length = 0.4
retract_zlift_feedrate = 3000.0
angle_sensor_pin = "1.30"

[extruders.hotend.homing]
step_angle = 5.0
sweep_angle = 180.0
scan_rate = 400.0
poll_interval_us = 100
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let extruder = config.extruder("hotend").expect("Extruder not found");

    assert_eq!(extruder.identifier, 3);
    assert!(extruder.enabled);
    assert_eq!(extruder.steps_per_mm, 140.0);
    assert_eq!(extruder.steps_per_angle, 8.9);
    assert!(extruder.is_volumetric());
    assert_eq!(extruder.acceleration.0, 500.0);
    assert_eq!(extruder.max_speed.0, 50.0);
    assert_eq!(extruder.max_volumetric_rate, 12.0);
    assert_eq!(extruder.retract_length.0, 2.5);
    assert_eq!(extruder.retract_zlift_feedrate, 3000.0);
    assert_eq!(extruder.angle_sensor_pin.as_str(), "1.30");
    assert_eq!(extruder.homing.sample_count(), 36);
    assert_eq!(extruder.homing.poll_interval_us, 100);
}

/// Test that omitted keys take their defaults.
#[test]
fn test_parse_defaults() {
    let toml_str = r#"
[extruders.hotend]
angle_sensor_pin = "0.23"
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let extruder = config.extruder("hotend").expect("Extruder not found");

    assert_eq!(extruder.identifier, 0);
    assert!(!extruder.enabled);
    assert_eq!(extruder.steps_per_mm, 1.0);
    assert!(!extruder.is_volumetric());
    assert_eq!(extruder.retract_length.0, 3.0);
    assert_eq!(extruder.retract_recover_feedrate.0, 8.0);
    assert_eq!(extruder.retract_zlift_length.0, 0.0);
    assert_eq!(extruder.homing.step_angle.0, 10.0);
}

/// Test the legacy key namespace.
#[test]
fn test_parse_legacy_section() {
    let toml_str = r#"
[legacy]
extruder_module_enable = true
extruder_steps_per_mm = 93.0
extruder_steps_per_angle = 4.0
extruder_max_speed = 40.0
angle_sensor_pin = "0.25"
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let extruder = config
        .extruder(LEGACY_EXTRUDER_NAME)
        .expect("Legacy extruder not found");

    assert!(extruder.enabled);
    assert_eq!(extruder.steps_per_mm, 93.0);
    assert_eq!(extruder.steps_per_angle, 4.0);
    assert_eq!(extruder.max_speed.0, 40.0);
    assert_eq!(extruder.identifier, 0);
    assert!(config.extruder("hotend").is_none());
}

/// Test that a named instance called "extruder" shadows the legacy section.
#[test]
fn test_named_instance_shadows_legacy() {
    let toml_str = r#"
[legacy]
extruder_steps_per_mm = 93.0
angle_sensor_pin = "0.25"

[extruders.extruder]
steps_per_mm = 120.0
angle_sensor_pin = "0.26"
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.extruder("extruder").unwrap().steps_per_mm, 120.0);
    assert_eq!(config.extruder_names().count(), 1);
}

/// Test that the sensor pin is required.
#[test]
fn test_missing_sensor_pin() {
    let toml_str = r#"
[extruders.hotend]
steps_per_mm = 140.0
"#;

    let result: Result<SystemConfig, _> = toml::from_str(toml_str);
    assert!(result.is_err());
}
