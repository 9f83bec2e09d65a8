//! Unit tests for configuration validation.

use extruder_motion::config::{validate_config, SystemConfig};
use extruder_motion::error::{ConfigError, Error};

/// Test validation of a valid configuration.
#[test]
fn test_valid_config_passes_validation() {
    let toml_str = r#"
[extruders.left]
identifier = 0
steps_per_mm = 140.0
steps_per_angle = 8.0
angle_sensor_pin = "0.23"

[extruders.right]
identifier = 1
steps_per_mm = 140.0
steps_per_angle = 8.0
angle_sensor_pin = "0.24"
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    assert!(validate_config(&config).is_ok());
}

/// Test validation fails for zero steps per degree.
#[test]
fn test_invalid_steps_per_angle() {
    let toml_str = r#"
[extruders.hotend]
steps_per_angle = 0.0
angle_sensor_pin = "0.23"
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let result = validate_config(&config);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidStepsPerAngle(_)))
    ));
}

/// Test validation fails for a legacy section with negative acceleration.
#[test]
fn test_invalid_legacy_acceleration() {
    let toml_str = r#"
[legacy]
extruder_acceleration = -10.0
angle_sensor_pin = "0.23"
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let result = validate_config(&config);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidAcceleration(_)))
    ));
}

/// Test validation fails for a homing sweep the sample buffer cannot hold.
#[test]
fn test_homing_sweep_too_fine() {
    let toml_str = r#"
[extruders.hotend]
angle_sensor_pin = "0.23"

[extruders.hotend.homing]
step_angle = 1.0
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let result = validate_config(&config);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidHomingSweep { .. }))
    ));
}

/// Test validation fails for an empty homing sweep.
#[test]
fn test_homing_sweep_empty() {
    let toml_str = r#"
[extruders.hotend]
angle_sensor_pin = "0.23"

[extruders.hotend.homing]
sweep_angle = 0.0
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    assert!(validate_config(&config).is_err());
}

/// Test that empty configuration is valid.
#[test]
fn test_empty_config_is_valid() {
    let config = SystemConfig::default();
    assert!(validate_config(&config).is_ok());
}
