//! Error types for extruder-motion.
//!
//! Runtime hooks never fail; stale or absent state is tolerated. Errors only surface
//! while loading configuration, building an axis, or when the homing scan cannot record
//! its samples.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all extruder-motion operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing, validation or build error
    Config(ConfigError),
    /// Homing scan error
    Homing(HomingError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Extruder name not found in configuration
    ExtruderNotFound(heapless::String<32>),
    /// Steps per millimetre must be > 0
    InvalidStepsPerMm(f32),
    /// Steps per degree must be > 0
    InvalidStepsPerAngle(f32),
    /// Acceleration must be > 0
    InvalidAcceleration(f32),
    /// Homing sweep is empty or needs more samples than the scan buffer holds
    InvalidHomingSweep {
        /// Angle advanced per scan step
        step_angle: f32,
        /// Total swept angle
        sweep_angle: f32,
    },
    /// A collaborator required by the builder was not supplied
    MissingComponent(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Homing scan errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomingError {
    /// More sensor samples were taken than the scan buffer holds
    SampleBufferFull {
        /// Buffer capacity
        capacity: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Homing(e) => write!(f, "Homing error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::ExtruderNotFound(name) => write!(f, "Extruder '{}' not found", name),
            ConfigError::InvalidStepsPerMm(v) => {
                write!(f, "Invalid steps per mm: {}. Must be > 0", v)
            }
            ConfigError::InvalidStepsPerAngle(v) => {
                write!(f, "Invalid steps per angle: {}. Must be > 0", v)
            }
            ConfigError::InvalidAcceleration(v) => {
                write!(f, "Invalid acceleration: {}. Must be > 0", v)
            }
            ConfigError::InvalidHomingSweep { step_angle, sweep_angle } => write!(
                f,
                "Invalid homing sweep: {} degrees in steps of {} degrees",
                sweep_angle, step_angle
            ),
            ConfigError::MissingComponent(name) => write!(f, "{} is required", name),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for HomingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HomingError::SampleBufferFull { capacity } => {
                write!(f, "Sensor sample buffer full ({} samples)", capacity)
            }
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<HomingError> for Error {
    fn from(e: HomingError) -> Self {
        Error::Homing(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for HomingError {}
