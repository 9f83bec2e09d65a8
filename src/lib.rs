//! # extruder-motion
//!
//! Feed-axis motion core for extruders driven by a stepper and an analog angle sensor.
//!
//! ## Features
//!
//! - **Block following**: feed in proportion to the primary axes, block by block
//! - **Solo moves**: acceleration-ramped feed while the primary axes stand still
//! - **Shortest-path angles**: `E` words are shaft angles, reached along the shortest rotation
//! - **Firmware retract**: `G10`/`G11` with optional Z hop
//! - **Sensor homing**: sweep the shaft and settle on the strongest sensor reading
//! - **Ultrasonic tools**: `M50`-`M54` drive and report an optional generator
//! - **Configuration-driven**: extruders defined in TOML files
//! - **no_std compatible**: core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use extruder_motion::{ExtruderAxis, MotionHooks};
//!
//! let config = extruder_motion::load_config("extruder.toml")?;
//!
//! let mut axis = ExtruderAxis::builder()
//!     .from_config(&config, "hotend")?
//!     .stepper(stepper)
//!     .ticker(ticker)
//!     .halt(&HALT)
//!     .sensor(adc_channel)
//!     .delay(delay)
//!     .build()?;
//!
//! // foreground
//! axis.on_command_received(&command, &mut queue, &mut robot, &mut reply)?;
//! // when the command reaches the head of the queue
//! axis.on_command_execute(&command, &robot);
//! // interrupt context
//! axis.on_block_begin(block);
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Derives `defmt::Format` on public enums for embedded logging

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Core modules
pub mod command;
pub mod config;
pub mod error;
pub mod extruder;
pub mod homing;
pub mod machine;
pub mod motion;
pub mod motor;
pub mod retract;
pub mod sensor;
pub mod ultrasonic;

// Re-exports for ergonomic API
pub use command::{Command, CommandCode};
pub use config::{validate_config, ExtruderConfig, HomingConfig, SystemConfig};
pub use error::{Error, Result};
pub use extruder::{ExtruderAxis, ExtruderAxisBuilder, PublicData, PublicDataRequest};
pub use homing::HomingOutcome;
pub use machine::{
    HaltEvent, HaltFlag, HaltSignal, MotionHooks, MotionQueue, PrimaryAxis, SpeedChange,
    StepTicker,
};
pub use motion::{AngleOptimizer, BlockHandle, ClaimedBlock, MotionMode};
pub use motor::{Direction, StepperMotor};
pub use retract::{RetractCommand, RetractSequencer};
pub use sensor::{AngleInput, AngleSensor};
pub use ultrasonic::{NoUltrasonic, UltrasonicGenerator, UltrasonicPins};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Degrees, Millimeters, MmPerSec, MmPerSecSquared};
