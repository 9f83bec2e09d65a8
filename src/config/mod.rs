//! Configuration module for extruder-motion.
//!
//! Provides types for loading and validating extruder configurations from TOML files
//! (with `std` feature) or pre-parsed data.

mod extruder;
mod legacy;
mod system;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use extruder::{volumetric_multiplier, ExtruderConfig, HomingConfig, MIN_FILAMENT_DIAMETER};
pub use legacy::LegacyExtruderConfig;
pub use system::{SystemConfig, LEGACY_EXTRUDER_NAME};
pub use validation::{validate_config, validate_extruder};

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

#[cfg(test)]
pub(crate) use extruder::test_config;

/// Copy `text` into a fixed-capacity string, dropping what does not fit.
pub(crate) fn truncated<const N: usize>(text: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

// Re-export unit types at config level
pub use units::{Degrees, Millimeters, MmPerSec, MmPerSecSquared, FULL_TURN};
