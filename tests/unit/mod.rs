//! Unit test harness for extruder-motion.
//!
//! Configuration parsing and validation through the public API.

mod config_parsing;
mod config_validation;
