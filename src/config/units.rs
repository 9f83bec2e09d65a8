//! Unit types for physical quantities.
//!
//! Provides type-safe representations of angles, lengths, feed rates and accelerations
//! so configuration values cannot be mixed up at compile time.

use core::ops::Add;

use serde::Deserialize;

/// Degrees in one full turn of the feed shaft.
pub const FULL_TURN: f32 = 360.0;

/// Angular position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct Degrees(pub f32);

impl Degrees {
    /// Wrap into `[0, 360)`.
    pub fn normalized(self) -> Self {
        let wrapped = libm::fmodf(self.0, FULL_TURN);
        if wrapped < 0.0 {
            Self(wrapped + FULL_TURN)
        } else {
            Self(wrapped)
        }
    }
}

impl Add for Degrees {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

/// Linear distance in millimetres (or mm³ when volumetric extrusion is enabled).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct Millimeters(pub f32);

/// Feed rate in millimetres per second.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct MmPerSec(pub f32);

impl MmPerSec {
    /// Convert from a per-minute feed rate (as carried by `F` words).
    #[inline]
    pub fn from_per_minute(mm_per_min: f32) -> Self {
        Self(mm_per_min / 60.0)
    }
}

/// Linear acceleration in millimetres per second squared.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct MmPerSecSquared(pub f32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrees_normalized() {
        assert_eq!(Degrees(370.0).normalized(), Degrees(10.0));
        assert_eq!(Degrees(-90.0).normalized(), Degrees(270.0));
        assert_eq!(Degrees(360.0).normalized(), Degrees(0.0));
        assert_eq!(Degrees(45.0).normalized(), Degrees(45.0));
    }

    #[test]
    fn test_feed_rate_per_minute() {
        let rate = MmPerSec::from_per_minute(2700.0);
        assert!((rate.0 - 45.0).abs() < 0.001);
    }

    #[test]
    fn test_degrees_add() {
        assert_eq!(Degrees(350.0) + Degrees(20.0), Degrees(370.0));
        assert_eq!((Degrees(350.0) + Degrees(20.0)).normalized(), Degrees(10.0));
    }
}
