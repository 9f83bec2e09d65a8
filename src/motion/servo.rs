//! Speed math for the solo ramp and for following the primary axes.
//!
//! All rates are motor steps per second.

/// Speed added on each acceleration tick.
#[inline]
pub fn rate_increase(acceleration: f32, ticks_per_second: u32, steps_per_mm: f32) -> f32 {
    if ticks_per_second == 0 {
        return 0.0;
    }
    libm::floorf(acceleration / ticks_per_second as f32 * steps_per_mm)
}

/// Cruise rate of a solo move.
#[inline]
pub fn solo_target_rate(feed_rate: f32, steps_per_mm: f32) -> f32 {
    libm::floorf(feed_rate * steps_per_mm)
}

/// Initial rate of a solo move: one acceleration step, capped by the cruise rate.
#[inline]
pub fn solo_start_rate(target_rate: f32, increase: f32) -> f32 {
    target_rate.min(increase)
}

/// Next rate of the solo ramp, or `None` once cruising.
pub fn ramp(current: f32, target: f32, increase: f32) -> Option<f32> {
    if current < target {
        Some(target.min(current + increase))
    } else {
        None
    }
}

/// Feed rate keeping pace with the primary axes.
///
/// Scales the primary step rate by this axis' share of the block's step events.
/// Returns `None` for a block without step events.
pub fn follow_speed(primary_rate: f32, steps_to_move: u32, steps_event_count: u32) -> Option<f32> {
    if steps_event_count == 0 {
        return None;
    }
    Some(primary_rate * steps_to_move as f32 / steps_event_count as f32)
}
